//! A forecasting session that fits its model once and reuses it

use crate::assembler::{assemble, ForecastSeries};
use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, ForecastEngine};
use crate::regularize::CanonicalSeries;
use tracing::info;

/// Owns one canonical series and the model fitted to it.
///
/// The model is fitted on first use and kept until [`invalidate`](Self::invalidate)
/// or [`replace_series`](Self::replace_series) is called.
#[derive(Debug)]
pub struct ForecastSession<E: ForecastEngine> {
    engine: E,
    series: CanonicalSeries,
    model: Option<E::Model>,
    fit_count: usize,
}

impl<E: ForecastEngine> ForecastSession<E> {
    pub fn new(engine: E, series: CanonicalSeries) -> Self {
        Self {
            engine,
            series,
            model: None,
            fit_count: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn series(&self) -> &CanonicalSeries {
        &self.series
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Number of fits performed so far
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }

    /// The fitted model, fitting it first if needed
    pub fn model(&mut self) -> Result<&E::Model> {
        if self.model.is_none() {
            info!(
                engine = self.engine.name(),
                observations = self.series.len(),
                "Training forecasting model..."
            );
            let model = self.engine.fit(&self.series)?;
            self.fit_count += 1;
            info!(model = model.name(), "Model trained successfully!");
            self.model = Some(model);
        }

        self.model.as_ref().ok_or_else(|| {
            ForecastError::ModelFit("Model missing after a successful fit".to_string())
        })
    }

    /// Forecast `horizon` months past the last observation
    pub fn forecast(&mut self, horizon: usize) -> Result<ForecastSeries> {
        let last_date = self.series.last_date().ok_or_else(|| {
            ForecastError::ModelFit("Cannot forecast an empty series".to_string())
        })?;
        let model = self.model()?;
        assemble(model, horizon, last_date)
    }

    /// Drop the cached model
    pub fn invalidate(&mut self) {
        self.model = None;
    }

    /// Swap in a new series; the cached model is dropped
    pub fn replace_series(&mut self, series: CanonicalSeries) {
        self.series = series;
        self.invalidate();
    }
}
