//! Pairing predicted values with forward month-end dates

use crate::error::{ForecastError, Result};
use crate::models::{check_horizon, FittedModel};
use crate::utils::future_month_ends;
use crate::window::YearWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One forecast month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Predicted values labelled with consecutive future month ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Pair dates and values positionally; both must have the same length
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::LengthMismatch {
                expected: dates.len(),
                actual: values.len(),
            });
        }

        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| ForecastPoint { date, value })
            .collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Points whose year lies in the window
    pub fn within(&self, window: &YearWindow) -> Vec<ForecastPoint> {
        self.points
            .iter()
            .filter(|p| window.contains(p.date))
            .copied()
            .collect()
    }

    /// Serialize the series as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ForecastError::InvalidParameter(format!("Cannot serialize forecast: {}", e))
        })
    }
}

/// Forecast `horizon` months after `last_date` with a fitted model
pub fn assemble<M: FittedModel + ?Sized>(
    model: &M,
    horizon: usize,
    last_date: NaiveDate,
) -> Result<ForecastSeries> {
    check_horizon(horizon)?;

    let dates = future_month_ends(last_date, horizon).ok_or_else(|| {
        ForecastError::InvalidParameter(format!(
            "{} months after {} is out of the supported date range",
            horizon, last_date
        ))
    })?;
    let values = model.predict(horizon)?;

    debug!(
        model = model.name(),
        horizon,
        first = ?dates.first(),
        "Assembled forecast"
    );
    ForecastSeries::new(dates, values)
}
