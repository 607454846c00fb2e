//! Forecasting engines and fitted models

use crate::error::{ForecastError, Result};
use crate::regularize::CanonicalSeries;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod auto;
pub mod sarima;

pub use auto::AutoSarima;
pub use sarima::{SarimaModel, SarimaOrder};

/// Order-search settings for the automatic seasonal engine.
///
/// Defaults search the same space as the usual auto ARIMA tooling with a
/// monthly seasonal period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Whether seasonal terms and seasonal differencing are considered
    pub seasonal: bool,
    /// Observations per seasonal cycle
    pub period: usize,
    /// Stepwise neighbourhood search instead of an exhaustive grid
    pub stepwise: bool,
    pub max_p: usize,
    pub max_q: usize,
    pub max_seasonal_p: usize,
    pub max_seasonal_q: usize,
    pub max_d: usize,
    pub max_seasonal_d: usize,
    /// Upper bound on `p + q + P + Q` for the exhaustive grid
    pub max_order: usize,
    /// Upper bound on the number of candidates estimated by the stepwise search
    pub max_models: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seasonal: true,
            period: 12,
            stepwise: true,
            max_p: 5,
            max_q: 5,
            max_seasonal_p: 2,
            max_seasonal_q: 2,
            max_d: 2,
            max_seasonal_d: 1,
            max_order: 5,
            max_models: 100,
        }
    }
}

impl SearchConfig {
    /// Whether seasonal terms are in play
    pub fn uses_seasonality(&self) -> bool {
        self.seasonal && self.period > 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.seasonal && self.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonal period must be at least 2, got {}",
                self.period
            )));
        }
        if self.max_models == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_models must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Model fitted on one series, ready to forecast
pub trait FittedModel: Debug {
    /// Point forecasts for the next `horizon` periods
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Capability that fits a [`FittedModel`] to a canonical series
pub trait ForecastEngine: Debug {
    /// The type of fitted model produced
    type Model: FittedModel;

    /// Fit a model; blocking and potentially slow
    fn fit(&self, series: &CanonicalSeries) -> Result<Self::Model>;

    /// Get the name of the engine
    fn name(&self) -> &str;
}

/// Reject a zero horizon
pub(crate) fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast horizon must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
