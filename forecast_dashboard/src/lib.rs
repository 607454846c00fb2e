//! # Forecast Dashboard
//!
//! Presentation layer for the revenue forecast. Everything here is a pure
//! function of the dashboard state and the pipeline outputs: [`render`] turns
//! a [`DashboardState`] and [`DashboardData`] into a [`View`], which can be
//! printed as text or serialized as JSON.
//!
//! ## Usage Example
//!
//! ```no_run
//! use forecast_dashboard::{render, DashboardData, DashboardState, Page};
//! use revenue_forecast::config::PipelineConfig;
//! use revenue_forecast::pipeline::session_from_config;
//!
//! let config = PipelineConfig::default();
//! let mut session = session_from_config(&config)?;
//! let forecast = session.forecast(config.forecast.horizon)?;
//!
//! let data = DashboardData::new(session.series().clone(), forecast, &config)?;
//! let state = DashboardState::new(Page::PredictedData, &config.display);
//! println!("{}", render(&state, &data)?.to_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use revenue_forecast::ForecastError;
use thiserror::Error;

pub mod render;
pub mod view;

pub use render::{render, DashboardData, DashboardState, Page};
pub use view::{ChartView, TableRow, TableView, View, WelcomeView, YearPanel};

/// Title shown on every page
pub const APP_TITLE: &str = "📈 5-Year Revenue Forecasting App";

/// Subtitle shown under the title
pub const APP_SUBTITLE: &str = "Predict revenue trends for the next five years using ARIMA modeling.";

/// Errors that can occur while building views
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Invalid dashboard state: {0}")]
    InvalidState(String),
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
