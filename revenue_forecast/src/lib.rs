//! # Revenue Forecast
//!
//! A Rust library that turns a monthly revenue table into a five-year
//! forecast.
//!
//! ## Pipeline
//!
//! 1. [`data`]: read the CSV and normalize the month column name
//! 2. [`loader`]: parse dates and currency-formatted revenue
//! 3. [`regularize`]: align to month ends, drop duplicate months, forward fill
//! 4. [`models`]: fit an automatically ordered seasonal ARIMA model
//! 5. [`assembler`]: label predictions with future month-end dates
//!
//! [`session`] caches the fitted model, [`window`] filters by year and
//! [`export`] writes the forecast as CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use revenue_forecast::config::PipelineConfig;
//! use revenue_forecast::export::forecast_rows;
//! use revenue_forecast::pipeline::session_from_config;
//!
//! let config = PipelineConfig::from_path("dashboard.toml")?;
//! let mut session = session_from_config(&config)?;
//!
//! let forecast = session.forecast(config.forecast.horizon)?;
//! let window = config.display.bounds()?;
//! for row in forecast_rows(&forecast, &window) {
//!     println!("{} {:.2}", row.date, row.forecasted_revenue);
//! }
//! # Ok::<(), revenue_forecast::error::ForecastError>(())
//! ```

pub mod assembler;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod regularize;
pub mod session;
pub mod utils;
pub mod window;

pub use assembler::{assemble, ForecastPoint, ForecastSeries};
pub use config::PipelineConfig;
pub use data::{ColumnMapping, DataLoader, RawTable};
pub use error::{ForecastError, Result};
pub use loader::{LoadedSeries, Observation, TimeSeriesLoader};
pub use models::{AutoSarima, FittedModel, ForecastEngine, SearchConfig};
pub use regularize::{CanonicalSeries, MonthEndShift, Regularizer};
pub use session::ForecastSession;
pub use window::YearWindow;
