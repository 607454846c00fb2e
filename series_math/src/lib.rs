//! # Series Math
//!
//! Numeric kernels used by the revenue forecasting pipeline.
//! This crate provides the building blocks of automatic seasonal ARIMA order
//! selection and estimation:
//!
//! - Regular and seasonal differencing with an exact inverse
//! - KPSS level-stationarity statistic and seasonal strength
//! - Dense least squares via singular value decomposition

use thiserror::Error;

pub mod differencing;
pub mod regression;
pub mod stationarity;

pub use differencing::{difference, Differenced, Differencing};
pub use regression::{least_squares, LeastSquaresFit};
pub use stationarity::{
    is_flat, kpss_level_statistic, regular_diffs, seasonal_diffs, seasonal_strength,
    KPSS_CRITICAL_5PCT, SEASONAL_STRENGTH_THRESHOLD,
};

/// Errors that can occur in time series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular system: {0}")]
    Singular(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
