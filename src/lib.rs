//! # Revenue Forecast Workspace
//!
//! Re-exports the workspace crates under one roof.
//!
//! ## Example
//!
//! ```
//! use revenue_forecast_workspace::revenue_forecast::window::YearWindow;
//!
//! let window = YearWindow::new(1972, 1976).unwrap();
//! assert_eq!(window.years().count(), 5);
//! ```

pub use forecast_dashboard;
pub use revenue_forecast;
pub use series_math;
