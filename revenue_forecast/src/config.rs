//! Pipeline configuration loaded from TOML
//!
//! Every field has a default matching the reference deployment, so an empty
//! file (or no file at all) yields a working configuration:
//!
//! ```toml
//! [input]
//! path = "dataset.csv"
//! revenue_column = " Revenue "
//!
//! [input.month_column]
//! canonical = "Month"
//! aliases = ["month"]
//!
//! [regularize]
//! month_end_shift = "previous"
//! fill_missing_months = true
//!
//! [model]
//! seasonal = true
//! period = 12
//! stepwise = true
//!
//! [forecast]
//! horizon = 60
//!
//! [display]
//! start_year = 1972
//! end_year = 1976
//!
//! [export]
//! file_name = "forecast_data.csv"
//! ```

use crate::data::{ColumnMapping, DEFAULT_REVENUE_COLUMN};
use crate::error::{ForecastError, Result};
use crate::export::{check_file_name, DEFAULT_EXPORT_FILE_NAME};
use crate::models::SearchConfig;
use crate::regularize::MonthEndShift;
use crate::utils::date_parser::DEFAULT_DATE_FORMATS;
use crate::window::YearWindow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Forecast horizon of the reference deployment, five years of months
pub const DEFAULT_HORIZON: usize = 60;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub regularize: RegularizeConfig,
    pub model: SearchConfig,
    pub forecast: ForecastConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

/// Where the data comes from and how its columns are read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub path: PathBuf,
    pub revenue_column: String,
    /// chrono format strings tried in order
    pub date_formats: Vec<String>,
    pub month_column: ColumnMapping,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dataset.csv"),
            revenue_column: DEFAULT_REVENUE_COLUMN.to_string(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            month_column: ColumnMapping::month(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegularizeConfig {
    pub month_end_shift: MonthEndShift,
    pub fill_missing_months: bool,
}

impl Default for RegularizeConfig {
    fn default() -> Self {
        Self {
            month_end_shift: MonthEndShift::Previous,
            fill_missing_months: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Months to forecast past the last observation
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

/// Year selector bounds; the window always starts at `start_year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// End year selected before the user picks one
    pub default_end_year: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            start_year: 1972,
            end_year: 1976,
            default_end_year: 1976,
        }
    }
}

impl DisplayConfig {
    /// Selectable year range
    pub fn bounds(&self) -> Result<YearWindow> {
        YearWindow::new(self.start_year, self.end_year)
            .map_err(|e| ForecastError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file. A relative input path is resolved against the
    /// directory holding the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ForecastError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if config.input.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.input.path = dir.join(&config.input.path);
            }
        }
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ForecastError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.forecast.horizon == 0 {
            return Err(ForecastError::Config(
                "forecast.horizon must be greater than zero".to_string(),
            ));
        }
        if self.model.period == 0 {
            return Err(ForecastError::Config(
                "model.period must be greater than zero".to_string(),
            ));
        }
        self.model
            .validate()
            .map_err(|e| ForecastError::Config(e.to_string()))?;

        let bounds = self.display.bounds()?;
        if !bounds.contains_year(self.display.default_end_year) {
            return Err(ForecastError::Config(format!(
                "display.default_end_year {} is outside {}",
                self.display.default_end_year, bounds
            )));
        }

        if self.input.revenue_column.is_empty() {
            return Err(ForecastError::Config(
                "input.revenue_column must not be empty".to_string(),
            ));
        }
        if self.input.month_column.canonical.trim().is_empty() {
            return Err(ForecastError::Config(
                "input.month_column.canonical must not be empty".to_string(),
            ));
        }
        if self.input.date_formats.is_empty() {
            return Err(ForecastError::Config(
                "input.date_formats must list at least one format".to_string(),
            ));
        }
        check_file_name(&self.export.file_name).map_err(|e| ForecastError::Config(e.to_string()))
    }
}
