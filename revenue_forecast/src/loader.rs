//! Parsing a normalized table into dated revenue observations

use crate::config::InputConfig;
use crate::data::{RawTable, DEFAULT_REVENUE_COLUMN, MONTH_COLUMN};
use crate::error::{ForecastError, Result};
use crate::utils::date_parser::{parse_date_with, DEFAULT_DATE_FORMATS};
use crate::utils::parse_currency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One dated revenue value; `None` marks a missing cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub revenue: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, revenue: Option<f64>) -> Self {
        Self { date, revenue }
    }
}

/// Observations in file order, possibly unordered, duplicated or gappy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSeries {
    observations: Vec<Observation>,
}

impl LoadedSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

/// Parse one revenue cell.
///
/// Empty cells, nulls and `NaN` are missing values. Infinite values and text
/// that remains after removing `$` and `,` are rejected.
pub fn parse_revenue_cell(row: usize, cell: Option<&str>) -> Result<Option<f64>> {
    let text = match cell.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(text) => text,
    };

    let numeric_error = || ForecastError::NumericParse {
        row,
        value: text.to_string(),
    };

    let value = parse_currency(text).ok_or_else(numeric_error)?;
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(numeric_error());
    }
    Ok(Some(value))
}

/// Converts a table with a canonical month column into a [`LoadedSeries`]
#[derive(Debug, Clone)]
pub struct TimeSeriesLoader {
    month_column: String,
    revenue_column: String,
    date_formats: Vec<String>,
}

impl Default for TimeSeriesLoader {
    fn default() -> Self {
        Self {
            month_column: MONTH_COLUMN.to_string(),
            revenue_column: DEFAULT_REVENUE_COLUMN.to_string(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl TimeSeriesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader from the `[input]` configuration section
    pub fn from_config(input: &InputConfig) -> Self {
        Self {
            month_column: input.month_column.canonical.clone(),
            revenue_column: input.revenue_column.clone(),
            date_formats: input.date_formats.clone(),
        }
    }

    pub fn with_revenue_column<S: Into<String>>(mut self, column: S) -> Self {
        self.revenue_column = column.into();
        self
    }

    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    pub fn revenue_column(&self) -> &str {
        &self.revenue_column
    }

    /// Parse dates and revenue values row by row.
    ///
    /// Rows are numbered from zero in table order.
    pub fn load(&self, table: &RawTable) -> Result<LoadedSeries> {
        let months = table.text_column(&self.month_column)?;
        let revenues = table.text_column(&self.revenue_column)?;

        let mut observations = Vec::with_capacity(months.len());
        for (row, (month, revenue)) in months.iter().zip(revenues.iter()).enumerate() {
            let date = month
                .as_deref()
                .and_then(|text| parse_date_with(text, self.date_formats.as_slice()))
                .ok_or_else(|| ForecastError::DateParse {
                    row,
                    value: month.clone().unwrap_or_default(),
                })?;

            let revenue = parse_revenue_cell(row, revenue.as_deref())?;
            if let Some(value) = revenue.filter(|v| *v < 0.0) {
                warn!(row, %date, value, "Negative revenue value");
            }

            observations.push(Observation::new(date, revenue));
        }

        let missing = observations.iter().filter(|o| o.revenue.is_none()).count();
        debug!(
            rows = observations.len(),
            missing,
            revenue_column = %self.revenue_column,
            "Parsed revenue series"
        );
        Ok(LoadedSeries::new(observations))
    }
}
