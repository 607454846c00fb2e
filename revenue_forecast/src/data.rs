//! Raw tabular input and column normalization

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Canonical name of the month column
pub const MONTH_COLUMN: &str = "Month";

/// Revenue column name used by the reference dataset
pub const DEFAULT_REVENUE_COLUMN: &str = " Revenue ";

/// Tabular input with arbitrary named text columns
#[derive(Debug, Clone)]
pub struct RawTable {
    df: DataFrame,
}

impl RawTable {
    /// Wrap an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a table from named columns of optional text cells
    pub fn from_columns(columns: Vec<(&str, Vec<Option<&str>>)>) -> Result<Self> {
        let series: Vec<Series> = columns
            .into_iter()
            .map(|(name, cells)| Series::new(name, cells))
            .collect();
        let df = DataFrame::new(series)?;
        Ok(Self { df })
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Whether a column with exactly this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().contains(&name)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// The underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Cells of a column as text, `None` for nulls
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        if !self.has_column(name) {
            return Err(ForecastError::MissingColumn(name.to_string()));
        }

        let column = self.df.column(name)?.cast(&DataType::Utf8)?;
        let cells = column
            .utf8()?
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect();
        Ok(cells)
    }

    fn rename_column(mut self, from: &str, to: &str) -> Result<Self> {
        self.df.rename(from, to)?;
        Ok(self)
    }
}

/// Data loader for raw revenue tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, reading every column as text
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // A zero-row schema inference leaves every column as Utf8
        let df = CsvReader::new(file)
            .infer_schema(Some(0))
            .has_header(true)
            .finish()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded raw table"
        );
        Ok(RawTable::from_dataframe(df))
    }
}

/// Rule for locating a column under a canonical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Name the column carries after normalization
    pub canonical: String,
    /// Accepted spellings, compared after trimming and lowercasing
    pub aliases: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::month()
    }
}

impl ColumnMapping {
    /// Create a mapping with the given canonical name and aliases
    pub fn new<S: Into<String>>(canonical: S, aliases: Vec<String>) -> Self {
        Self {
            canonical: canonical.into(),
            aliases,
        }
    }

    /// The month column mapping: canonical "Month", alias "month"
    pub fn month() -> Self {
        Self::new(MONTH_COLUMN, vec!["month".to_string()])
    }

    /// Whether a column name matches the canonical name or one of the aliases
    pub fn matches(&self, column: &str) -> bool {
        let key = column.trim().to_lowercase();
        key == self.canonical.trim().to_lowercase()
            || self
                .aliases
                .iter()
                .any(|alias| key == alias.trim().to_lowercase())
    }

    /// Rename the single matching column to the canonical name.
    ///
    /// A table that already has the canonical column passes through unchanged.
    /// Column order is preserved.
    pub fn normalize(&self, table: RawTable) -> Result<RawTable> {
        if table.has_column(&self.canonical) {
            return Ok(table);
        }

        let candidates: Vec<String> = table
            .column_names()
            .into_iter()
            .filter(|name| self.matches(name))
            .collect();

        match candidates.len() {
            0 => Err(ForecastError::MissingColumn(self.canonical.clone())),
            1 => {
                let single = &candidates[0];
                debug!(from = %single, to = %self.canonical, "Renaming column");
                table.rename_column(single, &self.canonical)
            }
            _ => Err(ForecastError::AmbiguousColumn {
                canonical: self.canonical.clone(),
                candidates,
            }),
        }
    }
}
