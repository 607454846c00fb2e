//! CSV export of forecast rows and currency display formatting

use crate::assembler::ForecastSeries;
use crate::error::{ForecastError, Result};
use crate::window::YearWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// File name offered for the forecast download
pub const DEFAULT_EXPORT_FILE_NAME: &str = "forecast_data.csv";

/// One exported forecast row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Forecasted Revenue")]
    pub forecasted_revenue: f64,
}

/// Forecast rows whose year lies in the window
pub fn forecast_rows(series: &ForecastSeries, window: &YearWindow) -> Vec<ExportRow> {
    series
        .within(window)
        .into_iter()
        .map(|point| ExportRow {
            date: point.date,
            forecasted_revenue: point.value,
        })
        .collect()
}

/// Write rows as CSV with a `Date,Forecasted Revenue` header and full precision
pub fn write_forecast_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Date", "Forecasted Revenue"])?;
    for row in rows {
        csv_writer.write_record([row.date.to_string(), row.forecasted_revenue.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// The CSV payload as bytes
pub fn forecast_csv_bytes(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_forecast_csv(rows, &mut buffer)?;
    Ok(buffer)
}

/// Write the rows of `series` inside `window` to a file; returns the row count
pub fn export_forecast<P: AsRef<Path>>(
    series: &ForecastSeries,
    window: &YearWindow,
    path: P,
) -> Result<usize> {
    let path = path.as_ref();
    let rows = forecast_rows(series, window);
    let file = File::create(path)?;
    write_forecast_csv(&rows, file)?;

    debug!(path = %path.display(), rows = rows.len(), "Exported forecast");
    Ok(rows.len())
}

/// Display form `$12,345.67`; negatives as `-$12,345.67`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Rounding can turn a tiny negative into zero
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// Reject an empty export file name
pub fn check_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Export file name must not be empty".to_string(),
        ));
    }
    Ok(())
}
