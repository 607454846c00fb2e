use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use revenue_forecast::assembler::ForecastSeries;
use revenue_forecast::export::{
    export_forecast, forecast_csv_bytes, forecast_rows, format_currency, DEFAULT_EXPORT_FILE_NAME,
};
use revenue_forecast::utils::future_month_ends;
use revenue_forecast::window::YearWindow;
use std::fs;
use tempfile::tempdir;

fn forecast(horizon: usize) -> ForecastSeries {
    let last = NaiveDate::from_ymd_opt(1971, 11, 30).unwrap();
    let dates = future_month_ends(last, horizon).unwrap();
    let values = (0..horizon).map(|i| 1000.0 + i as f64 + 1.0 / 3.0).collect();
    ForecastSeries::new(dates, values).unwrap()
}

#[test]
fn test_rows_follow_window() {
    let series = forecast(60);

    let all = forecast_rows(&series, &YearWindow::new(1972, 1976).unwrap());
    assert_eq!(all.len(), 59);

    let two_years = forecast_rows(&series, &YearWindow::new(1972, 1973).unwrap());
    assert_eq!(two_years.len(), 24);
    assert_eq!(two_years[0].date, NaiveDate::from_ymd_opt(1972, 1, 31).unwrap());

    let none = forecast_rows(&series, &YearWindow::new(1990, 1991).unwrap());
    assert!(none.is_empty());
}

#[test]
fn test_csv_payload_keeps_full_precision() {
    let series = forecast(3);
    let rows = forecast_rows(&series, &YearWindow::new(1971, 1972).unwrap());
    let text = String::from_utf8(forecast_csv_bytes(&rows).unwrap()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Date,Forecasted Revenue");
    assert_eq!(lines[1], format!("1971-12-31,{}", 1000.0 + 1.0 / 3.0));
    assert_eq!(lines.len(), 4);
    assert!(!text.contains('$'));
}

#[test]
fn test_export_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);

    let count = export_forecast(&forecast(60), &YearWindow::new(1976, 1976).unwrap(), &path).unwrap();
    assert_eq!(count, 11);

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), count + 1);
}

#[test]
fn test_currency_display() {
    assert_eq!(format_currency(12345.678), "$12,345.68");
    assert_eq!(format_currency(1000.0), "$1,000.00");
    assert_eq!(format_currency(-42.0), "-$42.00");
}
