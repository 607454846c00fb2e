use chrono::NaiveDate;
use revenue_forecast::config::PipelineConfig;
use revenue_forecast::export::{forecast_csv_bytes, forecast_rows};
use revenue_forecast::pipeline::{load_series, session_from_config};
use revenue_forecast::utils::is_month_end;
use revenue_forecast::models::FittedModel;
use revenue_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

// 36 months of "$1,000.00" to "$1,035.00" starting January 1969
fn create_sample_data() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    writeln!(file, "month, Revenue ,Region").unwrap();
    for i in 0..36 {
        let year = 1969 + i / 12;
        let month = i % 12 + 1;
        writeln!(file, "{}-{:02}-01,\"${},0{:02}.00\",north", year, month, 1, i).unwrap();
    }

    file
}

fn config_for(file: &NamedTempFile) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.input.path = file.path().to_path_buf();
    config
}

#[test]
fn test_full_forecast_workflow() {
    let data_file = create_sample_data();
    let config = config_for(&data_file);

    // 1. Load and regularize
    let series = load_series(&config.input.path, &config).unwrap();
    assert_eq!(series.len(), 36);
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(1968, 12, 31));
    assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(1971, 11, 30));
    assert_eq!(series.values()[35], Some(1035.0));

    // 2. Fit once, forecast five years
    let mut session = session_from_config(&config).unwrap();
    let forecast = session.forecast(config.forecast.horizon).unwrap();
    assert!(session.is_fitted());
    assert_eq!(forecast.len(), 60);

    let dates = forecast.dates();
    assert_eq!(dates[0], NaiveDate::from_ymd_opt(1971, 12, 31).unwrap());
    assert_eq!(dates[59], NaiveDate::from_ymd_opt(1976, 11, 30).unwrap());
    assert!(dates.iter().all(|date| is_month_end(*date)));
    assert!((forecast.values()[0] - 1036.0).abs() < 1e-6);

    // 3. Export the selected years
    let window = config.display.bounds().unwrap();
    let rows = forecast_rows(&forecast, &window);
    let expected = dates.iter().filter(|date| window.contains(**date)).count();
    assert_eq!(rows.len(), expected);
    assert_eq!(rows.len(), 59);

    let csv = String::from_utf8(forecast_csv_bytes(&rows).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), rows.len() + 1);

    // 4. The fitted model is reused
    session.forecast(12).unwrap();
    assert_eq!(session.fit_count(), 1);
}

#[test]
fn test_missing_month_column_stops_pipeline() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date, Revenue ").unwrap();
    writeln!(file, "1969-01-01,100").unwrap();

    let config = config_for(&file);
    let result = load_series(file.path(), &config);
    assert!(matches!(result, Err(ForecastError::MissingColumn(_))));
}

#[test]
fn test_short_series_cannot_be_fitted() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Month, Revenue ").unwrap();
    for month in 1..=12 {
        writeln!(file, "1970-{:02}-01,{}", month, 100 + month).unwrap();
    }

    let config = config_for(&file);
    let mut session = session_from_config(&config).unwrap();
    assert!(matches!(
        session.forecast(60),
        Err(ForecastError::ModelFit(_))
    ));
}

#[test]
fn test_reference_dataset_end_to_end() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../dashboard.toml");
    let config = PipelineConfig::from_path(path).unwrap();

    let mut session = session_from_config(&config).unwrap();
    assert_eq!(session.series().len(), 105);
    assert_eq!(
        session.series().last_date(),
        NaiveDate::from_ymd_opt(1972, 8, 31)
    );

    let name = session.model().unwrap().name().to_string();
    assert!(name.starts_with("SARIMA("), "{}", name);
    assert!(name.contains("[12]"), "{}", name);

    let forecast = session.forecast(config.forecast.horizon).unwrap();
    assert_eq!(forecast.len(), 60);
    assert_eq!(forecast.dates()[0], NaiveDate::from_ymd_opt(1972, 9, 30).unwrap());
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_unsorted_rows_with_gaps_and_duplicates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, " MONTH , Revenue ").unwrap();
    writeln!(file, "1970-04-01,\"$3,000.00\"").unwrap();
    writeln!(file, "1970-02-01,\"$1,000.00\"").unwrap();
    writeln!(file, "1970-03-01,").unwrap();
    writeln!(file, "1970-02-01,\"$9,999.00\"").unwrap();

    let config = config_for(&file);
    let series = load_series(file.path(), &config).unwrap();
    assert_eq!(
        series.values(),
        vec![Some(1000.0), Some(1000.0), Some(3000.0)]
    );
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(1970, 1, 31));
}
