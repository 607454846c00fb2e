use chrono::NaiveDate;
use forecast_dashboard::{render, DashboardData, DashboardState, Page, View, APP_TITLE};
use pretty_assertions::assert_eq;
use revenue_forecast::assembler::ForecastSeries;
use revenue_forecast::config::PipelineConfig;
use revenue_forecast::regularize::CanonicalSeries;
use revenue_forecast::utils::future_month_ends;
use rstest::*;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[fixture]
fn data() -> DashboardData {
    let history = CanonicalSeries::from_monthly(
        date(1969, 1, 1),
        (0..36).map(|i| 1000.0 + i as f64).collect(),
    )
    .unwrap();

    // Forecast runs from January 1972 through December 1976
    let dates = future_month_ends(date(1971, 12, 31), 60).unwrap();
    let values = (0..60).map(|i| 2000.0 + 10.0 * i as f64).collect();
    let forecast = ForecastSeries::new(dates, values).unwrap();

    DashboardData::new(history, forecast, &PipelineConfig::default()).unwrap()
}

#[rstest]
fn test_welcome_page(data: DashboardData) {
    let state = DashboardState::new(Page::Welcome, &PipelineConfig::default().display);
    let view = render(&state, &data).unwrap();

    let View::Welcome(welcome) = &view else {
        panic!("expected the welcome page, got {:?}", view);
    };
    assert_eq!(welcome.title, APP_TITLE);
    assert!(welcome.guidance.contains("Predicted Data"));
    assert!(view.to_text().starts_with(APP_TITLE));
}

#[rstest]
#[case(1972, 1)]
#[case(1974, 3)]
#[case(1976, 5)]
#[case(1999, 5)]
fn test_chart_panels_per_year(data: DashboardData, #[case] end_year: i32, #[case] panels: usize) {
    let state = DashboardState::new(Page::PredictedData, &PipelineConfig::default().display)
        .with_end_year(end_year);

    let View::Chart(chart) = render(&state, &data).unwrap() else {
        panic!("expected the chart page");
    };
    assert_eq!(chart.panels.len(), panels);
    assert_eq!(chart.forecast.len(), panels * 12);
    assert_eq!(chart.history.len(), 36);
    assert!(chart.panels.iter().all(|panel| panel.points.len() == 12));
}

#[rstest]
fn test_chart_titles(data: DashboardData) {
    let state = DashboardState::new(Page::PredictedData, &PipelineConfig::default().display)
        .with_end_year(1973);

    let View::Chart(chart) = render(&state, &data).unwrap() else {
        panic!("expected the chart page");
    };
    assert_eq!(chart.combined_title, "Combined Forecast (1972 - 1973)");
    let titles: Vec<_> = chart.panels.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Forecasted Revenue - 1972", "Forecasted Revenue - 1973"]
    );
    assert_eq!(chart.panels[1].heading, "Forecast for 1973");
    assert_eq!(chart.panels[1].points[0].date, date(1973, 1, 31));
}

#[rstest]
fn test_table_page(data: DashboardData) {
    let state = DashboardState::new(Page::ForecastTable, &PipelineConfig::default().display)
        .with_end_year(1972);

    let View::Table(table) = render(&state, &data).unwrap() else {
        panic!("expected the table page");
    };
    assert_eq!(table.rows.len(), 12);
    assert_eq!(table.rows[0].date, date(1972, 1, 31));
    assert_eq!(table.rows[0].forecasted_revenue, "$2,000.00");
    assert_eq!(table.file_name, "forecast_data.csv");

    let mut lines = table.csv.lines();
    assert_eq!(lines.next(), Some("Date,Forecasted Revenue"));
    assert_eq!(lines.next(), Some("1972-01-31,2000"));
    assert_eq!(table.csv.lines().count(), 13);
}

#[rstest]
fn test_view_serializes_with_page_tag(data: DashboardData) {
    let state = DashboardState::new(Page::ForecastTable, &PipelineConfig::default().display);
    let view = render(&state, &data).unwrap();

    let json: serde_json::Value = serde_json::to_value(&view).unwrap();
    assert_eq!(json["page"], "table");
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(60));
}
