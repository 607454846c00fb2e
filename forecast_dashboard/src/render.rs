//! Dashboard state and the pure state-to-view renderer

use crate::view::{ChartView, TableRow, TableView, View, WelcomeView, YearPanel};
use crate::{DashboardError, Result, APP_SUBTITLE, APP_TITLE};
use revenue_forecast::assembler::ForecastSeries;
use revenue_forecast::config::{DisplayConfig, PipelineConfig};
use revenue_forecast::export::{forecast_csv_bytes, forecast_rows, format_currency};
use revenue_forecast::regularize::CanonicalSeries;
use revenue_forecast::window::YearWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Welcome,
    PredictedData,
    ForecastTable,
}

impl Page {
    /// Menu order
    pub const ALL: [Page; 3] = [Page::Welcome, Page::PredictedData, Page::ForecastTable];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::PredictedData => "Predicted Data",
            Page::ForecastTable => "Forecast Table",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub page: Page,
    /// Last year shown; the first is always the lower display bound
    pub end_year: i32,
}

impl DashboardState {
    pub fn new(page: Page, display: &DisplayConfig) -> Self {
        Self {
            page,
            end_year: display.default_end_year,
        }
    }

    pub fn with_end_year(mut self, end_year: i32) -> Self {
        self.end_year = end_year;
        self
    }

    /// The selected window: starts at the lower bound, end year clamped to the bounds
    pub fn window(&self, bounds: &YearWindow) -> Result<YearWindow> {
        let end = self.end_year.clamp(bounds.start(), bounds.end());
        Ok(YearWindow::new(bounds.start(), end)?)
    }
}

/// Pipeline outputs the pages are drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub history: CanonicalSeries,
    pub forecast: ForecastSeries,
    /// Years the end-year selector may take
    pub bounds: YearWindow,
    pub export_file_name: String,
}

impl DashboardData {
    pub fn new(
        history: CanonicalSeries,
        forecast: ForecastSeries,
        config: &PipelineConfig,
    ) -> Result<Self> {
        Ok(Self {
            history,
            forecast,
            bounds: config.display.bounds()?,
            export_file_name: config.export.file_name.clone(),
        })
    }
}

/// Build the view for the selected page
pub fn render(state: &DashboardState, data: &DashboardData) -> Result<View> {
    match state.page {
        Page::Welcome => Ok(View::Welcome(welcome())),
        Page::PredictedData => Ok(View::Chart(chart(state, data)?)),
        Page::ForecastTable => Ok(View::Table(table(state, data)?)),
    }
}

fn welcome() -> WelcomeView {
    WelcomeView {
        title: APP_TITLE.to_string(),
        subtitle: APP_SUBTITLE.to_string(),
        heading: "Welcome to the Revenue Forecasting App!".to_string(),
        guidance: "Navigate to 'Predicted Data' to view the forecast graph or 'Forecast Table' \
                   for the data table and download option."
            .to_string(),
    }
}

fn chart(state: &DashboardState, data: &DashboardData) -> Result<ChartView> {
    let window = state.window(&data.bounds)?;

    let panels = window
        .years()
        .map(|year| -> Result<YearPanel> {
            let year_window = YearWindow::new(year, year)?;
            Ok(YearPanel {
                year,
                heading: format!("Forecast for {}", year),
                title: format!("Forecasted Revenue - {}", year),
                points: data.forecast.within(&year_window),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartView {
        title: APP_TITLE.to_string(),
        heading: "5-Year Revenue Forecast".to_string(),
        combined_title: format!("Combined Forecast ({})", window),
        window,
        history: data.history.observations().to_vec(),
        forecast: data.forecast.within(&window),
        panels,
    })
}

fn table(state: &DashboardState, data: &DashboardData) -> Result<TableView> {
    let window = state.window(&data.bounds)?;
    let rows = forecast_rows(&data.forecast, &window);

    let csv = String::from_utf8(forecast_csv_bytes(&rows)?)
        .map_err(|e| DashboardError::InvalidState(format!("CSV payload is not UTF-8: {}", e)))?;

    Ok(TableView {
        title: APP_TITLE.to_string(),
        heading: "Forecasted Revenue Data".to_string(),
        window,
        rows: rows
            .iter()
            .map(|row| TableRow {
                date: row.date,
                forecasted_revenue: format_currency(row.forecasted_revenue),
            })
            .collect(),
        csv,
        file_name: data.export_file_name.clone(),
        download_label: "💾 Download Forecast Data as CSV".to_string(),
    })
}
