//! Rendered pages

use chrono::NaiveDate;
use revenue_forecast::assembler::ForecastPoint;
use revenue_forecast::export::format_currency;
use revenue_forecast::loader::Observation;
use revenue_forecast::window::YearWindow;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum View {
    Welcome(WelcomeView),
    Chart(ChartView),
    Table(TableView),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeView {
    pub title: String,
    pub subtitle: String,
    pub heading: String,
    pub guidance: String,
}

/// Combined history and forecast chart plus one panel per selected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub title: String,
    pub heading: String,
    pub combined_title: String,
    pub window: YearWindow,
    /// The full history, not filtered by the window
    pub history: Vec<Observation>,
    /// Forecast points inside the window
    pub forecast: Vec<ForecastPoint>,
    pub panels: Vec<YearPanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPanel {
    pub year: i32,
    pub heading: String,
    pub title: String,
    pub points: Vec<ForecastPoint>,
}

/// Currency-formatted forecast rows and the matching CSV download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    pub heading: String,
    pub window: YearWindow,
    pub rows: Vec<TableRow>,
    /// Raw-precision CSV payload
    pub csv: String,
    pub file_name: String,
    pub download_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub forecasted_revenue: String,
}

impl View {
    /// Plain-text rendering for a terminal
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        self.write_text(&mut out).ok();
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        match self {
            View::Welcome(view) => write_welcome(out, view),
            View::Chart(view) => write_chart(out, view),
            View::Table(view) => write_table(out, view),
        }
    }
}

fn write_welcome(out: &mut String, view: &WelcomeView) -> std::fmt::Result {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "{}", view.subtitle)?;
    writeln!(out)?;
    writeln!(out, "{}", view.heading)?;
    writeln!(out, "{}", view.guidance)
}

fn write_chart(out: &mut String, view: &ChartView) -> std::fmt::Result {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "{}", view.heading)?;
    writeln!(out)?;
    writeln!(out, "{}", view.combined_title)?;

    let first = view.history.first().map(|o| o.date);
    let last = view.history.last().map(|o| o.date);
    if let (Some(first), Some(last)) = (first, last) {
        writeln!(
            out,
            "  Historical Revenue: {} months ({} to {})",
            view.history.len(),
            first,
            last
        )?;
    }
    writeln!(
        out,
        "  Forecasted Revenue (Selected Years): {} months",
        view.forecast.len()
    )?;

    for panel in &view.panels {
        writeln!(out)?;
        writeln!(out, "{}", panel.title)?;
        for point in &panel.points {
            writeln!(
                out,
                "  {}  {:>16}",
                point.date.format("%b %Y"),
                format_currency(point.value)
            )?;
        }
    }
    Ok(())
}

fn write_table(out: &mut String, view: &TableView) -> std::fmt::Result {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "{}", view.heading)?;
    writeln!(out)?;
    writeln!(out, "{:<12}{:>20}", "Date", "Forecasted Revenue")?;
    for row in &view.rows {
        writeln!(out, "{:<12}{:>20}", row.date.to_string(), row.forecasted_revenue)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{}: {} ({} rows)",
        view.download_label,
        view.file_name,
        view.rows.len()
    )
}
