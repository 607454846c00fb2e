use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use forecast_dashboard::{render, DashboardData, DashboardState, Page};
use revenue_forecast::config::PipelineConfig;
use revenue_forecast::export::export_forecast;
use revenue_forecast::pipeline::session_from_config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(version, about = "Five-year revenue forecast in the terminal")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input CSV, overriding the configured path
    #[arg(long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Print the page as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Title and navigation hints
    Welcome,
    /// Combined chart data and one panel per year
    Predicted(WindowArgs),
    /// Forecast table with CSV export
    Table(TableArgs),
}

#[derive(Args)]
struct WindowArgs {
    /// Last year to show; the first is the lower display bound
    #[arg(long)]
    end_year: Option<i32>,
}

#[derive(Args)]
struct TableArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Write the CSV download to this file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.input.path = data.clone();
    }
    Ok(config)
}

/// Page, end year and export path chosen by a subcommand
fn selection(cmd: Cmd) -> (Page, Option<i32>, Option<PathBuf>) {
    match cmd {
        Cmd::Welcome => (Page::Welcome, None, None),
        Cmd::Predicted(args) => (Page::PredictedData, args.end_year, None),
        Cmd::Table(args) => (Page::ForecastTable, args.window.end_year, args.output),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_dashboard=info,revenue_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let (page, end_year, output) = selection(cli.cmd.unwrap_or(Cmd::Welcome));

    let mut session = session_from_config(&config)
        .with_context(|| format!("preparing {}", config.input.path.display()))?;
    let forecast = session
        .forecast(config.forecast.horizon)
        .context("forecasting revenue")?;
    let data = DashboardData::new(session.series().clone(), forecast, &config)?;

    let mut state = DashboardState::new(page, &config.display);
    if let Some(end_year) = end_year {
        state = state.with_end_year(end_year);
    }

    if let Some(path) = output {
        let window = state.window(&data.bounds)?;
        let rows = export_forecast(&data.forecast, &window, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows, "Wrote forecast CSV");
    }

    let view = render(&state, &data)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.to_text());
    }

    Ok(())
}
