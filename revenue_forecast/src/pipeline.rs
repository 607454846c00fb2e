//! Wiring of the data stages: normalize, load, regularize

use crate::config::PipelineConfig;
use crate::data::{DataLoader, RawTable};
use crate::error::Result;
use crate::loader::TimeSeriesLoader;
use crate::models::AutoSarima;
use crate::regularize::{CanonicalSeries, Regularizer};
use crate::session::ForecastSession;
use std::path::Path;
use tracing::debug;

/// Turn a raw table into a canonical series
pub fn prepare_series(table: RawTable, config: &PipelineConfig) -> Result<CanonicalSeries> {
    let table = config.input.month_column.normalize(table)?;
    let loaded = TimeSeriesLoader::from_config(&config.input).load(&table)?;
    let series = Regularizer::from_config(&config.regularize).regularize(&loaded)?;

    debug!(
        loaded = loaded.len(),
        canonical = series.len(),
        first = ?series.first_date(),
        last = ?series.last_date(),
        "Prepared series"
    );
    Ok(series)
}

/// Read a CSV file and prepare its series
pub fn load_series<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<CanonicalSeries> {
    let table = DataLoader::from_csv(path)?;
    prepare_series(table, config)
}

/// A session over the configured input file using the automatic seasonal engine
pub fn session_from_config(config: &PipelineConfig) -> Result<ForecastSession<AutoSarima>> {
    let series = load_series(&config.input.path, config)?;
    let engine = AutoSarima::new(config.model.clone())?;
    Ok(ForecastSession::new(engine, series))
}
