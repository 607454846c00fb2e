use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use revenue_forecast::models::{FittedModel, ForecastEngine};
use revenue_forecast::regularize::CanonicalSeries;
use revenue_forecast::session::ForecastSession;
use revenue_forecast::{ForecastError, Result};
use std::cell::Cell;

/// Predicts the last observed value, counting its fits
#[derive(Debug, Default)]
struct LastValueEngine {
    fits: Cell<usize>,
}

#[derive(Debug)]
struct LastValueModel {
    last: f64,
}

impl FittedModel for LastValueModel {
    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter("zero horizon".to_string()));
        }
        Ok(vec![self.last; horizon])
    }

    fn name(&self) -> &str {
        "last value"
    }
}

impl ForecastEngine for LastValueEngine {
    type Model = LastValueModel;

    fn fit(&self, series: &CanonicalSeries) -> Result<LastValueModel> {
        self.fits.set(self.fits.get() + 1);
        let values = series.complete_values()?;
        let last = values
            .last()
            .copied()
            .ok_or_else(|| ForecastError::ModelFit("empty series".to_string()))?;
        Ok(LastValueModel { last })
    }

    fn name(&self) -> &str {
        "last value"
    }
}

fn series(values: Vec<f64>) -> CanonicalSeries {
    CanonicalSeries::from_monthly(NaiveDate::from_ymd_opt(1971, 1, 31).unwrap(), values).unwrap()
}

#[test]
fn test_fits_lazily_and_once() {
    let mut session = ForecastSession::new(LastValueEngine::default(), series(vec![1.0, 2.0, 3.0]));
    assert!(!session.is_fitted());

    let first = session.forecast(3).unwrap();
    let second = session.forecast(5).unwrap();

    assert!(session.is_fitted());
    assert_eq!(session.fit_count(), 1);
    assert_eq!(session.engine().fits.get(), 1);
    assert_eq!(first.values(), vec![3.0; 3]);
    assert_eq!(second.len(), 5);
}

#[test]
fn test_forecast_continues_month_ends() {
    let mut session = ForecastSession::new(LastValueEngine::default(), series(vec![1.0, 2.0, 3.0]));
    let forecast = session.forecast(2).unwrap();

    assert_eq!(
        forecast.dates(),
        vec![
            NaiveDate::from_ymd_opt(1971, 4, 30).unwrap(),
            NaiveDate::from_ymd_opt(1971, 5, 31).unwrap(),
        ]
    );
}

#[test]
fn test_invalidate_forces_refit() {
    let mut session = ForecastSession::new(LastValueEngine::default(), series(vec![1.0, 2.0]));
    session.model().unwrap();
    session.invalidate();
    assert!(!session.is_fitted());

    session.model().unwrap();
    assert_eq!(session.fit_count(), 2);
}

#[test]
fn test_replace_series_drops_model() {
    let mut session = ForecastSession::new(LastValueEngine::default(), series(vec![1.0, 2.0]));
    assert_eq!(session.forecast(1).unwrap().values(), vec![2.0]);

    session.replace_series(series(vec![7.0, 9.0]));
    assert!(!session.is_fitted());
    assert_eq!(session.forecast(1).unwrap().values(), vec![9.0]);
    assert_eq!(session.fit_count(), 2);
}

#[test]
fn test_failed_fit_is_not_cached() {
    let mut session = ForecastSession::new(LastValueEngine::default(), CanonicalSeries::default());

    assert!(matches!(session.forecast(3), Err(ForecastError::ModelFit(_))));
    assert!(session.model().is_err());
    assert!(!session.is_fitted());
}

#[test]
fn test_zero_horizon() {
    let mut session = ForecastSession::new(LastValueEngine::default(), series(vec![1.0]));
    assert!(matches!(session.forecast(0), Err(ForecastError::InvalidParameter(_))));
}
