//! Automatic order selection for seasonal ARIMA models
//!
//! Differencing orders are chosen by tests first (seasonal strength for `D`,
//! KPSS for `d`), then the `(p, q)(P, Q)` orders are searched by AIC either
//! stepwise from a few starting points or over a bounded grid.

use crate::error::{ForecastError, Result};
use crate::models::sarima::{SarimaModel, SarimaOrder};
use crate::models::{FittedModel, ForecastEngine, SearchConfig};
use crate::regularize::CanonicalSeries;
use series_math::{is_flat, regular_diffs, seasonal_diffs, Differenced, Differencing};
use std::collections::HashSet;
use tracing::{debug, info};

/// Smallest series accepted when no seasonal terms are searched
const MIN_OBSERVATIONS: usize = 3;

/// Forecast engine that picks a seasonal ARIMA order automatically
#[derive(Debug, Clone, Default)]
pub struct AutoSarima {
    config: SearchConfig,
}

impl AutoSarima {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Validate the series and return its values
    fn check_series(&self, series: &CanonicalSeries) -> Result<Vec<f64>> {
        if series.is_empty() {
            return Err(ForecastError::ModelFit(
                "Cannot fit a model to an empty series".to_string(),
            ));
        }

        let values = series.complete_values()?;
        let required = if self.config.uses_seasonality() {
            2 * self.config.period
        } else {
            MIN_OBSERVATIONS
        };
        if values.len() < required {
            return Err(ForecastError::ModelFit(format!(
                "Need at least {} observations, have {}",
                required,
                values.len()
            )));
        }
        if is_flat(&values) {
            return Err(ForecastError::ModelFit(
                "Cannot fit a model to a constant series".to_string(),
            ));
        }

        Ok(values)
    }

    /// Choose `(d, D)` for the series
    fn differencing_orders(&self, values: &[f64]) -> Result<(usize, usize)> {
        let period = self.config.period;
        let seasonal_d = if self.config.uses_seasonality() {
            seasonal_diffs(values, period, self.config.max_seasonal_d).map_err(fit_error)?
        } else {
            0
        };

        let deseasonalized = Differencing::new()
            .seasonal(period, seasonal_d)
            .apply(values)
            .map_err(fit_error)?;
        let d = regular_diffs(deseasonalized.values(), self.config.max_d).map_err(fit_error)?;

        Ok((d, seasonal_d))
    }
}

fn fit_error(err: series_math::MathError) -> ForecastError {
    ForecastError::ModelFit(err.to_string())
}

impl ForecastEngine for AutoSarima {
    type Model = SarimaModel;

    fn fit(&self, series: &CanonicalSeries) -> Result<SarimaModel> {
        let values = self.check_series(series)?;
        let (d, seasonal_d) = self.differencing_orders(&values)?;
        debug!(d, seasonal_d, observations = values.len(), "Chose differencing orders");

        let period = if self.config.uses_seasonality() {
            self.config.period
        } else {
            1
        };
        let differenced = Differencing::new()
            .seasonal(period, seasonal_d)
            .regular(d)
            .apply(&values)
            .map_err(fit_error)?;

        let mut search = Search::new(&self.config, &differenced, d, seasonal_d, period);
        if self.config.stepwise {
            search.stepwise();
        } else {
            search.exhaustive();
        }

        let evaluated = search.evaluated;
        let model = search.best.ok_or_else(|| {
            ForecastError::ModelFit(format!(
                "None of the {} candidate models could be estimated",
                evaluated
            ))
        })?;

        info!(
            model = model.name(),
            aic = model.aic(),
            candidates = evaluated,
            "Selected forecasting model"
        );
        Ok(model)
    }

    fn name(&self) -> &str {
        "AutoSARIMA"
    }
}

/// Orders searched over, plus the constant flag
type Candidate = (usize, usize, usize, usize, bool);

/// Neighbourhood moves on `(p, q, P, Q)`, seasonal moves first
const STEPWISE_MOVES: [(i64, i64, i64, i64); 16] = [
    (0, 0, -1, 0),
    (0, 0, 1, 0),
    (0, 0, 0, -1),
    (0, 0, 0, 1),
    (0, 0, -1, -1),
    (0, 0, -1, 1),
    (0, 0, 1, -1),
    (0, 0, 1, 1),
    (-1, 0, 0, 0),
    (1, 0, 0, 0),
    (0, -1, 0, 0),
    (0, 1, 0, 0),
    (-1, -1, 0, 0),
    (-1, 1, 0, 0),
    (1, -1, 0, 0),
    (1, 1, 0, 0),
];

struct Search<'a> {
    config: &'a SearchConfig,
    differenced: &'a Differenced,
    d: usize,
    seasonal_d: usize,
    period: usize,
    allow_constant: bool,
    tried: HashSet<Candidate>,
    evaluated: usize,
    best: Option<SarimaModel>,
    best_candidate: Option<Candidate>,
}

impl<'a> Search<'a> {
    fn new(
        config: &'a SearchConfig,
        differenced: &'a Differenced,
        d: usize,
        seasonal_d: usize,
        period: usize,
    ) -> Self {
        Self {
            config,
            differenced,
            d,
            seasonal_d,
            period,
            allow_constant: d + seasonal_d <= 1,
            tried: HashSet::new(),
            evaluated: 0,
            best: None,
            best_candidate: None,
        }
    }

    fn seasonal(&self) -> bool {
        self.period > 1
    }

    fn in_bounds(&self, candidate: Candidate) -> bool {
        let (p, q, seasonal_p, seasonal_q, constant) = candidate;
        let seasonal_ok = if self.seasonal() {
            seasonal_p <= self.config.max_seasonal_p && seasonal_q <= self.config.max_seasonal_q
        } else {
            seasonal_p == 0 && seasonal_q == 0
        };
        p <= self.config.max_p
            && q <= self.config.max_q
            && seasonal_ok
            && (self.allow_constant || !constant)
    }

    /// Estimate a candidate once; true when it becomes the new best
    fn evaluate(&mut self, candidate: Candidate) -> bool {
        if !self.in_bounds(candidate) || !self.tried.insert(candidate) {
            return false;
        }
        self.evaluated += 1;

        let (p, q, seasonal_p, seasonal_q, constant) = candidate;
        let order = SarimaOrder {
            p,
            d: self.d,
            q,
            seasonal_p,
            seasonal_d: self.seasonal_d,
            seasonal_q,
            period: self.period,
        };

        let Some(model) = SarimaModel::estimate(order, constant, self.differenced) else {
            debug!(%order, constant, "Candidate could not be estimated");
            return false;
        };
        debug!(model = model.name(), aic = model.aic(), "Estimated candidate");

        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| model.aic() < best.aic());
        if improves {
            self.best = Some(model);
            self.best_candidate = Some(candidate);
        }
        improves
    }

    fn budget_left(&self) -> bool {
        self.evaluated < self.config.max_models
    }

    fn clip(&self, p: usize, q: usize, seasonal_p: usize, seasonal_q: usize) -> Candidate {
        let (seasonal_p, seasonal_q) = if self.seasonal() {
            (
                seasonal_p.min(self.config.max_seasonal_p),
                seasonal_q.min(self.config.max_seasonal_q),
            )
        } else {
            (0, 0)
        };
        (
            p.min(self.config.max_p),
            q.min(self.config.max_q),
            seasonal_p,
            seasonal_q,
            self.allow_constant,
        )
    }

    /// Move to the first improving neighbour until none improves
    fn stepwise(&mut self) {
        let starts = [
            self.clip(2, 2, 1, 1),
            self.clip(0, 0, 0, 0),
            self.clip(1, 0, 1, 0),
            self.clip(0, 1, 0, 1),
        ];
        for start in starts {
            if self.budget_left() {
                self.evaluate(start);
            }
        }

        while let Some(current) = self.best_candidate {
            let mut moved = false;

            for neighbour in self.neighbours(current) {
                if !self.budget_left() {
                    return;
                }
                if self.evaluate(neighbour) {
                    moved = true;
                    break;
                }
            }

            if !moved {
                break;
            }
        }
    }

    fn neighbours(&self, current: Candidate) -> Vec<Candidate> {
        let (p, q, seasonal_p, seasonal_q, constant) = current;
        let shift = |value: usize, delta: i64| usize::try_from(value as i64 + delta).ok();

        let mut neighbours: Vec<Candidate> = STEPWISE_MOVES
            .iter()
            .filter_map(|&(dp, dq, dsp, dsq)| {
                Some((
                    shift(p, dp)?,
                    shift(q, dq)?,
                    shift(seasonal_p, dsp)?,
                    shift(seasonal_q, dsq)?,
                    constant,
                ))
            })
            .collect();
        neighbours.push((p, q, seasonal_p, seasonal_q, !constant));
        neighbours
    }

    /// Every candidate with `p + q + P + Q <= max_order`
    fn exhaustive(&mut self) {
        let (max_seasonal_p, max_seasonal_q) = if self.seasonal() {
            (self.config.max_seasonal_p, self.config.max_seasonal_q)
        } else {
            (0, 0)
        };
        let constants: &[bool] = if self.allow_constant {
            &[true, false]
        } else {
            &[false]
        };

        for p in 0..=self.config.max_p {
            for q in 0..=self.config.max_q {
                for seasonal_p in 0..=max_seasonal_p {
                    for seasonal_q in 0..=max_seasonal_q {
                        if p + q + seasonal_p + seasonal_q > self.config.max_order {
                            continue;
                        }
                        for &constant in constants {
                            self.evaluate((p, q, seasonal_p, seasonal_q, constant));
                        }
                    }
                }
            }
        }
    }
}
