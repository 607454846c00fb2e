//! Seasonal ARIMA models estimated by two-stage Hannan–Rissanen regression
//!
//! The differenced series `w` is modelled as
//!
//! ```text
//! w[t] = c + Σ φ_a · w[t - a] + Σ θ_b · e[t - b] + e[t]
//! ```
//!
//! where the AR lags `a` and MA lags `b` come from the multiplicative expansion
//! `{i + j·m}` of the regular and seasonal orders. Each lag gets its own
//! coefficient. A long autoregression provides the innovation proxies `e`, and
//! a second least-squares pass estimates all coefficients at once.

use crate::error::{ForecastError, Result};
use crate::models::{check_horizon, FittedModel};
use series_math::{least_squares, Differenced};
use statrs::statistics::Statistics;
use std::fmt;

/// Orders of a `SARIMA(p,d,q)(P,D,Q)[m]` model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SarimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl SarimaOrder {
    /// A non-seasonal `ARIMA(p,d,q)` order
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            seasonal_p: 0,
            seasonal_d: 0,
            seasonal_q: 0,
            period: 1,
        }
    }

    pub fn is_seasonal(&self) -> bool {
        self.period > 1
    }

    /// Autoregressive lags, ascending
    pub fn ar_lags(&self) -> Vec<usize> {
        lag_set(self.p, self.seasonal_p, self.period)
    }

    /// Moving-average lags, ascending
    pub fn ma_lags(&self) -> Vec<usize> {
        lag_set(self.q, self.seasonal_q, self.period)
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_seasonal() {
            write!(
                f,
                "SARIMA({},{},{})({},{},{})[{}]",
                self.p, self.d, self.q, self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
            )
        } else {
            write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
        }
    }
}

fn lag_set(regular: usize, seasonal: usize, period: usize) -> Vec<usize> {
    let period = if seasonal > 0 { period.max(1) } else { 0 };
    let mut lags: Vec<usize> = (0..=seasonal)
        .flat_map(|j| (0..=regular).map(move |i| i + j * period))
        .filter(|&lag| lag > 0)
        .collect();
    lags.sort_unstable();
    lags.dedup();
    lags
}

/// A fitted seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct SarimaModel {
    name: String,
    order: SarimaOrder,
    include_constant: bool,
    constant: f64,
    ar: Vec<(usize, f64)>,
    ma: Vec<(usize, f64)>,
    differenced: Differenced,
    innovations: Vec<f64>,
    sigma2: f64,
    aic: f64,
    observations: usize,
}

impl SarimaModel {
    /// Estimate a candidate on an already differenced series.
    ///
    /// Returns `None` when the candidate cannot be estimated: too few rows for
    /// its lags or a rank-deficient regression.
    pub fn estimate(
        order: SarimaOrder,
        include_constant: bool,
        differenced: &Differenced,
    ) -> Option<Self> {
        let w = differenced.values();
        let n = w.len();
        if n == 0 || w.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let ar_lags = order.ar_lags();
        let ma_lags = order.ma_lags();
        let max_ar = ar_lags.last().copied().unwrap_or(0);
        let max_ma = ma_lags.last().copied().unwrap_or(0);

        // Stage 1: innovation proxies from a long autoregression
        let mut innovations = vec![0.0; n];
        let mut first_row = max_ar;
        if max_ma > 0 {
            let long_order = max_ar.max(max_ma) + 1;
            if n <= 2 * long_order + 1 {
                return None;
            }
            let design: Vec<Vec<f64>> = (long_order..n)
                .map(|t| {
                    std::iter::once(1.0)
                        .chain((1..=long_order).map(|lag| w[t - lag]))
                        .collect()
                })
                .collect();
            let fit = least_squares(&design, &w[long_order..]).ok()?;
            innovations[long_order..].copy_from_slice(&fit.residuals);
            first_row = first_row.max(long_order + max_ma);
        }

        // Stage 2: regress on AR lags and lagged innovations
        let columns = usize::from(include_constant) + ar_lags.len() + ma_lags.len();
        if first_row >= n || n - first_row <= columns {
            return None;
        }

        let design: Vec<Vec<f64>> = (first_row..n)
            .map(|t| {
                let mut row = Vec::with_capacity(columns);
                if include_constant {
                    row.push(1.0);
                }
                row.extend(ar_lags.iter().map(|&lag| w[t - lag]));
                row.extend(ma_lags.iter().map(|&lag| innovations[t - lag]));
                row
            })
            .collect();
        let fit = least_squares(&design, &w[first_row..]).ok()?;

        let mut coefficients = fit.coefficients.into_iter();
        let constant = if include_constant {
            coefficients.next()?
        } else {
            0.0
        };
        let ar: Vec<(usize, f64)> = ar_lags.iter().copied().zip(coefficients.by_ref()).collect();
        let ma: Vec<(usize, f64)> = ma_lags.iter().copied().zip(coefficients).collect();

        innovations[first_row..].copy_from_slice(&fit.residuals);

        let rows = n - first_row;
        let scale = w.iter().map(|v| v * v).mean();
        let sigma2 = (fit.rss / rows as f64)
            .max(scale * 1e-12)
            .max(f64::MIN_POSITIVE);
        // Scaled to the full differenced length so candidates with different
        // lag depths are compared on the same footing
        let aic = n as f64 * sigma2.ln() + 2.0 * (columns as f64 + 1.0);
        if !aic.is_finite() {
            return None;
        }

        let name = if include_constant {
            format!("{} with constant", order)
        } else {
            order.to_string()
        };

        Some(Self {
            name,
            order,
            include_constant,
            constant,
            ar,
            ma,
            differenced: differenced.clone(),
            innovations,
            sigma2,
            aic,
            observations: rows,
        })
    }

    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    pub fn include_constant(&self) -> bool {
        self.include_constant
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// `(lag, coefficient)` pairs of the autoregressive part
    pub fn ar_coefficients(&self) -> &[(usize, f64)] {
        &self.ar
    }

    /// `(lag, coefficient)` pairs of the moving-average part
    pub fn ma_coefficients(&self) -> &[(usize, f64)] {
        &self.ma
    }

    /// Residual variance of the second-stage regression
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Akaike information criterion used for model selection
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Rows used by the second-stage regression
    pub fn observations(&self) -> usize {
        self.observations
    }
}

impl FittedModel for SarimaModel {
    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        check_horizon(horizon)?;

        let mut w = self.differenced.values().to_vec();
        let mut e = self.innovations.clone();
        let n = w.len();

        for t in n..n + horizon {
            let ar: f64 = self
                .ar
                .iter()
                .map(|&(lag, coef)| coef * w[t - lag])
                .sum();
            let ma: f64 = self
                .ma
                .iter()
                .map(|&(lag, coef)| coef * e[t - lag])
                .sum();
            w.push(self.constant + ar + ma);
            e.push(0.0);
        }

        let forecast = self.differenced.integrate(&w[n..]);
        if let Some(bad) = forecast.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "{} produced a non-finite forecast at step {}",
                self.name,
                bad + 1
            )));
        }
        Ok(forecast)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
