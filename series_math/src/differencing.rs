//! Differencing passes and their inverse
//!
//! A [`Differencing`] is an ordered list of lag-`k` passes. Seasonal passes use
//! the seasonal period as lag, regular passes use lag 1. Applying it yields a
//! [`Differenced`] series that keeps every intermediate level so forecasts made
//! on the differenced scale can be mapped back onto the original scale.

use crate::{MathError, Result};

/// Lag-`lag` difference: `values[t] - values[t - lag]`
pub fn difference(values: &[f64], lag: usize) -> Vec<f64> {
    values
        .iter()
        .skip(lag)
        .zip(values.iter())
        .map(|(current, previous)| current - previous)
        .collect()
}

/// Ordered sequence of differencing passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Differencing {
    lags: Vec<usize>,
}

impl Differencing {
    /// Create a differencing plan with no passes
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` seasonal passes at lag `period`
    pub fn seasonal(mut self, period: usize, count: usize) -> Self {
        self.lags.extend(std::iter::repeat(period).take(count));
        self
    }

    /// Append `count` regular (lag 1) passes
    pub fn regular(mut self, count: usize) -> Self {
        self.lags.extend(std::iter::repeat(1).take(count));
        self
    }

    /// Lags of the passes, in application order
    pub fn lags(&self) -> &[usize] {
        &self.lags
    }

    /// Number of observations consumed by all passes
    pub fn consumed(&self) -> usize {
        self.lags.iter().sum()
    }

    /// Whether the plan leaves the series untouched
    pub fn is_identity(&self) -> bool {
        self.lags.is_empty()
    }

    /// Apply every pass in order
    pub fn apply(&self, values: &[f64]) -> Result<Differenced> {
        let mut levels = Vec::with_capacity(self.lags.len());
        let mut current = values.to_vec();

        for &lag in &self.lags {
            if lag == 0 {
                return Err(MathError::InvalidInput(
                    "Differencing lag must be greater than zero".to_string(),
                ));
            }
            if current.len() <= lag {
                return Err(MathError::InsufficientData(format!(
                    "Lag-{} difference needs more than {} values, have {}.",
                    lag,
                    lag,
                    current.len()
                )));
            }

            let next = difference(&current, lag);
            levels.push((lag, current));
            current = next;
        }

        Ok(Differenced {
            values: current,
            levels,
        })
    }
}

/// A differenced series together with the levels it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Differenced {
    values: Vec<f64>,
    levels: Vec<(usize, Vec<f64>)>,
}

impl Differenced {
    /// The fully differenced values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of differencing passes that produced this series
    pub fn passes(&self) -> usize {
        self.levels.len()
    }

    /// Map values that continue the differenced series back onto the original scale.
    ///
    /// `continuation[0]` is taken to follow the last differenced value directly.
    pub fn integrate(&self, continuation: &[f64]) -> Vec<f64> {
        let mut current = continuation.to_vec();

        for (lag, level) in self.levels.iter().rev() {
            let mut extended = level.clone();
            for value in &current {
                let base = extended[extended.len() - lag];
                extended.push(value + base);
            }
            current = extended.split_off(level.len());
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_difference_lags() {
        let values = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        assert_eq!(difference(&values, 1), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&values, 2), vec![8.0, 12.0, 16.0]);
        assert!(difference(&values, 5).is_empty());
    }

    #[test]
    fn test_identity_plan() {
        let plan = Differencing::new();
        assert!(plan.is_identity());

        let values = vec![3.0, 1.0, 2.0];
        let differenced = plan.apply(&values).unwrap();
        assert_eq!(differenced.values(), values.as_slice());
        assert_eq!(differenced.integrate(&[7.0]), vec![7.0]);
    }

    #[test]
    fn test_integrate_inverts_seasonal_then_regular() {
        let values: Vec<f64> = (0..30)
            .map(|t| 100.0 + 2.0 * t as f64 + [5.0, -3.0, 1.0, -3.0][t % 4])
            .collect();
        let plan = Differencing::new().seasonal(4, 1).regular(1);
        assert_eq!(plan.consumed(), 5);

        let (head, tail) = values.split_at(24);
        let differenced = plan.apply(head).unwrap();
        assert_eq!(differenced.passes(), 2);

        // Differencing the full series gives the exact continuation of the head.
        let full = plan.apply(&values).unwrap();
        let continuation = &full.values()[differenced.values().len()..];

        let restored = differenced.integrate(continuation);
        assert_eq!(restored.len(), tail.len());
        for (restored, expected) in restored.iter().zip(tail) {
            assert_relative_eq!(*restored, *expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_apply_rejects_short_series() {
        let plan = Differencing::new().seasonal(12, 1);
        let result = plan.apply(&[1.0; 12]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));

        let result = Differencing::new().seasonal(0, 1).apply(&[1.0, 2.0]);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }
}
