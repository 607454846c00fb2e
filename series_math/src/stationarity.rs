//! Stationarity and seasonality tests used to pick differencing orders
//!
//! - KPSS level-stationarity statistic (regular differencing order `d`)
//! - Seasonal strength from a classical additive decomposition
//!   (seasonal differencing order `D`)

use crate::differencing::difference;
use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// KPSS critical value for level stationarity at the 5% significance level
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// Seasonal strength above which one seasonal difference is taken
pub const SEASONAL_STRENGTH_THRESHOLD: f64 = 0.64;

const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Whether every value equals the first one, up to rounding noise
pub fn is_flat(values: &[f64]) -> bool {
    match values.first() {
        None => true,
        Some(first) => {
            let tolerance = RELATIVE_TOLERANCE * first.abs().max(1.0);
            values.iter().all(|v| (v - first).abs() <= tolerance)
        }
    }
}

/// KPSS statistic for the null hypothesis of level stationarity.
///
/// Uses a Bartlett-weighted long-run variance with bandwidth `⌊3√n / 13⌋`.
/// A series with zero long-run variance yields `0.0`.
pub fn kpss_level_statistic(values: &[f64]) -> Result<f64> {
    let n = values.len();
    if n < 3 {
        return Err(MathError::InsufficientData(format!(
            "KPSS test needs at least 3 values, have {}.",
            n
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "KPSS test requires finite values".to_string(),
        ));
    }

    let nf = n as f64;
    let mean = values.iter().mean();
    let residuals: Vec<f64> = values.iter().map(|v| v - mean).collect();

    let autocovariance = |lag: usize| -> f64 {
        residuals[lag..]
            .iter()
            .zip(residuals.iter())
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / nf
    };

    let bandwidth = ((3.0 * nf.sqrt() / 13.0).floor() as usize).min(n - 1);
    let mut long_run = autocovariance(0);
    for lag in 1..=bandwidth {
        let weight = 1.0 - lag as f64 / (bandwidth as f64 + 1.0);
        long_run += 2.0 * weight * autocovariance(lag);
    }

    if long_run <= RELATIVE_TOLERANCE * (1.0 + mean * mean) {
        return Ok(0.0);
    }

    let mut partial = 0.0;
    let mut eta = 0.0;
    for residual in &residuals {
        partial += residual;
        eta += partial * partial;
    }

    Ok(eta / (nf * nf * long_run))
}

/// Number of regular differences (at most `max_d`) needed for the KPSS test to
/// stop rejecting level stationarity.
pub fn regular_diffs(values: &[f64], max_d: usize) -> Result<usize> {
    let mut order = 0;
    let mut current = values.to_vec();

    while order < max_d
        && current.len() >= 3
        && !is_flat(&current)
        && kpss_level_statistic(&current)? > KPSS_CRITICAL_5PCT
    {
        current = difference(&current, 1);
        order += 1;
    }

    Ok(order)
}

/// Seasonal strength `max(0, 1 - Var(R) / Var(S + R))` from a classical
/// additive decomposition with a centred moving-average trend.
///
/// Needs at least two full cycles. A series with no variation around its
/// trend has strength `0.0`.
pub fn seasonal_strength(values: &[f64], period: usize) -> Result<f64> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Seasonal period must be at least 2".to_string(),
        ));
    }
    if values.len() < 2 * period {
        return Err(MathError::InsufficientData(format!(
            "Seasonal decomposition needs at least {} values, have {}.",
            2 * period,
            values.len()
        )));
    }

    let trend = centered_moving_average(values, period);
    let detrended: Vec<Option<f64>> = values
        .iter()
        .zip(trend.iter())
        .map(|(value, trend)| trend.map(|t| value - t))
        .collect();

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (index, value) in detrended.iter().enumerate() {
        if let Some(value) = value {
            sums[index % period] += value;
            counts[index % period] += 1;
        }
    }

    let mut indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();
    let index_mean = indices.iter().mean();
    for index in &mut indices {
        *index -= index_mean;
    }

    let mut remainder = Vec::with_capacity(values.len());
    let mut seasonal_and_remainder = Vec::with_capacity(values.len());
    for (index, value) in detrended.iter().enumerate() {
        if let Some(value) = value {
            remainder.push(value - indices[index % period]);
            seasonal_and_remainder.push(*value);
        }
    }

    let total_variance = seasonal_and_remainder.iter().variance();
    let scale = values.iter().variance().max(1.0);
    if !total_variance.is_finite() || total_variance <= RELATIVE_TOLERANCE * scale {
        return Ok(0.0);
    }

    let remainder_variance = remainder.iter().variance();
    Ok((1.0 - remainder_variance / total_variance).max(0.0))
}

/// Number of seasonal differences (at most `max_seasonal_d`) while the series
/// shows strong seasonality.
pub fn seasonal_diffs(values: &[f64], period: usize, max_seasonal_d: usize) -> Result<usize> {
    let mut order = 0;
    let mut current = values.to_vec();

    while order < max_seasonal_d
        && current.len() >= 2 * period
        && seasonal_strength(&current, period)? > SEASONAL_STRENGTH_THRESHOLD
    {
        current = difference(&current, period);
        order += 1;
    }

    Ok(order)
}

/// Centred moving average of order `period` (a 2×m average for even periods)
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let mut trend = vec![None; n];
    if n <= 2 * half {
        return trend;
    }

    for t in half..n - half {
        let average = if period % 2 == 0 {
            let inner: f64 = values[t + 1 - half..t + half].iter().sum();
            (0.5 * values[t - half] + inner + 0.5 * values[t + half]) / period as f64
        } else {
            values[t - half..=t + half].iter().sum::<f64>() / period as f64
        };
        trend[t] = Some(average);
    }

    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn seasonal_series(n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|t| {
                let noise = ((t * 37 % 11) as f64 - 5.0) * 0.3;
                200.0 + 1.5 * t as f64 + amplitude * (2.0 * PI * t as f64 / 12.0).sin() + noise
            })
            .collect()
    }

    #[test]
    fn test_is_flat() {
        assert!(is_flat(&[]));
        assert!(is_flat(&[5.0, 5.0, 5.0]));
        assert!(!is_flat(&[5.0, 5.0, 5.1]));
    }

    #[test]
    fn test_kpss_flags_trend() {
        let trending: Vec<f64> = (0..60).map(|t| t as f64).collect();
        let statistic = kpss_level_statistic(&trending).unwrap();
        assert!(statistic > KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_kpss_accepts_level_series() {
        let level: Vec<f64> = (0..60).map(|t| (t * 37 % 11) as f64 - 5.0).collect();
        let statistic = kpss_level_statistic(&level).unwrap();
        assert!(statistic < KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_kpss_constant_series() {
        assert_eq!(kpss_level_statistic(&[2.0; 10]).unwrap(), 0.0);
        assert!(kpss_level_statistic(&[1.0, 2.0]).is_err());
    }

    #[rstest]
    #[case(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0], 1)]
    #[case(vec![1.0; 20], 0)]
    fn test_regular_diffs(#[case] values: Vec<f64>, #[case] expected: usize) {
        assert_eq!(regular_diffs(&values, 2).unwrap(), expected);
    }

    #[test]
    fn test_seasonal_strength_detects_annual_cycle() {
        let strong = seasonal_strength(&seasonal_series(96, 60.0), 12).unwrap();
        assert!(strong > SEASONAL_STRENGTH_THRESHOLD);

        let weak = seasonal_strength(&seasonal_series(96, 0.0), 12).unwrap();
        assert!(weak < SEASONAL_STRENGTH_THRESHOLD);
    }

    #[test]
    fn test_seasonal_strength_of_straight_line_is_zero() {
        let line: Vec<f64> = (0..36).map(|t| 1000.0 + t as f64).collect();
        assert_eq!(seasonal_strength(&line, 12).unwrap(), 0.0);
    }

    #[test]
    fn test_seasonal_diffs() {
        assert_eq!(seasonal_diffs(&seasonal_series(96, 60.0), 12, 1).unwrap(), 1);
        assert_eq!(seasonal_diffs(&seasonal_series(96, 60.0), 12, 0).unwrap(), 0);
        assert!(seasonal_strength(&[1.0; 10], 12).is_err());
    }
}
