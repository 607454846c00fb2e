//! Month-end alignment, deduplication and gap filling

use crate::config::RegularizeConfig;
use crate::error::{ForecastError, Result};
use crate::loader::{LoadedSeries, Observation};
use crate::utils::{month_end, month_end_offset, month_index};
use crate::window::YearWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// How raw dates are relabelled onto month ends when a series is first built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthEndShift {
    /// Last day of the previous calendar month, so `1964-01-01` becomes `1963-12-31`
    #[default]
    Previous,
    /// Last day of the same calendar month
    Current,
}

impl MonthEndShift {
    pub fn apply(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            MonthEndShift::Previous => month_end_offset(date, -1),
            MonthEndShift::Current => month_end(date),
        }
    }
}

/// Monthly revenue keyed by strictly increasing month-end dates.
///
/// Only a leading run of values may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeries {
    observations: Vec<Observation>,
}

impl CanonicalSeries {
    /// Build a gap-free series of monthly values starting in the month of `start`
    pub fn from_monthly(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let observations = values
            .into_iter()
            .enumerate()
            .map(|(offset, value)| {
                month_end_offset(start, offset as i64)
                    .map(|date| Observation::new(date, Some(value)))
                    .ok_or_else(|| {
                        ForecastError::InvalidParameter(format!(
                            "Month {} after {} is out of the supported date range",
                            offset, start
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.revenue).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// All values, or `ModelFit` when any of them is missing
    pub fn complete_values(&self) -> Result<Vec<f64>> {
        self.observations
            .iter()
            .map(|o| {
                o.revenue.ok_or_else(|| {
                    ForecastError::ModelFit(format!(
                        "Revenue for {} is missing and cannot be filled from an earlier month",
                        o.date
                    ))
                })
            })
            .collect()
    }

    /// Observations whose year lies in the window
    pub fn within(&self, window: &YearWindow) -> Vec<Observation> {
        self.observations
            .iter()
            .filter(|o| window.contains(o.date))
            .copied()
            .collect()
    }
}

/// Turns loaded observations into a [`CanonicalSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regularizer {
    shift: MonthEndShift,
    fill_missing_months: bool,
}

impl Default for Regularizer {
    fn default() -> Self {
        Self {
            shift: MonthEndShift::Previous,
            fill_missing_months: true,
        }
    }
}

impl Regularizer {
    pub fn new(shift: MonthEndShift, fill_missing_months: bool) -> Self {
        Self {
            shift,
            fill_missing_months,
        }
    }

    pub fn from_config(config: &RegularizeConfig) -> Self {
        Self::new(config.month_end_shift, config.fill_missing_months)
    }

    pub fn shift(&self) -> MonthEndShift {
        self.shift
    }

    /// Relabel every date with the month-end shift, then [`normalize`](Self::normalize).
    ///
    /// The shift is applied exactly once, so this is not meant to be re-run on
    /// its own output.
    pub fn regularize(&self, loaded: &LoadedSeries) -> Result<CanonicalSeries> {
        let shifted = loaded
            .observations()
            .iter()
            .map(|o| {
                self.shift
                    .apply(o.date)
                    .map(|date| Observation::new(date, o.revenue))
                    .ok_or_else(|| {
                        ForecastError::InvalidParameter(format!(
                            "Cannot shift {} to a month end",
                            o.date
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.normalize_observations(shifted)
    }

    /// Snap to month ends, drop duplicate months (first wins), sort, insert
    /// missing months and forward fill. Idempotent.
    pub fn normalize(&self, series: &CanonicalSeries) -> Result<CanonicalSeries> {
        self.normalize_observations(series.observations().to_vec())
    }

    fn normalize_observations(&self, observations: Vec<Observation>) -> Result<CanonicalSeries> {
        let input_len = observations.len();
        let mut seen = HashSet::with_capacity(input_len);
        let mut unique = Vec::with_capacity(input_len);

        for observation in observations {
            let date = month_end(observation.date).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Cannot snap {} to a month end",
                    observation.date
                ))
            })?;
            if seen.insert(date) {
                unique.push(Observation::new(date, observation.revenue));
            }
        }
        let duplicates = input_len - unique.len();

        unique.sort_by_key(|o| o.date);

        let mut observations = if self.fill_missing_months {
            insert_missing_months(unique)?
        } else {
            unique
        };
        let inserted = observations.len() + duplicates - input_len;

        forward_fill(&mut observations);

        debug!(
            rows = observations.len(),
            duplicates,
            inserted,
            "Regularized series"
        );
        Ok(CanonicalSeries { observations })
    }
}

/// Insert a missing observation for every calendar month absent between
/// consecutive dates of a sorted month-end sequence
pub fn insert_missing_months(observations: Vec<Observation>) -> Result<Vec<Observation>> {
    let mut filled: Vec<Observation> = Vec::with_capacity(observations.len());

    for observation in observations {
        if let Some(previous) = filled.last().map(|o| o.date) {
            let gap = month_index(observation.date) - month_index(previous);
            for step in 1..gap {
                let date = month_end_offset(previous, step).ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Cannot fill month {} after {}",
                        step, previous
                    ))
                })?;
                filled.push(Observation::new(date, None));
            }
        }
        filled.push(observation);
    }

    Ok(filled)
}

/// Replace missing values by the most recent earlier value.
///
/// A leading run of missing values stays missing.
pub fn forward_fill(observations: &mut [Observation]) {
    let mut last = None;
    for observation in observations.iter_mut() {
        match observation.revenue {
            Some(value) => last = Some(value),
            None => observation.revenue = last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_shift_conventions() {
        assert_eq!(MonthEndShift::Previous.apply(ymd(1964, 1, 1)), Some(ymd(1963, 12, 31)));
        assert_eq!(MonthEndShift::Previous.apply(ymd(1964, 3, 31)), Some(ymd(1964, 2, 29)));
        assert_eq!(MonthEndShift::Current.apply(ymd(1964, 1, 1)), Some(ymd(1964, 1, 31)));
    }

    #[test]
    fn test_forward_fill_keeps_leading_gap() {
        let mut observations = vec![
            Observation::new(ymd(2020, 1, 31), None),
            Observation::new(ymd(2020, 2, 29), Some(5.0)),
            Observation::new(ymd(2020, 3, 31), None),
        ];
        forward_fill(&mut observations);
        let values: Vec<_> = observations.iter().map(|o| o.revenue).collect();
        assert_eq!(values, vec![None, Some(5.0), Some(5.0)]);
    }

    #[test]
    fn test_insert_missing_months() {
        let observations = vec![
            Observation::new(ymd(2020, 1, 31), Some(1.0)),
            Observation::new(ymd(2020, 4, 30), Some(4.0)),
        ];
        let filled = insert_missing_months(observations).unwrap();
        let dates: Vec<_> = filled.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2020, 1, 31), ymd(2020, 2, 29), ymd(2020, 3, 31), ymd(2020, 4, 30)]
        );
        assert_eq!(filled[1].revenue, None);
    }

    #[test]
    fn test_complete_values_rejects_missing() {
        let series = CanonicalSeries {
            observations: vec![Observation::new(ymd(2020, 1, 31), None)],
        };
        assert!(matches!(series.complete_values(), Err(ForecastError::ModelFit(_))));
    }
}
