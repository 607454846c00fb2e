//! Closed year ranges used to filter historical and forecast series

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Closed interval `[start, end]` of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    start: i32,
    end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "Year window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_year(date.year())
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Every year in the window, ascending
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    /// The part of this window inside `bounds`; a window outside the bounds
    /// collapses onto the nearest bound year
    pub fn clamp_within(&self, bounds: &YearWindow) -> YearWindow {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(start, bounds.end);
        YearWindow { start, end }
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
