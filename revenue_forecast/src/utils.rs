//! Utility functions for the revenue_forecast crate

use chrono::{Datelike, NaiveDate};

/// Remove currency decoration (`$` and `,`) and parse the remainder as a number.
///
/// Returns `None` when text other than the number remains.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned = text.replace('$', "").replace(',', "");
    cleaned.trim().parse::<f64>().ok()
}

/// Months since year zero, so consecutive calendar months differ by one
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

fn from_month_index(index: i64) -> Option<(i32, u32)> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    Some((year, month))
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Last day of the month `offset` months away from the month of `date`
pub fn month_end_offset(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let (year, month) = from_month_index(month_index(date).checked_add(offset)?)?;
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    month_end_offset(date, 0)
}

/// Whether `date` is the last day of its month
pub fn is_month_end(date: NaiveDate) -> bool {
    month_end(date) == Some(date)
}

/// `horizon` consecutive month-end dates strictly after the month of `last`
pub fn future_month_ends(last: NaiveDate, horizon: usize) -> Option<Vec<NaiveDate>> {
    (1..=horizon as i64)
        .map(|step| month_end_offset(last, step))
        .collect()
}

/// Date parsing for the month column
pub mod date_parser {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Formats tried in order when none are configured
    pub const DEFAULT_DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y-%m",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%b-%y",
        "%b %Y",
        "%B %Y",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Parse with the default format list
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        parse_date_with(text, DEFAULT_DATE_FORMATS)
    }

    /// Parse `text` with the first matching format.
    ///
    /// Formats without a day component resolve to the first of the month.
    pub fn parse_date_with<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        formats
            .iter()
            .find_map(|format| parse_with_format(text, format.as_ref()))
    }

    fn parse_with_format(text: &str, format: &str) -> Option<NaiveDate> {
        if format.contains("%H") {
            return NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|timestamp| timestamp.date());
        }

        let has_day = ["%d", "%e", "%j"].iter().any(|spec| format.contains(spec));
        if has_day {
            NaiveDate::parse_from_str(text, format).ok()
        } else {
            let padded = format!("{}|01", text);
            let format = format!("{}|%d", format);
            NaiveDate::parse_from_str(&padded, &format).ok()
        }
    }
}
