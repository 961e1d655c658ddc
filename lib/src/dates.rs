//! Sale-date encoding.
//!
//! A sale date becomes the integer "sale day": whole days elapsed since
//! 2014-01-01, plus one, so the epoch itself is day 1.
//!
//! ```text
//! 2014-01-01 -> 1
//! 2014-03-01 -> 60
//! 2016-02-29 -> 790
//! ```

use crate::error::{PricingError, Result};
use chrono::{Datelike, NaiveDate};

/// `NaiveDate::num_days_from_ce` of 2014-01-01.
pub const KING_COUNTY_EPOCH_DAYS: i32 = 735_234;

/// Added to the raw day difference so the epoch date maps to 1.
pub const DAY_OFFSET: i64 = 1;

/// Converts calendar dates to sale-day integers relative to a fixed epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateEncoder {
    epoch_days: i32,
    day_offset: i64,
}

impl Default for DateEncoder {
    fn default() -> Self {
        Self {
            epoch_days: KING_COUNTY_EPOCH_DAYS,
            day_offset: DAY_OFFSET,
        }
    }
}

impl DateEncoder {
    /// Creates an encoder with a custom epoch and offset.
    pub fn new(epoch: NaiveDate, day_offset: i64) -> Self {
        Self {
            epoch_days: epoch.num_days_from_ce(),
            day_offset,
        }
    }

    /// Days-from-CE of the epoch date.
    pub fn epoch_days_from_ce(&self) -> i32 {
        self.epoch_days
    }

    pub fn day_offset(&self) -> i64 {
        self.day_offset
    }

    /// Sale day of a single date. Dates before the epoch yield values below the offset.
    pub fn sale_day(&self, date: NaiveDate) -> i64 {
        i64::from(date.num_days_from_ce() - self.epoch_days) + self.day_offset
    }

    /// Sale day of a `(year, month, day)` triple.
    ///
    /// # Errors
    /// [`PricingError::Schema`] if the triple is not a calendar date.
    pub fn sale_day_ymd(&self, year: i32, month: u32, day: u32) -> Result<i64> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            PricingError::Schema(format!(
                "{:04}-{:02}-{:02} is not a valid calendar date",
                year, month, day
            ))
        })?;
        Ok(self.sale_day(date))
    }

    /// Batch form of [`sale_day`](Self::sale_day): one integer per input, in order.
    pub fn sale_days<I>(&self, dates: I) -> Vec<i64>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().map(|d| self.sale_day(d)).collect()
    }
}

/// Parses a sale date as it appears in sales exports or user input.
///
/// Accepted: `20141013T000000`, `20141013`, `2014-10-13` (optionally followed by a
/// time part), and `10/13/2014`.
pub fn parse_sale_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    let bytes = s.as_bytes();
    let compact = |d: &str| -> Option<NaiveDate> {
        if d.len() != 8 || !d.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = d[0..4].parse().ok()?;
        let month = d[4..6].parse().ok()?;
        let day = d[6..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    };

    if bytes.len() == 8 {
        return compact(s);
    }
    if bytes.len() > 8 && bytes[8] == b'T' {
        return compact(&s[..8]);
    }
    if bytes.len() >= 10 && bytes[4] == b'-' {
        let date_part = if bytes.len() > 10 && (bytes[10] == b'T' || bytes[10] == b' ') {
            &s[..10]
        } else {
            s
        };
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    if s.contains('/') {
        return NaiveDate::parse_from_str(s, "%m/%d/%Y").ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_constant_matches_2014_01_01() {
        assert_eq!(ymd(2014, 1, 1).num_days_from_ce(), KING_COUNTY_EPOCH_DAYS);
    }

    #[test]
    fn test_epoch_is_day_one() {
        let enc = DateEncoder::default();
        assert_eq!(enc.sale_day(ymd(2014, 1, 1)), 1);
        assert_eq!(enc.sale_day(ymd(2014, 1, 2)), 2);
    }

    #[test]
    fn test_known_sale_days() {
        let enc = DateEncoder::default();
        let dates = [
            ymd(2014, 1, 1),
            ymd(2014, 1, 2),
            ymd(2014, 1, 31),
            ymd(2014, 2, 1),
            ymd(2014, 2, 28),
            ymd(2014, 3, 1),
            ymd(2015, 1, 1),
            ymd(2016, 1, 1),
            ymd(2016, 2, 29),
            ymd(2016, 3, 1),
        ];
        assert_eq!(
            enc.sale_days(dates),
            vec![1, 2, 31, 32, 59, 60, 366, 731, 790, 791]
        );
    }

    #[test]
    fn test_leap_year_adds_one_day() {
        let enc = DateEncoder::default();
        // Feb 28 -> Mar 1 spans two days in 2016, one in 2015.
        let leap = enc.sale_day(ymd(2016, 3, 1)) - enc.sale_day(ymd(2016, 2, 28));
        let common = enc.sale_day(ymd(2015, 3, 1)) - enc.sale_day(ymd(2015, 2, 28));
        assert_eq!(leap, 2);
        assert_eq!(common, 1);
        assert_eq!(enc.sale_day(ymd(2016, 2, 29)) - enc.sale_day(ymd(2016, 2, 28)), 1);
    }

    #[test]
    fn test_sale_day_ymd() {
        let enc = DateEncoder::default();
        assert_eq!(enc.sale_day_ymd(2016, 2, 29).unwrap(), 790);
    }

    #[test]
    fn test_sale_day_ymd_rejects_invalid_date() {
        let enc = DateEncoder::default();
        let err = enc.sale_day_ymd(2015, 2, 29).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
        assert!(enc.sale_day_ymd(2014, 13, 1).is_err());
    }

    #[test]
    fn test_before_epoch() {
        let enc = DateEncoder::default();
        assert_eq!(enc.sale_day(ymd(2013, 12, 31)), 0);
    }

    #[test]
    fn test_custom_epoch() {
        let enc = DateEncoder::new(ymd(2020, 1, 1), 0);
        assert_eq!(enc.sale_day(ymd(2020, 1, 1)), 0);
        assert_eq!(enc.sale_day(ymd(2021, 1, 1)), 366);
        assert_eq!(enc.day_offset(), 0);
    }

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = ymd(2014, 10, 13);
        for text in [
            "20141013T000000",
            "20141013",
            "2014-10-13",
            "2014-10-13 00:00:00",
            "2014-10-13T00:00:00",
            "10/13/2014",
            " 2014-10-13 ",
        ] {
            assert_eq!(parse_sale_date(text), Some(expected), "input {:?}", text);
        }
    }

    #[test]
    fn test_parse_sale_date_rejects_garbage() {
        for text in ["", "2014", "20141313", "2015-02-29", "13/13/2014", "yesterday"] {
            assert_eq!(parse_sale_date(text), None, "input {:?}", text);
        }
    }

    #[test]
    fn test_batch_empty() {
        let enc = DateEncoder::default();
        assert!(enc.sale_days(Vec::new()).is_empty());
    }
}
