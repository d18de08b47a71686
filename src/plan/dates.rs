//! Calendar-day helpers for date-bounded searches.

use chrono::{Days, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    /// Input is not a strict `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    Format(String),
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// Only the exact 4-2-2 digit shape is accepted; `2024-1-5`, `20240105`,
/// surrounding whitespace and impossible dates like `2024-02-30` are all
/// rejected with [`DateError::Format`].
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(DateError::Format(text.to_owned()));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| DateError::Format(text.to_owned()))
}

/// Iterator over every calendar day from `start` to `end`, both inclusive.
///
/// A clone taken before iteration replays the whole range.
#[derive(Debug, Clone)]
pub struct InclusiveDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for InclusiveDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.checked_add_days(Days::new(1));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(day) if day <= self.end => (self.end - day).num_days() as usize + 1,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for InclusiveDays {}

/// Days from `start` through `end`; empty when `start > end`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> InclusiveDays {
    InclusiveDays {
        next: Some(start),
        end,
    }
}

/// Current UTC time as an RFC 3339 timestamp (`2024-01-01T12:00:00.123456+00:00`).
pub fn utc_now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
