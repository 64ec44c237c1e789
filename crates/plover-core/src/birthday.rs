//! Birthday dates without a fixed year.
//!
//! A [`Birthday`] is a month/day pair with an optional birth year. The year
//! only matters for age calculation; scheduling always projects the month/day
//! onto a concrete calendar year.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The month/day combination does not form a valid calendar date.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid birthday: month={month} day={day}")]
pub struct InvalidBirthday {
    /// The rejected month.
    pub month: u32,
    /// The rejected day.
    pub day: u32,
}

/// A user's birthday.
///
/// A missing year means the user's age is unknown or undisclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Birthday {
    month: u32,
    day: u32,
    year: Option<i32>,
}

impl Birthday {
    /// Creates a yearless birthday, validating the month/day combination.
    ///
    /// Feb 29 is accepted; see [`Birthday::date_in_year`] for how it resolves
    /// in non-leap years.
    pub fn new(month: u32, day: u32) -> Result<Self, InvalidBirthday> {
        // Validated against a leap year so Feb 29 passes
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self {
                month,
                day,
                year: None,
            })
            .ok_or(InvalidBirthday { month, day })
    }

    /// Creates a birthday with a known birth year.
    pub fn with_year(month: u32, day: u32, year: i32) -> Result<Self, InvalidBirthday> {
        let mut birthday = Self::new(month, day)?;
        birthday.year = Some(year);
        Ok(birthday)
    }

    /// Creates a birthday from a full date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
            year: Some(date.year()),
        }
    }

    /// The birthday month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The birthday day of month (1-31).
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The birth year, if known.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Resolves this birthday to a concrete date in the given year.
    ///
    /// Feb 29 resolves to Feb 28 in non-leap years, so every birthday has
    /// exactly one occurrence per calendar year.
    pub fn date_in_year(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
            .expect("month/day validated at construction")
    }

    /// The age the user has reached at `now`, observed in timezone `tz`.
    ///
    /// Returns `None` when the birth year is unknown. The user's age ticks
    /// over at local midnight on their occurrence date.
    pub fn age_at<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Option<i32> {
        let birth_year = self.year?;
        let local_now = now.with_timezone(tz);
        let occurrence = self.date_in_year(local_now.year());
        let year_diff = local_now.year() - birth_year;
        if local_now.date_naive() < occurrence {
            Some(year_diff - 1)
        } else {
            Some(year_diff)
        }
    }

    /// Days from `today` until the next occurrence, wrapping across the new
    /// year. Zero when the birthday is today.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        let this_year = self.date_in_year(today.year());
        if this_year >= today {
            (this_year - today).num_days()
        } else {
            (self.date_in_year(today.year() + 1) - today).num_days()
        }
    }

    /// Days since the most recent occurrence on or before `today`.
    pub fn days_since(&self, today: NaiveDate) -> i64 {
        let this_year = self.date_in_year(today.year());
        if this_year <= today {
            (today - this_year).num_days()
        } else {
            (today - self.date_in_year(today.year() - 1)).num_days()
        }
    }
}

impl std::fmt::Display for Birthday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date_in_year(2000).format("%b %d"))
    }
}
