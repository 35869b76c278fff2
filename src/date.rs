//! # Calendar Date Primitive
//!
//! The chart engine works on a plain six-component calendar instant rather
//! than a timezone-aware timestamp: every computation is pinned to the
//! +07:00 civil frame, so a bare `(year, month, day, hour, minute, second)`
//! tuple is the honest representation.
//!
//! Two newtypes mark which calendar a value belongs to:
//!
//! - [`SolarDate`]: a Gregorian/Julian civil date (the Julian calendar is
//!   used for dates before 1582-10-15, see the Julian-day kernel).
//! - [`LunarDate`]: a Vietnamese lunisolar date produced by the converter.
//!
//! Passing a lunar date where a solar one is required is a type error, which
//! removes a whole class of off-by-a-month bugs from the star catalog.
//!
//! ## Ordering
//!
//! `Date` orders lexicographically by `(year, month, day, hour, minute,
//! second)`, which is chronological order for valid dates.

use crate::error::{ChartError, DateField};
use serde::{Deserialize, Serialize};

/// A calendar instant: year, month, day, hour, minute, second.
///
/// Immutable value type. Construct through [`Date::new`] or
/// [`Date::with_time`] to get range validation; the field order makes the
/// derived `Ord` chronological.
///
/// # Example
/// ```
/// use tuvi_chart_lib::date::Date;
///
/// let d1 = Date::new(1999, 1, 1).unwrap();
/// let d2 = Date::with_time(1999, 1, 1, 12, 0, 0).unwrap();
/// assert!(d1 < d2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Date {
    /// Build a date at midnight, validating month and day ranges.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ChartError> {
        Self::with_time(year, month, day, 0, 0, 0)
    }

    /// Build a date with a time of day, validating every component.
    ///
    /// Day validation uses the month length, including the February
    /// leap-day rule (divisible by 4 and not by 100, or divisible by 400).
    pub fn with_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, ChartError> {
        if !(1..=12).contains(&month) {
            return Err(ChartError::InvalidDate {
                field: DateField::Month,
            });
        }
        // Before the Gregorian reform the Julian every-four-years rule applies.
        let leap = if year < 1582 {
            year.rem_euclid(4) == 0
        } else {
            is_leap_year(year)
        };
        let max_day = days_of_month(month, leap);
        if !(1..=max_day).contains(&day) {
            return Err(ChartError::InvalidDate {
                field: DateField::Day,
            });
        }
        if hour > 23 {
            return Err(ChartError::InvalidDate {
                field: DateField::Hour,
            });
        }
        if minute > 59 {
            return Err(ChartError::InvalidDate {
                field: DateField::Minute,
            });
        }
        if second > 59 {
            return Err(ChartError::InvalidDate {
                field: DateField::Second,
            });
        }

        Ok(Date {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// The same calendar day with hour, minute and second reset to zero.
    pub fn strip_time(&self) -> Date {
        Date {
            hour: 0,
            minute: 0,
            second: 0,
            ..*self
        }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a civil month.
pub fn days_of_month(month: u32, leap: bool) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 => {
            if leap {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// A civil (solar) calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SolarDate(Date);

impl SolarDate {
    /// Validate and wrap a civil date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ChartError> {
        Ok(SolarDate(Date::new(year, month, day)?))
    }

    /// Validate and wrap a civil date with a time of day.
    pub fn with_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, ChartError> {
        Ok(SolarDate(Date::with_time(
            year, month, day, hour, minute, second,
        )?))
    }

    /// Wrap an already-validated date (e.g. one produced by the JD kernel).
    pub fn from_date(date: Date) -> Self {
        SolarDate(date)
    }

    pub fn date(&self) -> Date {
        self.0
    }

    /// The same civil day at midnight.
    pub fn strip_time(&self) -> SolarDate {
        SolarDate(self.0.strip_time())
    }

    pub fn year(&self) -> i32 {
        self.0.year
    }

    pub fn month(&self) -> u32 {
        self.0.month
    }

    pub fn day(&self) -> u32 {
        self.0.day
    }

    pub fn hour(&self) -> u32 {
        self.0.hour
    }
}

/// A Vietnamese lunisolar calendar date.
///
/// Lunar months run 29 or 30 days regardless of the month index, so the
/// civil month-length validation does not apply here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LunarDate(Date);

impl LunarDate {
    /// Validate and wrap a lunar date (month 1..=12, day 1..=30).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ChartError> {
        if !(1..=12).contains(&month) {
            return Err(ChartError::InvalidDate {
                field: DateField::Month,
            });
        }
        if !(1..=30).contains(&day) {
            return Err(ChartError::InvalidDate {
                field: DateField::Day,
            });
        }
        Ok(LunarDate(Date {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
        }))
    }

    pub fn date(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year
    }

    pub fn month(&self) -> u32 {
        self.0.month
    }

    pub fn day(&self) -> u32 {
        self.0.day
    }
}
