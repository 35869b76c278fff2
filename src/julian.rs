//! # Julian-Day Kernel
//!
//! Conversion between calendar dates and Julian Day numbers, plus the small
//! day-arithmetic utilities built on top of it. This is the classical
//! astronomical formulation:
//!
//! - The Gregorian reform is honored at its historical date: civil dates
//!   strictly before 1582-10-15 are treated as Julian-calendar dates (the
//!   `B` correction is zero), later ones as Gregorian.
//! - January and February are counted as months 13 and 14 of the previous
//!   year so the leap day falls at the end of the arithmetic year.
//! - The time of day rides along as a fractional day and is recovered by
//!   rounding to the nearest whole second on the way back.
//!
//! The inverse conversion follows the Meeus decomposition with the
//! `alpha` adjustment once past `Z = 2299161` (the reform boundary).

use crate::date::{Date, SolarDate, is_leap_year};
use crate::error::ChartError;

/// First day of the Gregorian calendar, for `<` comparison: dates before
/// 1582-10-05 00:00 get the Julian-calendar treatment (the ten skipped days
/// 1582-10-05..14 never existed as civil dates).
const GREGORIAN_THRESHOLD: Date = Date {
    year: 1582,
    month: 10,
    day: 5,
    hour: 0,
    minute: 0,
    second: 0,
};

/// Day of month plus the elapsed time of day as a fraction.
pub fn fractional_day(date: &Date) -> f64 {
    let elapsed_seconds = date.hour * 3600 + date.minute * 60 + date.second;
    date.day as f64 + elapsed_seconds as f64 / 86400.0
}

/// Split a fractional day count into whole days, hours, minutes and seconds,
/// rounding to the nearest second.
pub fn decompose_fractional_day(fractional: f64) -> (u32, u32, u32, u32) {
    let day = fractional.floor() as u32;
    let rem_seconds = ((fractional - day as f64) * 86400.0).round() as u32;

    let second = rem_seconds % 60;
    let minutes = rem_seconds / 60;
    (day, minutes / 60, minutes % 60, second)
}

/// Julian Day number of a calendar date, time of day included.
///
/// # Example
/// ```
/// use tuvi_chart_lib::date::Date;
/// use tuvi_chart_lib::julian::jd_from_date;
///
/// let d = Date::new(1999, 1, 1).unwrap();
/// assert_eq!(jd_from_date(&d), 2451179.5);
/// ```
pub fn jd_from_date(date: &Date) -> f64 {
    let d = fractional_day(date);
    let (mut m, mut y) = (date.month as i32, date.year);
    if m <= 2 {
        m += 12;
        y -= 1;
    }

    let a = (y as f64 / 100.0).floor();
    let b = if *date < GREGORIAN_THRESHOLD {
        0.0
    } else {
        2.0 - a + (a / 4.0).floor()
    };

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + d + b - 1524.5
}

/// Modified Julian Day: `JD - 2400000.5`, zero at 1858-11-17 00:00 UTC.
pub fn mjd_from_date(date: &Date) -> f64 {
    jd_from_date(date) - 2400000.5
}

/// Calendar date of a Julian Day number (Meeus inverse).
pub fn date_from_jd(jd: f64) -> Result<Date, ChartError> {
    if jd < 0.0 {
        return Err(ChartError::InvalidJulianDay);
    }

    let z = (jd + 0.5).floor();
    let f = jd + 0.5 - z;
    let a = if z < 2299161.0 {
        z
    } else {
        let alpha = ((z - 1867216.25) / 36524.25).trunc();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let (day, hour, minute, second) = decompose_fractional_day(b - d - (30.6001 * e).trunc() + f);

    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;

    Ok(Date {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// Absolute difference in days between two dates.
pub fn diff_days(date1: &Date, date2: &Date) -> f64 {
    (jd_from_date(date1) - jd_from_date(date2)).abs()
}

/// The date `days` days after `date`.
pub fn add_days(date: &Date, days: f64) -> Result<Date, ChartError> {
    date_from_jd(jd_from_date(date) + days)
}

/// The date `days` days before `date`.
pub fn sub_days(date: &Date, days: f64) -> Result<Date, ChartError> {
    date_from_jd(jd_from_date(date) - days)
}

/// Day of the week, derived from `(jd + 1.5) mod 7` with Sunday first.
pub fn day_of_week(date: &SolarDate) -> chrono::Weekday {
    use chrono::Weekday::*;

    let rem = ((jd_from_date(&date.date()) + 1.5).round() as i64).rem_euclid(7);
    match rem {
        0 => Sun,
        1 => Mon,
        2 => Tue,
        3 => Wed,
        4 => Thu,
        5 => Fri,
        _ => Sat,
    }
}

/// Ordinal day of the year, 1..=366.
pub fn day_of_year(date: &SolarDate) -> u32 {
    let (m, d) = (date.month(), date.day());
    let k = if is_leap_year(date.year()) { 1 } else { 2 };
    275 * m / 9 - k * ((m + 9) / 12) + d - 30
}

/// Inverse of [`day_of_year`]: the date of the `doy`-th day of `year`.
pub fn date_from_day_of_year(year: i32, doy: u32) -> Result<SolarDate, ChartError> {
    let k = if is_leap_year(year) { 1 } else { 2 };

    let m = if doy < 32 {
        1
    } else {
        (9.0 * (k + doy) as f64 / 275.0 + 0.98) as u32
    };
    let d = doy - 275 * m / 9 + k * ((m + 9) / 12) + 30;
    SolarDate::new(year, m, d)
}

/// Christian Easter Sunday of `year`: the Julian-calendar computus through
/// 1582, the Gregorian computus after.
pub fn easter_sunday(year: i32) -> Result<SolarDate, ChartError> {
    if year <= 1582 {
        easter_sunday_julian(year)
    } else {
        easter_sunday_gregorian(year)
    }
}

fn easter_sunday_gregorian(x: i32) -> Result<SolarDate, ChartError> {
    let a = x % 19;
    let b = x / 100;
    let c = x % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (a * 19 + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + e * 2 + i * 2 - h - k).rem_euclid(7);
    let m = (a + h * 11 + l * 22) / 451;
    let n = (h + l - m * 7 + 114) / 31;
    let p = (h + l - m * 7 + 114) % 31;

    SolarDate::new(x, n as u32, (p + 1) as u32)
}

fn easter_sunday_julian(x: i32) -> Result<SolarDate, ChartError> {
    let a = x % 4;
    let b = x % 7;
    let c = x % 19;
    let d = (c * 19 + 15) % 30;
    let e = (a * 2 + b * 4 - d + 34).rem_euclid(7);
    let f = (d + e + 114) / 31;
    let g = (d + e + 114) % 31;

    SolarDate::new(x, f as u32, (g + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::new(y, m, d).unwrap()
    }

    #[test]
    fn test_julian_day_vectors() {
        assert_eq!(jd_from_date(&date(1999, 1, 1)), 2451179.5);
        assert_eq!(jd_from_date(&date(1987, 1, 27)), 2446822.5);
        assert_eq!(jd_from_date(&date(1988, 1, 27)), 2447187.5);
        assert_eq!(jd_from_date(&date(1900, 1, 1)), 2415020.5);
        assert_eq!(jd_from_date(&date(1600, 1, 1)), 2305447.5);
        assert_eq!(jd_from_date(&date(1600, 12, 31)), 2305812.5);
        // Julian-calendar side of the reform.
        assert_eq!(jd_from_date(&date(-123, 12, 31)), 1676496.5);
        assert_eq!(jd_from_date(&date(-122, 1, 1)), 1676497.5);
        assert_eq!(jd_from_date(&date(-1000, 2, 29)), 1355866.5);
    }

    #[test]
    fn test_reverse_julian_day() {
        assert_eq!(
            date_from_jd(2436116.31).unwrap(),
            Date::with_time(1957, 10, 4, 19, 26, 24).unwrap()
        );
        assert_eq!(
            date_from_jd(1842713.0).unwrap(),
            Date::with_time(333, 1, 27, 12, 0, 0).unwrap()
        );
        assert_eq!(
            date_from_jd(1507900.13).unwrap(),
            Date::with_time(-584, 5, 28, 15, 7, 12).unwrap()
        );
        assert_eq!(date_from_jd(-1.0), Err(ChartError::InvalidJulianDay));
    }

    #[test]
    fn test_roundtrip_through_jd() {
        for &(y, m, d) in &[(1, 1, 1), (1582, 10, 4), (1582, 10, 15), (2000, 2, 29), (2999, 12, 31)] {
            let original = date(y, m, d);
            assert_eq!(date_from_jd(jd_from_date(&original)).unwrap(), original);
        }
    }

    #[test]
    fn test_fractional_day() {
        let d = Date::with_time(1957, 10, 4, 19, 26, 24).unwrap();
        assert!((fractional_day(&d) - 4.81).abs() < 1e-9);
        assert_eq!(decompose_fractional_day(4.81), (4, 19, 26, 24));
        assert_eq!(decompose_fractional_day(0.63), (0, 15, 7, 12));
        assert_eq!(decompose_fractional_day(2.5), (2, 12, 0, 0));
    }

    #[test]
    fn test_day_arithmetic() {
        assert_eq!(diff_days(&date(1910, 4, 20), &date(1986, 2, 9)), 27689.0);
        assert_eq!(
            add_days(&date(1991, 7, 11), 10000.0).unwrap(),
            date(2018, 11, 26)
        );
        assert_eq!(
            sub_days(&date(2018, 11, 26), 10000.0).unwrap(),
            date(1991, 7, 11)
        );
    }

    #[test]
    fn test_day_of_week() {
        use chrono::Weekday;
        assert_eq!(
            day_of_week(&SolarDate::new(1954, 6, 30).unwrap()),
            Weekday::Wed
        );
        assert_eq!(
            day_of_week(&SolarDate::new(2023, 6, 12).unwrap()),
            Weekday::Mon
        );
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(&SolarDate::new(1978, 11, 14).unwrap()), 318);
        assert_eq!(day_of_year(&SolarDate::new(1988, 4, 22).unwrap()), 113);
        assert_eq!(
            date_from_day_of_year(1978, 318).unwrap(),
            SolarDate::new(1978, 11, 14).unwrap()
        );
        assert_eq!(
            date_from_day_of_year(1988, 113).unwrap(),
            SolarDate::new(1988, 4, 22).unwrap()
        );
    }

    #[test]
    fn test_easter_sunday() {
        assert_eq!(easter_sunday(1991).unwrap(), SolarDate::new(1991, 3, 31).unwrap());
        assert_eq!(easter_sunday(1992).unwrap(), SolarDate::new(1992, 4, 19).unwrap());
        assert_eq!(easter_sunday(1993).unwrap(), SolarDate::new(1993, 4, 11).unwrap());
        assert_eq!(easter_sunday(1954).unwrap(), SolarDate::new(1954, 4, 18).unwrap());
        assert_eq!(easter_sunday(2000).unwrap(), SolarDate::new(2000, 4, 23).unwrap());
        // Pre-reform year goes through the Julian computus.
        assert_eq!(easter_sunday(1500).unwrap(), SolarDate::new(1500, 4, 19).unwrap());
    }

    #[test]
    fn test_mjd() {
        assert_eq!(mjd_from_date(&date(1858, 11, 17)), 0.0);
    }
}
