//! # Lunisolar Converter
//!
//! Conversion between the civil calendar and the Vietnamese lunisolar
//! calendar, following the classical rule set:
//!
//! - A lunar month starts on the local-midnight day of a new moon at
//!   +07:00.
//! - The month containing the winter solstice is month 11; its start is
//!   the anchor every other month index is measured from.
//! - In a year of thirteen lunations the leap month is the first one (after
//!   month 11) whose sun-longitude sector repeats the previous month's,
//!   i.e. the first month containing no principal term.
//!
//! The converter is deliberately free of chronology state: each call
//! recomputes its anchors from the astronomical kernel, which keeps the
//! functions pure and the results reproducible.

use crate::astro::{SYNODIC_MONTH, TZ_HOURS, jde_new_moon, new_moon_day, sun_longitude_sector};
use crate::date::{Date, LunarDate, SolarDate};
use crate::error::ChartError;
use crate::julian::{date_from_jd, jd_from_date};

/// Integer Julian day of the first day of lunar month 11 (the month
/// containing the winter solstice) of civil year `year`.
pub fn lunar_month_11(year: i32, tz_hours: f64) -> Result<i64, ChartError> {
    let dec31 = Date::new(year, 12, 31)?;
    let offset = jd_from_date(&dec31) - jde_new_moon(0) + 0.5;
    let k = (offset / SYNODIC_MONTH).floor() as i64;

    let mut start = new_moon_day(k, tz_hours);
    // Past sector 9 the solstice already fell in the previous lunation.
    if sun_longitude_sector(start as f64, tz_hours) >= 9 {
        start = new_moon_day(k - 1, tz_hours);
    }
    Ok(start)
}

/// Offset (in months after month 11) of the leap month in the lunar year
/// starting at `month11_jd`. Only meaningful when that lunar year spans
/// thirteen lunations.
pub fn leap_month_offset(month11_jd: i64, tz_hours: f64) -> i64 {
    let k = ((month11_jd as f64 - jde_new_moon(0)) / SYNODIC_MONTH + 0.5).floor() as i64;

    let mut i = 1;
    let mut arc = sun_longitude_sector(new_moon_day(k + i, tz_hours) as f64, tz_hours);
    while i < 14 {
        let last = arc;
        i += 1;
        arc = sun_longitude_sector(new_moon_day(k + i, tz_hours) as f64, tz_hours);
        if arc == last {
            break;
        }
    }
    i - 1
}

/// Convert a civil date to the Vietnamese lunisolar date at `tz_hours`.
pub fn solar_to_lunar_tz(date: &SolarDate, tz_hours: f64) -> Result<LunarDate, ChartError> {
    let jd = jd_from_date(&date.strip_time().date()) + 0.5;
    let k = ((jd - jde_new_moon(0)) / SYNODIC_MONTH).floor() as i64;

    let mut month_start = new_moon_day(k + 1, tz_hours);
    if month_start as f64 > jd {
        month_start = new_moon_day(k, tz_hours);
    }

    let mut a11 = lunar_month_11(date.year(), tz_hours)?;
    let mut b11 = a11;
    let mut lunar_year;
    if a11 >= month_start {
        lunar_year = date.year();
        a11 = lunar_month_11(date.year() - 1, tz_hours)?;
    } else {
        lunar_year = date.year() + 1;
        b11 = lunar_month_11(date.year() + 1, tz_hours)?;
    }

    let lunar_day = (jd - month_start as f64 + 1.0) as u32;
    let diff = (month_start - a11) / 29;
    let mut lunar_month = diff + 11;

    if b11 - a11 > 365 {
        let leap_offset = leap_month_offset(a11, tz_hours);
        if diff >= leap_offset {
            lunar_month = diff + 10;
        }
    }
    if lunar_month > 12 {
        lunar_month -= 12;
    }
    if lunar_month >= 11 && diff < 4 {
        lunar_year -= 1;
    }

    LunarDate::new(lunar_year, lunar_month as u32, lunar_day)
}

/// Convert a Vietnamese lunisolar date back to the civil date at `tz_hours`.
pub fn lunar_to_solar_tz(date: &LunarDate, tz_hours: f64) -> Result<SolarDate, ChartError> {
    let (a11, b11) = if date.month() < 11 {
        (
            lunar_month_11(date.year() - 1, tz_hours)?,
            lunar_month_11(date.year(), tz_hours)?,
        )
    } else {
        (
            lunar_month_11(date.year(), tz_hours)?,
            lunar_month_11(date.year() + 1, tz_hours)?,
        )
    };

    let k = ((a11 as f64 - jde_new_moon(0)) / SYNODIC_MONTH + 0.5).floor() as i64;

    let mut off = date.month() as i64 - 11;
    if off < 0 {
        off += 12;
    }

    if b11 - a11 > 365 {
        let leap_off = leap_month_offset(a11, tz_hours);
        let mut leap_month = leap_off - 2;
        if leap_month < 0 {
            leap_month += 12;
        }

        let leap_year = is_leap_lunar_year(date.year());
        if leap_year && date.month() as i64 != leap_month {
            if off >= leap_off {
                off += 1;
            }
        } else if leap_year || off >= leap_off {
            off += 1;
        }
    }

    let month_start = new_moon_day(k + off, tz_hours);
    let solar = date_from_jd(month_start as f64 + date.day() as f64 - 1.0 - 0.5)?;
    Ok(SolarDate::from_date(solar.strip_time()))
}

/// Convert a civil date to the Vietnamese lunisolar date at +07:00.
pub fn solar_to_lunar(date: &SolarDate) -> Result<LunarDate, ChartError> {
    solar_to_lunar_tz(date, TZ_HOURS)
}

/// Convert a Vietnamese lunisolar date back to the civil date at +07:00.
pub fn lunar_to_solar(date: &LunarDate) -> Result<SolarDate, ChartError> {
    lunar_to_solar_tz(date, TZ_HOURS)
}

/// Whether a lunar year carries a leap month, by the Metonic-cycle rule.
pub fn is_leap_lunar_year(year: i32) -> bool {
    matches!(year.rem_euclid(19), 0 | 3 | 6 | 9 | 11 | 14 | 17)
}
