//! # Sexagenary Resolver
//!
//! Heavenly stems (can) and earthly branches (chi), and the resolution of a
//! date into its four sexagenary pillars (year, month, day, hour). The
//! arithmetic is the classical congruence form; the day pillar is anchored
//! through the Julian day number so it is immune to calendar reforms.
//!
//! The chart framework consumes the index tuples; the `*_label` functions
//! compose the localized display strings used in the chart header.

use crate::date::{Date, SolarDate};
use crate::error::ChartError;
use crate::julian::jd_from_date;
use crate::localizer::localize;
use serde::Serialize;

/// The ten heavenly stems, indexed 1..=10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stem {
    Giap = 1,
    At,
    Binh,
    Dinh,
    Mau,
    Ky,
    Canh,
    Tan,
    Nham,
    Quy,
}

impl Stem {
    const ALL: [Stem; 10] = [
        Stem::Giap,
        Stem::At,
        Stem::Binh,
        Stem::Dinh,
        Stem::Mau,
        Stem::Ky,
        Stem::Canh,
        Stem::Tan,
        Stem::Nham,
        Stem::Quy,
    ];

    /// Stem for a 1-based index.
    pub fn from_index(index: u32) -> Result<Stem, ChartError> {
        Stem::ALL
            .get(index.wrapping_sub(1) as usize)
            .copied()
            .ok_or(ChartError::InvalidStem)
    }

    /// 1-based index, Giáp = 1.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Bare Latin token; diacritics come from the localizer.
    pub fn token(self) -> &'static str {
        match self {
            Stem::Giap => "Giap",
            Stem::At => "At",
            Stem::Binh => "Binh",
            Stem::Dinh => "Dinh",
            Stem::Mau => "Mau",
            Stem::Ky => "Ky",
            Stem::Canh => "Canh",
            Stem::Tan => "Tan",
            Stem::Nham => "Nham",
            Stem::Quy => "Quy",
        }
    }
}

impl Serialize for Stem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

/// The twelve earthly branches, indexed 1..=12.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    Ti = 1,
    Suu,
    Dan,
    Mao,
    Thin,
    Ty,
    Ngo,
    Mui,
    Than,
    Dau,
    Tuat,
    Hoi,
}

impl Branch {
    const ALL: [Branch; 12] = [
        Branch::Ti,
        Branch::Suu,
        Branch::Dan,
        Branch::Mao,
        Branch::Thin,
        Branch::Ty,
        Branch::Ngo,
        Branch::Mui,
        Branch::Than,
        Branch::Dau,
        Branch::Tuat,
        Branch::Hoi,
    ];

    /// Branch for a 1-based index.
    pub fn from_index(index: u32) -> Result<Branch, ChartError> {
        Branch::ALL
            .get(index.wrapping_sub(1) as usize)
            .copied()
            .ok_or(ChartError::InvalidBranch)
    }

    /// 1-based index, Tí = 1.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Bare Latin token; diacritics come from the localizer.
    pub fn token(self) -> &'static str {
        match self {
            Branch::Ti => "Ti",
            Branch::Suu => "Suu",
            Branch::Dan => "Dan",
            Branch::Mao => "Mao",
            Branch::Thin => "Thin",
            Branch::Ty => "Ty",
            Branch::Ngo => "Ngo",
            Branch::Mui => "Mui",
            Branch::Than => "Than",
            Branch::Dau => "Dau",
            Branch::Tuat => "Tuat",
            Branch::Hoi => "Hoi",
        }
    }

    /// Localized display form ("Tí", "Sửu", ...).
    pub fn localized(self) -> String {
        localize(self.token())
    }
}

impl Serialize for Branch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

fn stem_of(value: i64) -> Stem {
    // rem_euclid keeps the congruence valid for negative years.
    Stem::ALL[value.rem_euclid(10) as usize]
}

fn branch_of(value: i64) -> Branch {
    Branch::ALL[value.rem_euclid(12) as usize]
}

/// Sexagenary pair of the calendar year of `date`.
pub fn year_pillar(date: &Date) -> (Stem, Branch) {
    let y = date.year as i64;
    (stem_of(y + 6), branch_of(y + 8))
}

/// Sexagenary pair of the calendar month of `date`.
pub fn month_pillar(date: &Date) -> (Stem, Branch) {
    let (y, m) = (date.year as i64, date.month as i64);
    (stem_of(12 * y + m + 3), branch_of(m + 1))
}

/// Integer Julian day at noon of the civil day, the day-pillar anchor.
fn day_number(date: &SolarDate) -> i64 {
    (jd_from_date(&date.strip_time().date()) + 0.5).round() as i64
}

/// Sexagenary pair of the civil day of `date`.
pub fn day_pillar(date: &SolarDate) -> (Stem, Branch) {
    let jd = day_number(date);
    (stem_of(jd + 9), branch_of(jd + 1))
}

/// Branch of the double-hour containing clock hour `hour` (Tí covers
/// 23:00..01:00, so hours 23 and 0 share branch 1).
pub fn hour_branch(hour: u32) -> Branch {
    let index = if hour == 23 || hour == 0 {
        1
    } else {
        (hour - 1) / 2 + 2
    };
    Branch::ALL[(index - 1) as usize]
}

/// Sexagenary pair of the double-hour of `date`; the stem follows the
/// day stem by the five-rats rule.
pub fn hour_pillar(date: &SolarDate) -> (Stem, Branch) {
    let branch = hour_branch(date.hour());
    let (day_stem, _) = day_pillar(date);
    let stem = stem_of(2 * ((day_stem.index() as i64 - 1) % 5) + branch.index() as i64 - 1);
    (stem, branch)
}

fn pillar_label(pillar: (Stem, Branch)) -> String {
    localize(&format!("{} {}", pillar.0.token(), pillar.1.token()))
}

/// Localized year label, e.g. "Ất Hợi".
pub fn year_label(date: &Date) -> String {
    pillar_label(year_pillar(date))
}

/// Localized month label.
pub fn month_label(date: &Date) -> String {
    pillar_label(month_pillar(date))
}

/// Localized day label.
pub fn day_label(date: &SolarDate) -> String {
    pillar_label(day_pillar(date))
}

/// Localized hour label, e.g. "Mậu Tuất".
pub fn hour_label(date: &SolarDate) -> String {
    pillar_label(hour_pillar(date))
}
