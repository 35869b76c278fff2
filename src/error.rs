//! # Error Types
//!
//! All failure modes of the chart engine are collected in a single
//! [`ChartError`] enum. The first group ([`ChartError::InvalidDate`],
//! [`ChartError::InvalidGender`]) comes from validating caller input; every
//! other variant indicates an inconsistency in the internal dispatch tables
//! and therefore a bug in the star catalog, not a user fault.
//!
//! Errors are always fatal to a `build_chart` call: no partial chart is
//! ever produced.

use thiserror::Error;

/// Which component of a date failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DateField::Year => "year",
            DateField::Month => "month",
            DateField::Day => "day",
            DateField::Hour => "hour",
            DateField::Minute => "minute",
            DateField::Second => "second",
        };
        f.write_str(name)
    }
}

/// Errors raised while validating inputs or assembling a chart.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartError {
    /// A date component is out of range (including the February leap-day rule).
    #[error("invalid {field} in date")]
    InvalidDate { field: DateField },

    /// A Julian day number was negative when inverting back to a calendar date.
    #[error("Julian day cannot be negative")]
    InvalidJulianDay,

    /// The gender value is neither NAM (1) nor NU (-1).
    #[error("invalid gender")]
    InvalidGender,

    /// An earthly-branch index fell outside 1..=12.
    #[error("invalid branch index")]
    InvalidBranch,

    /// A heavenly-stem index fell outside 1..=10.
    #[error("invalid stem index")]
    InvalidStem,

    /// An element lookup failed.
    #[error("invalid element")]
    InvalidElement,

    /// A computed cell position fell outside every case of a dispatch table.
    #[error("invalid cell position")]
    InvalidPosition,

    /// A cục lookup failed.
    #[error("invalid cục")]
    InvalidCuc,

    /// A star could not be routed to any cell list.
    #[error("invalid star category")]
    InvalidStarCategory,

    /// Inputs fell outside all cases of a rule that should be total
    /// (e.g. an odd Thân-to-Mệnh distance). Surfaces a catalog bug.
    #[error("rule inputs outside all cases")]
    Unsolvable,
}
