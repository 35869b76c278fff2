//! # Astronomical Kernel
//!
//! The two truncated series everything lunisolar rests on:
//!
//! - [`jde_new_moon`]: Julian Ephemeris Day of the k-th mean new moon
//!   (k = 0 is the new moon of 2000 January 6), corrected by the published
//!   periodic and planetary terms.
//! - [`sun_longitude`]: apparent geocentric longitude of the Sun at a given
//!   Julian day, in radians in `[0, 2π)`.
//!
//! The coefficient tables are transcribed verbatim from the reference
//! series and are load-bearing: the lunisolar month boundaries (and through
//! them every star position) depend on them bit-for-bit, and the public
//! test vectors (e.g. k = -283) pin them down.
//!
//! Both helpers at the bottom fold in the +07:00 civil offset used by the
//! Vietnamese calendar rule.

use std::f64::consts::{PI, TAU};

/// Civil offset of the Vietnamese calendar, in hours east of UTC.
pub const TZ_HOURS: f64 = 7.0;

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530588861;

/// Degrees to radians, wrapped into `[0, 2π)`.
fn to_radians_wrapped(degrees: f64) -> f64 {
    (degrees * PI / 180.0).rem_euclid(TAU)
}

/// Periodic correction terms for the k-th new moon: each row is
/// `(coefficient, E power, sun-anomaly factor, moon-anomaly factor,
/// latitude-argument factor, node factor)` and contributes
/// `coeff * E^p * sin(s·M + m·M' + f·F + o·Ω)`.
const NEW_MOON_PERIODIC: [(f64, u8, i8, i8, i8, i8); 25] = [
    (-0.40720, 0, 0, 1, 0, 0),
    (0.17241, 1, 1, 0, 0, 0),
    (0.01608, 0, 0, 2, 0, 0),
    (0.01039, 0, 0, 0, 2, 0),
    (0.00739, 1, -1, 1, 0, 0),
    (-0.00514, 1, 1, 1, 0, 0),
    (0.00208, 2, 2, 0, 0, 0),
    (-0.00111, 0, 0, 1, -2, 0),
    (-0.00057, 0, 0, 1, 2, 0),
    (0.00056, 1, 1, 2, 0, 0),
    (-0.00042, 0, 0, 3, 0, 0),
    (0.00042, 1, 1, 0, 2, 0),
    (0.00038, 1, 1, 0, -2, 0),
    (-0.00024, 1, -1, 2, 0, 0),
    (-0.00017, 0, 0, 0, 0, 1),
    (-0.00007, 0, 2, 1, 0, 0),
    (0.00004, 0, 0, 2, -2, 0),
    (0.00004, 0, 3, 0, 0, 0),
    (0.00003, 0, 1, 1, -2, 0),
    (0.00003, 0, 0, 2, 2, 0),
    (-0.00003, 0, 1, 1, 2, 0),
    (0.00003, 0, -1, 1, 2, 0),
    (-0.00002, 0, -1, 1, -2, 0),
    (-0.00002, 0, 1, 3, 0, 0),
    (0.00002, 0, 0, 4, 0, 0),
];

/// Planetary arguments A2..A14: `(coefficient, base, k multiplier)`.
/// A1 carries an extra T² term and is handled inline.
const NEW_MOON_PLANETARY: [(f64, f64, f64); 13] = [
    (0.000165, 251.88, 0.016321),
    (0.000164, 251.83, 26.651886),
    (0.000126, 349.42, 36.412478),
    (0.000110, 84.66, 18.206239),
    (0.000062, 141.74, 53.303771),
    (0.000060, 207.14, 2.453732),
    (0.000056, 154.84, 7.306860),
    (0.000047, 34.52, 27.261239),
    (0.000042, 207.19, 0.121824),
    (0.000040, 291.34, 1.844379),
    (0.000037, 161.72, 24.198154),
    (0.000035, 239.56, 25.513099),
    (0.000023, 331.55, 3.592518),
];

/// Julian Ephemeris Day of the `k`-th mean new moon, with the full periodic
/// and planetary corrections applied. `k = 0` corresponds to the new moon
/// of 2000 January 6; negative `k` reaches back before the epoch.
pub fn jde_new_moon(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let jde = 2451550.09766 + SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;

    // Angles at time of the mean new moon, in degrees.
    let sun_anomaly = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let moon_anomaly = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4;
    let latitude_arg = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4;
    let node = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    let mut periodic = 0.0;
    for &(coeff, e_pow, s, m, f, o) in &NEW_MOON_PERIODIC {
        let arg = s as f64 * sun_anomaly
            + m as f64 * moon_anomaly
            + f as f64 * latitude_arg
            + o as f64 * node;
        periodic += coeff * e.powi(e_pow as i32) * to_radians_wrapped(arg).sin();
    }

    let a1 = 299.77 + 0.107408 * k - 0.009173 * t2;
    let mut planetary = 0.000325 * to_radians_wrapped(a1).sin();
    for &(coeff, base, per_k) in &NEW_MOON_PLANETARY {
        planetary += coeff * to_radians_wrapped(base + per_k * k).sin();
    }

    jde + periodic + planetary
}

/// Apparent geocentric longitude of the Sun at Julian day `jd`, in radians
/// normalized to `[0, 2π)`.
pub fn sun_longitude(jd: f64) -> f64 {
    // Julian centuries since J2000.0.
    let t = (jd - 2451545.0) / 36525.0;
    let t2 = t * t;

    // Geometric mean longitude, referred to the mean equinox of date.
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t2;

    // Mean anomaly.
    let m = 357.52911 + 35999.05029 * t - 0.0001537 * t2;
    let m_rad = to_radians_wrapped(m);

    // Equation of the center.
    let c = (1.914602 - 0.004817 * t - 0.000014 * t2) * m_rad.sin()
        + (0.019993 - 0.000101 * t) * to_radians_wrapped(2.0 * m).sin()
        + 0.000289 * to_radians_wrapped(3.0 * m).sin();

    // True longitude, then the nutation-and-aberration shift.
    let true_longitude = l0 + c;
    let omega = 125.04 - 1934.136 * t;
    let apparent = true_longitude - 0.00569 - 0.00478 * to_radians_wrapped(omega).sin();

    to_radians_wrapped(apparent)
}

/// Integer Julian day of local midnight on the day of the `k`-th new moon,
/// at `tz_hours` east of UTC.
pub fn new_moon_day(k: i64, tz_hours: f64) -> i64 {
    (jde_new_moon(k) + tz_hours / 24.0 + 0.5).floor() as i64
}

/// Solar-longitude sector (0..=11) of the day starting at local midnight of
/// `jd`, mapping `[0, 2π)` onto twelve 30-degree sectors.
pub fn sun_longitude_sector(jd: f64, tz_hours: f64) -> i64 {
    (sun_longitude(jd - tz_hours / 24.0 - 0.5) / PI * 6.0).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_moon_reference() {
        // Meeus worked example: the new moon of 1977 February.
        assert!((jde_new_moon(-283) - 2443192.65118).abs() < 1e-5);
    }

    #[test]
    fn test_new_moon_epoch_is_january_2000() {
        // k = 0 lands on 2000-01-06 (JDE about 2451550.26).
        let jde = jde_new_moon(0);
        assert!((2451549.5..2451550.5).contains(&jde), "jde = {jde}");
    }

    #[test]
    fn test_consecutive_new_moons_are_a_synodic_month_apart() {
        for k in [-500, -283, 0, 137, 1200] {
            let gap = jde_new_moon(k + 1) - jde_new_moon(k);
            assert!(
                (29.2..29.9).contains(&gap),
                "gap at k={k} was {gap}"
            );
        }
    }

    #[test]
    fn test_sun_longitude_reference() {
        // Meeus worked example: 1992 October 13.0 TD.
        let expected = to_radians_wrapped(199.0 + 54.0 / 60.0 + 21.56 / 3600.0);
        assert!((sun_longitude(2448908.5) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_sun_longitude_is_normalized() {
        for jd in [2415020.5, 2440587.5, 2451545.0, 2460000.5] {
            let lambda = sun_longitude(jd);
            assert!((0.0..std::f64::consts::TAU).contains(&lambda));
        }
    }

    #[test]
    fn test_sector_range() {
        for k in 0..24 {
            let jd = new_moon_day(k, TZ_HOURS);
            let sector = sun_longitude_sector(jd as f64, TZ_HOURS);
            assert!((0..12).contains(&sector));
        }
    }
}
