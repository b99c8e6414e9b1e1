//! Right ascension wrapping and declination validation, in degrees.
//!
//! Right ascension is cyclic: 370° and 10° are the same direction, so RA is
//! wrapped into [0°, 360°). Declination cannot go past a pole, so values
//! outside [-90°, +90°] are rejected rather than wrapped.
//!
//! `%` on floats is a remainder, not a modulo (`-1.0 % 360.0 == -1.0`), so
//! wrapping adds a full turn to negative remainders afterwards.

use crate::errors::{SkyError, SkyResult};
use crate::math::fmod;

const DEC_RANGE: &str = "[-90°, +90°]";

/// Wrap an angle in degrees into [0, 360).
///
/// ```
/// use celestial_core::angle::wrap_ra_degrees;
///
/// assert_eq!(wrap_ra_degrees(370.0), 10.0);
/// assert_eq!(wrap_ra_degrees(-10.0), 350.0);
/// assert_eq!(wrap_ra_degrees(360.0), 0.0);
/// ```
pub fn wrap_ra_degrees(deg: f64) -> f64 {
    let mut wrapped = fmod(deg, 360.0);
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // A tiny negative input can round up to exactly 360 after the shift.
    if wrapped >= 360.0 || wrapped == 0.0 {
        return 0.0;
    }
    wrapped
}

/// Check that RA is finite and return it wrapped into [0, 360).
pub fn validate_ra_degrees(ra_deg: f64) -> SkyResult<f64> {
    if !ra_deg.is_finite() {
        return Err(SkyError::not_finite("RA", ra_deg));
    }
    Ok(wrap_ra_degrees(ra_deg))
}

/// Check that Dec is finite and within [-90, +90].
pub fn validate_dec_degrees(dec_deg: f64) -> SkyResult<f64> {
    if !dec_deg.is_finite() {
        return Err(SkyError::not_finite("Dec", dec_deg));
    }
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(SkyError::out_of_range("Dec", dec_deg, DEC_RANGE));
    }
    Ok(dec_deg)
}
