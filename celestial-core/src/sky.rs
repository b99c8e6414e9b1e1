//! Sky positions and their unit-sphere embedding.
//!
//! A [`SkyPoint`] is an (RA, Dec) pair in degrees that has already been
//! validated: both values finite, Dec within [-90°, +90°], RA wrapped into
//! [0°, 360°). Code holding a `SkyPoint` never needs to re-check it.
//!
//! Searching directly in (RA, Dec) space breaks at the RA = 0/360 seam and near
//! the poles, where a degree of RA shrinks to nothing. [`UnitVector`] embeds a
//! position on the unit sphere instead; the Euclidean (chord) distance between
//! two embedded points is `2 sin(θ/2)` for angular separation θ, so ordering by
//! chord is the same as ordering by angle, with no seam and no pole.

use std::fmt;

use crate::angle::{validate_dec_degrees, validate_ra_degrees};
use crate::constants::{DEG_TO_RAD, RAD_TO_ARCSEC, RAD_TO_DEG};
use crate::errors::SkyResult;
use crate::math::vincenty_angular_separation;

/// A validated position on the celestial sphere, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPoint {
    ra_deg: f64,
    dec_deg: f64,
}

impl SkyPoint {
    /// Validate and build a sky position. RA is wrapped into [0, 360).
    ///
    /// # Errors
    /// [`SkyError::NotFinite`](crate::SkyError::NotFinite) for NaN or infinite input,
    /// [`SkyError::OutOfRange`](crate::SkyError::OutOfRange) for Dec outside [-90, +90].
    pub fn new(ra_deg: f64, dec_deg: f64) -> SkyResult<Self> {
        let ra_deg = validate_ra_degrees(ra_deg)?;
        let dec_deg = validate_dec_degrees(dec_deg)?;
        Ok(Self { ra_deg, dec_deg })
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    pub fn to_unit_vector(&self) -> UnitVector {
        UnitVector::from_sky(self)
    }

    /// Great-circle separation in radians (Vincenty formula).
    pub fn separation_rad(&self, other: &SkyPoint) -> f64 {
        let (sin_dec1, cos_dec1) = libm::sincos(self.dec_deg * DEG_TO_RAD);
        let (sin_dec2, cos_dec2) = libm::sincos(other.dec_deg * DEG_TO_RAD);
        let delta_ra = (other.ra_deg - self.ra_deg) * DEG_TO_RAD;
        vincenty_angular_separation(sin_dec1, cos_dec1, sin_dec2, cos_dec2, delta_ra)
    }

    pub fn separation_deg(&self, other: &SkyPoint) -> f64 {
        self.separation_rad(other) * RAD_TO_DEG
    }

    pub fn separation_arcsec(&self, other: &SkyPoint) -> f64 {
        self.separation_rad(other) * RAD_TO_ARCSEC
    }
}

impl fmt::Display for SkyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(RA={:.6}°, Dec={:+.6}°)", self.ra_deg, self.dec_deg)
    }
}

/// Cartesian position on the unit sphere.
///
/// x points at (RA=0, Dec=0), y at (RA=90°, Dec=0), z at the north pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl UnitVector {
    pub fn from_sky(point: &SkyPoint) -> Self {
        let (sin_ra, cos_ra) = libm::sincos(point.ra_deg * DEG_TO_RAD);
        let (sin_dec, cos_dec) = libm::sincos(point.dec_deg * DEG_TO_RAD);
        Self {
            x: cos_dec * cos_ra,
            y: cos_dec * sin_ra,
            z: sin_dec,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<SkyPoint> for UnitVector {
    fn from(point: SkyPoint) -> Self {
        UnitVector::from_sky(&point)
    }
}
