//! Spherical geometry primitives for sky positions.
//!
//! Everything a positional cross-match needs below the catalog level:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | RA wrapping and RA/Dec validation in degrees |
//! | [`constants`] | Angle unit conversion factors |
//! | [`math`] | Vincenty great-circle separation, chord/angle conversion |
//! | [`sky`] | [`SkyPoint`] and its unit-sphere embedding [`UnitVector`] |
//! | [`errors`] | [`SkyError`] |
//!
//! ```
//! use celestial_core::SkyPoint;
//!
//! let a = SkyPoint::new(10.0, 5.0)?;
//! let b = SkyPoint::new(10.0003, 5.0)?;
//! assert!((a.separation_arcsec(&b) - 1.0759).abs() < 1e-3);
//! # Ok::<(), celestial_core::SkyError>(())
//! ```

pub mod angle;
pub mod constants;
pub mod errors;
pub mod math;
pub mod sky;

pub use errors::{SkyError, SkyResult};
pub use sky::{SkyPoint, UnitVector};
