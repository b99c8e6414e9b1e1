pub const PI: f64 = std::f64::consts::PI;

pub const DEG_TO_RAD: f64 = PI / 180.0;

pub const RAD_TO_DEG: f64 = 180.0 / PI;

#[allow(clippy::excessive_precision)]
pub const ARCSEC_TO_RAD: f64 = 4.848136811095359935899141e-6;

pub const RAD_TO_ARCSEC: f64 = 1.0 / ARCSEC_TO_RAD;

/// Largest possible angular separation on the sphere (180°), in arcseconds.
pub const MAX_SEPARATION_ARCSEC: f64 = 648000.0;
