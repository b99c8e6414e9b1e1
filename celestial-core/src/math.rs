//! Great-circle distance helpers.
//!
//! Separations are computed with the Vincenty formula, which stays accurate
//! from coincident points to antipodes. The chord helper converts an angular
//! separation into the straight-line distance between two unit vectors, the
//! quantity a Euclidean spatial index orders by.

#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

/// Angular separation in radians between two points given as latitude sines
/// and cosines plus their longitude difference.
#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Chord length between two unit vectors separated by `angle_rad`.
///
/// Monotonic on [0, π]; angles beyond π saturate at the diameter.
#[inline]
pub fn chord_from_angle(angle_rad: f64) -> f64 {
    if angle_rad >= crate::constants::PI {
        return 2.0;
    }
    2.0 * libm::sin(0.5 * angle_rad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;

    #[test]
    fn test_vincenty_quarter_circle() {
        let sep = vincenty_angular_separation(0.0, 1.0, 0.0, 1.0, 0.5 * PI);
        assert!((sep - 0.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_vincenty_antipodes() {
        let sep = vincenty_angular_separation(0.0, 1.0, 0.0, 1.0, PI);
        assert!((sep - PI).abs() < 1e-12);
    }

    #[test]
    fn test_chord_known_angles() {
        assert_eq!(chord_from_angle(0.0), 0.0);
        // 60° between unit vectors is an equilateral triangle
        assert!((chord_from_angle(PI / 3.0) - 1.0).abs() < 1e-15);
        assert!((chord_from_angle(0.5 * PI) - 2.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_chord_saturates_past_pi() {
        assert_eq!(chord_from_angle(PI), 2.0);
        assert_eq!(chord_from_angle(10.0), 2.0);
    }

    #[test]
    fn test_chord_monotonic() {
        let mut previous = -1.0;
        for i in 0..=100 {
            let chord = chord_from_angle(PI * i as f64 / 100.0);
            assert!(chord >= previous);
            previous = chord;
        }
    }
}
