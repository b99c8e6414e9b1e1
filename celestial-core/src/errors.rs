//! Error type for sky position construction and validation.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`NotFinite`](SkyError::NotFinite) | RA or Dec is NaN or infinite |
//! | [`OutOfRange`](SkyError::OutOfRange) | Dec lies outside [-90°, +90°] |

use thiserror::Error;

/// Failure to build or validate a sky coordinate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkyError {
    /// Coordinate value is NaN or infinite.
    #[error("{quantity} is not finite: {value}")]
    NotFinite { quantity: &'static str, value: f64 },

    /// Coordinate value lies outside its physical range.
    #[error("{quantity} {value}° out of range {range}")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        range: &'static str,
    },
}

/// Convenience alias for `Result<T, SkyError>`.
pub type SkyResult<T> = Result<T, SkyError>;

impl SkyError {
    pub fn not_finite(quantity: &'static str, value: f64) -> Self {
        Self::NotFinite { quantity, value }
    }

    pub fn out_of_range(quantity: &'static str, value: f64, range: &'static str) -> Self {
        Self::OutOfRange {
            quantity,
            value,
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_finite_message() {
        let err = SkyError::not_finite("RA", f64::NAN);
        assert_eq!(err.to_string(), "RA is not finite: NaN");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = SkyError::out_of_range("Dec", 91.5, "[-90°, +90°]");
        assert!(err.to_string().contains("Dec 91.5° out of range"));
    }

    #[test]
    fn test_send_sync() {
        fn _assert_send<T: Send>() {}
        fn _assert_sync<T: Sync>() {}
        _assert_send::<SkyError>();
        _assert_sync::<SkyError>();
    }
}
