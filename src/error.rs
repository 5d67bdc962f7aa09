//! Error type for sonification requests

use std::fmt;

/// Errors surfaced by curve validation and playback setup.
///
/// All of these are fail-fast: none of them is recoverable by retrying the
/// same call.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A control point was non-finite or outside the unit square
    InvalidCurve {
        /// Which control point ("P1" or "P2")
        point: &'static str,
        /// The offending coordinates
        coords: [f64; 2],
    },
    /// Playback duration was zero, negative, or non-finite
    InvalidDuration(f64),
    /// The host audio facility could not be created
    BackendUnavailable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCurve { point, coords } => write!(
                f,
                "control point {} must be finite and inside the unit square, got ({}, {})",
                point, coords[0], coords[1]
            ),
            Error::InvalidDuration(d) => {
                write!(f, "duration must be a positive number of seconds, got {}", d)
            }
            Error::BackendUnavailable(msg) => write!(f, "audio backend unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidCurve {
            point: "P1",
            coords: [1.5, 0.0],
        };
        assert!(err.to_string().contains("P1"));
        assert!(err.to_string().contains("1.5"));

        let err = Error::InvalidDuration(-2.0);
        assert!(err.to_string().contains("-2"));
    }
}
