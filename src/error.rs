//! Error types for operations on public data.
//!
//! Operations that may run on secret values (inversion, square roots,
//! constant-time decoding) do not use this type; they return a `u32`
//! flag (0xFFFFFFFF on success, 0x00000000 on failure) alongside a
//! value, so that the outcome does not alter the control flow.

use thiserror::Error;

/// Curve algebra errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Input has the wrong length
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Bytes do not decode to a valid (canonical) element or point
    #[error("Invalid encoding")]
    InvalidEncoding,

    /// Coordinates do not satisfy the curve equation
    #[error("Point is not on the curve")]
    NotOnCurve,

    /// Operation is undefined at the group identity
    #[error("Identity point encountered")]
    IdentityEncountered,

    /// Multi-scalar multiplication inputs differ in length
    #[error("Mismatched lengths: {scalars} scalars, {points} points")]
    MismatchedLengths {
        /// Number of scalars
        scalars: usize,
        /// Number of points
        points: usize,
    },

    /// Value has no square root in the field
    #[error("Not a quadratic residue")]
    NotQuadraticResidue,

    /// Hash-to-curve parameters out of range
    #[error("Hash-to-curve error: {0}")]
    HashToCurve(&'static str),
}

/// Result type for curve algebra operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages() {
        let e = Error::InvalidLength { expected: 33, actual: 12 };
        assert_eq!(e.to_string(), "Invalid length: expected 33, got 12");
        let e = Error::MismatchedLengths { scalars: 3, points: 2 };
        assert_eq!(e.to_string(), "Mismatched lengths: 3 scalars, 2 points");
        assert_eq!(Error::NotOnCurve.to_string(), "Point is not on the curve");
    }
}
