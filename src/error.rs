// src/error.rs
//! Error types for the credential exchange protocol.
//!
//! Two error kinds dominate the protocol core:
//! - [`ProtocolError::MalformedData`] / [`ProtocolError::Decode`]: raised
//!   when decoding or re-validating a binary wire form fails
//! - [`ProtocolError::InvalidArgument`] / [`ProtocolError::InvalidSpecification`]:
//!   raised synchronously by builders and the password specification engine
//!   when caller-supplied values violate an invariant at construction time
//!
//! Both kinds are non-recoverable locally: they propagate to the caller,
//! which decides whether to retry with corrected input or abort.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced by the protocol core.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An authentication domain or method string does not have the
    /// required `scheme://authority` shape.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// A decoded binary form violates a protocol invariant
    /// (empty required string, invalid URI, disallowed field value).
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// The binary wire form itself could not be decoded.
    #[error("failed to decode wire form: {0}")]
    Decode(#[from] serde_cbor::Error),

    /// A caller-supplied field value violates a builder invariant.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A password specification violates its structural invariants
    /// (overlapping required sets, counts exceeding the maximum length,
    /// an empty or inverted length range, non-printable characters).
    #[error("invalid password specification: {0}")]
    InvalidSpecification(String),
}

impl ProtocolError {
    /// Converts any construction-time error into the `MalformedData` kind.
    ///
    /// Used when a builder is seeded from a decoded wire form: the same
    /// validation runs, but a violation indicates tampered or corrupted
    /// data rather than a caller bug, and is reported as such.
    pub fn into_malformed(self) -> ProtocolError {
        match self {
            ProtocolError::MalformedData(_) | ProtocolError::Decode(_) => self,
            other => ProtocolError::MalformedData(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_malformed_wraps_argument_errors() {
        let err = ProtocolError::InvalidArgument("identifier must not be empty".into());
        match err.into_malformed() {
            ProtocolError::MalformedData(msg) => {
                assert!(msg.contains("identifier must not be empty"));
            }
            other => panic!("expected MalformedData, got {:?}", other),
        }
    }

    #[test]
    fn test_into_malformed_preserves_decode_errors() {
        let decode_err = serde_cbor::from_slice::<u32>(&[]).unwrap_err();
        let err = ProtocolError::Decode(decode_err);
        assert!(matches!(err.into_malformed(), ProtocolError::Decode(_)));
    }
}
