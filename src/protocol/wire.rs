// src/protocol/wire.rs
//! Compact binary wire form for protocol messages.
//!
//! Every message type serializes to CBOR: a stable, self-describing binary
//! encoding in which optional fields are either present or wholly absent
//! from the encoded map, and unknown map keys are ignored on decode (never
//! fatal), allowing additive protocol evolution. The helpers here are the
//! single funnel through which all message types encode and decode; the
//! validating builders sit on top of them, so decoding never bypasses
//! validation.

use crate::error::{ProtocolError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Encodes a wire struct to its CBOR byte form.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_cbor::to_vec(value).map_err(ProtocolError::from)
}

/// Decodes a wire struct from CBOR bytes.
///
/// # Errors
/// [`ProtocolError::Decode`] wrapping the underlying CBOR error. Callers
/// reconstruct the validated message type from the returned wire struct,
/// so a structurally valid encoding of semantically invalid data still
/// fails, with [`ProtocolError::MalformedData`].
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_cbor::from_slice(bytes).map_err(ProtocolError::from)
}

/// Version of the requesting client, sent with every outbound request so
/// providers can make compatibility decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientVersion {
    /// Implementation vendor identifier
    pub vendor: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ClientVersion {
    /// The version of this crate, with vendor `"credex"`.
    pub fn current() -> Self {
        ClientVersion {
            vendor: "credex".to_string(),
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
        }
    }
}

impl Default for ClientVersion {
    fn default() -> Self {
        Self::current()
    }
}
