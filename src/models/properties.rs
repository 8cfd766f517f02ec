// src/models/properties.rs
//! Additional-properties side channel shared by every message type.
//!
//! Every protocol message carries an open-ended map from string keys to
//! byte-sequence values, used as an extension point for provider- or
//! requester-specific data that the protocol itself does not interpret.
//! The map is validated uniformly: keys must be non-empty, values are
//! arbitrary bytes. A `BTreeMap` keeps iteration (and the wire form)
//! deterministic.

use crate::error::{ProtocolError, Result};
use std::collections::BTreeMap;

/// The additional-properties map attached to every message type.
pub type AdditionalProperties = BTreeMap<String, Vec<u8>>;

/// Validates an additional-properties map.
///
/// # Errors
/// [`ProtocolError::InvalidArgument`] if any key is empty or consists only
/// of whitespace. Values are unconstrained byte sequences (empty values
/// are permitted - absence of a key, not emptiness of a value, signals
/// "not set").
pub fn validate_additional_properties(properties: &AdditionalProperties) -> Result<()> {
    for key in properties.keys() {
        if key.trim().is_empty() {
            return Err(ProtocolError::InvalidArgument(
                "additional property keys must not be empty".into(),
            ));
        }
    }
    Ok(())
}

/// Read access to the additional-properties map, implemented by every
/// message type.
///
/// This replaces inheritance of a shared container base type: each message
/// type stores its own map, implements this trait over it, and calls
/// [`validate_additional_properties`] at build time.
pub trait AdditionalPropertiesContainer {
    /// The full additional-properties map.
    fn additional_properties(&self) -> &AdditionalProperties;

    /// Looks up a single property value by key.
    fn additional_property(&self, key: &str) -> Option<&[u8]> {
        self.additional_properties().get(key).map(Vec::as_slice)
    }

    /// Looks up a property and interprets its value as UTF-8.
    ///
    /// Returns `None` if the key is absent or the value is not valid UTF-8.
    fn additional_property_string(&self, key: &str) -> Option<&str> {
        self.additional_property(key)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// Applies a builder-style update to an additional-properties map:
/// `Some(map)` replaces the contents wholesale, `None` clears the map.
pub(crate) fn replace_or_clear(
    target: &mut AdditionalProperties,
    update: Option<AdditionalProperties>,
) {
    match update {
        Some(map) => *target = map,
        None => target.clear(),
    }
}
