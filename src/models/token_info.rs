// src/models/token_info.rs
//! Token request parameters for third-party token issuers.
//!
//! When a requester is willing to accept a proof-of-access token minted by
//! a third-party issuer, it attaches a `TokenRequestInfo` per supported
//! issuer to its retrieve/hint requests: the client identifier the issuer
//! knows the requester by, and a nonce to bind the token to this exchange.

use crate::error::{ProtocolError, Result};
use crate::models::credential::validate_optional_string;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire;
use serde::{Deserialize, Serialize};

/// Parameters for requesting a proof-of-access token from one issuer.
///
/// All fields are optional; an empty `TokenRequestInfo` means "this issuer
/// is acceptable, no special parameters".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequestInfo {
    client_id: Option<String>,
    nonce: Option<String>,
    additional_properties: AdditionalProperties,
}

/// Wire form of a [`TokenRequestInfo`].
#[derive(Serialize, Deserialize, Default)]
pub(crate) struct TokenRequestInfoWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl TokenRequestInfo {
    /// Starts an empty builder.
    pub fn builder() -> TokenRequestInfoBuilder {
        TokenRequestInfoBuilder {
            client_id: None,
            nonce: None,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Encodes to the binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&self.to_wire())
    }

    /// Reconstructs from the binary wire form with full re-validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wire(wire::decode(bytes)?).map_err(ProtocolError::into_malformed)
    }

    pub(crate) fn to_wire(&self) -> TokenRequestInfoWire {
        TokenRequestInfoWire {
            client_id: self.client_id.clone(),
            nonce: self.nonce.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: TokenRequestInfoWire) -> Result<Self> {
        let mut builder = TokenRequestInfo::builder();
        builder.client_id = wire.client_id;
        builder.nonce = wire.nonce;
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// The client identifier the issuer knows the requester by.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Nonce binding the issued token to this exchange.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }
}

impl AdditionalPropertiesContainer for TokenRequestInfo {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`TokenRequestInfo`].
#[derive(Debug, Clone)]
pub struct TokenRequestInfoBuilder {
    client_id: Option<String>,
    nonce: Option<String>,
    additional_properties: AdditionalProperties,
}

impl TokenRequestInfoBuilder {
    /// Sets or clears the client identifier.
    pub fn client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sets or clears the nonce.
    pub fn nonce(mut self, nonce: Option<String>) -> Self {
        self.nonce = nonce;
        self
    }

    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Sets a single additional property.
    pub fn additional_property(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.additional_properties.insert(key.into(), value);
        self
    }

    /// Validates and produces the immutable value.
    pub fn build(self) -> Result<TokenRequestInfo> {
        validate_optional_string("client id", &self.client_id)?;
        validate_optional_string("nonce", &self.nonce)?;
        validate_additional_properties(&self.additional_properties)?;
        Ok(TokenRequestInfo {
            client_id: self.client_id,
            nonce: self.nonce,
            additional_properties: self.additional_properties,
        })
    }
}
