// src/protocol/save.rs
//! Credential save operation.

use crate::error::{ProtocolError, Result};
use crate::models::credential::{Credential, CredentialWire};
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire::{self, ClientVersion};
use serde::{Deserialize, Serialize};

/// Result codes for the save operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResultCode {
    /// Catch-all for responses that cannot be interpreted.
    Unspecified,
    /// The credential was saved.
    Saved,
    /// The provider considered the request malformed.
    BadRequest,
    /// The provider refused the request by policy.
    ProviderRefused,
    /// The user dismissed the operation without deciding.
    UserCanceled,
    /// The user explicitly refused to save.
    UserRefused,
}

impl SaveResultCode {
    pub(crate) fn to_wire(self) -> u32 {
        match self {
            SaveResultCode::Unspecified => 0,
            SaveResultCode::Saved => 1,
            SaveResultCode::BadRequest => 2,
            SaveResultCode::ProviderRefused => 3,
            SaveResultCode::UserCanceled => 4,
            SaveResultCode::UserRefused => 5,
        }
    }

    pub(crate) fn from_wire(value: u32) -> Self {
        match value {
            1 => SaveResultCode::Saved,
            2 => SaveResultCode::BadRequest,
            3 => SaveResultCode::ProviderRefused,
            4 => SaveResultCode::UserCanceled,
            5 => SaveResultCode::UserRefused,
            _ => SaveResultCode::Unspecified,
        }
    }
}

/// A request to persist a credential with a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    credential: Credential,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct SaveRequestWire {
    pub client_version: ClientVersion,
    pub credential: CredentialWire,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl SaveRequest {
    /// Starts a builder from the credential to save.
    pub fn builder(credential: Credential) -> SaveRequestBuilder {
        SaveRequestBuilder {
            credential,
            additional_properties: AdditionalProperties::new(),
            client_version: ClientVersion::current(),
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

    pub(crate) fn to_wire(&self) -> SaveRequestWire {
        SaveRequestWire {
            client_version: self.client_version.clone(),
            credential: self.credential.to_wire(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: SaveRequestWire) -> Result<Self> {
        let mut builder = SaveRequest::builder(Credential::from_wire(wire.credential)?);
        builder.additional_properties = wire.additional_properties;
        builder.client_version = wire.client_version;
        builder.build()
    }

    /// The credential to save.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Version of the requesting client.
    pub fn client_version(&self) -> &ClientVersion {
        &self.client_version
    }
}

impl AdditionalPropertiesContainer for SaveRequest {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`SaveRequest`].
#[derive(Debug, Clone)]
pub struct SaveRequestBuilder {
    credential: Credential,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

impl SaveRequestBuilder {
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

    /// Overrides the client version (defaults to this crate's version).
    pub fn client_version(mut self, version: ClientVersion) -> Self {
        self.client_version = version;
        self
    }

    /// Validates and produces the immutable request.
    pub fn build(self) -> Result<SaveRequest> {
        validate_additional_properties(&self.additional_properties)?;
        Ok(SaveRequest {
            credential: self.credential,
            additional_properties: self.additional_properties,
            client_version: self.client_version,
        })
    }
}

/// A provider's answer to a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    result_code: SaveResultCode,
    additional_properties: AdditionalProperties,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct SaveResultWire {
    pub result_code: u32,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl SaveResult {
    /// Starts a builder from the result code.
    pub fn builder(result_code: SaveResultCode) -> SaveResultBuilder {
        SaveResultBuilder {
            result_code,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Encodes to the binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&SaveResultWire {
            result_code: self.result_code.to_wire(),
            additional_properties: self.additional_properties.clone(),
        })
    }

    /// Reconstructs from the binary wire form with full re-validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let wire: SaveResultWire = wire::decode(bytes)?;
        let mut builder = SaveResult::builder(SaveResultCode::from_wire(wire.result_code));
        builder.additional_properties = wire.additional_properties;
        builder.build().map_err(ProtocolError::into_malformed)
    }

    /// The result code.
    pub fn result_code(&self) -> SaveResultCode {
        self.result_code
    }
}

impl AdditionalPropertiesContainer for SaveResult {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`SaveResult`].
#[derive(Debug, Clone)]
pub struct SaveResultBuilder {
    result_code: SaveResultCode,
    additional_properties: AdditionalProperties,
}

impl SaveResultBuilder {
    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Validates and produces the immutable result.
    pub fn build(self) -> Result<SaveResult> {
        validate_additional_properties(&self.additional_properties)?;
        Ok(SaveResult {
            result_code: self.result_code,
            additional_properties: self.additional_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::AuthenticationDomain;
    use crate::models::method::AuthenticationMethod;

    fn test_credential() -> Credential {
        Credential::builder(
            "alice@example.com",
            AuthenticationMethod::id_and_password(),
            AuthenticationDomain::parse("https://login.example.com").unwrap(),
        )
        .password(Some("secret".into()))
        .build()
        .unwrap()
    }

    #[test]
    fn test_request_wire_round_trip() {
        let request = SaveRequest::builder(test_credential())
            .additional_property("k", vec![9])
            .build()
            .unwrap();
        let decoded = SaveRequest::from_bytes(&request.to_bytes().unwrap()).unwrap();
        assert_eq!(request, decoded);
        assert_eq!(decoded.credential().id(), "alice@example.com");
    }

    #[test]
    fn test_tampered_credential_fails_decode() {
        let mut wire = SaveRequest::builder(test_credential())
            .build()
            .unwrap()
            .to_wire();
        wire.credential.id = String::new();
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        assert!(matches!(
            SaveRequest::from_bytes(&bytes).unwrap_err(),
            ProtocolError::MalformedData(_)
        ));
    }

    #[test]
    fn test_result_wire_round_trip() {
        let result = SaveResult::builder(SaveResultCode::Saved).build().unwrap();
        let decoded = SaveResult::from_bytes(&result.to_bytes().unwrap()).unwrap();
        assert_eq!(result, decoded);
        assert_eq!(decoded.result_code(), SaveResultCode::Saved);
    }

    #[test]
    fn test_unknown_result_code_decodes_to_unspecified() {
        let bytes = crate::protocol::wire::encode(&SaveResultWire {
            result_code: 77,
            additional_properties: AdditionalProperties::new(),
        })
        .unwrap();
        let decoded = SaveResult::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.result_code(), SaveResultCode::Unspecified);
    }
}
