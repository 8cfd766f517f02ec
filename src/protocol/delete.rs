// src/protocol/delete.rs
//! Credential deletion operation.

use crate::error::{ProtocolError, Result};
use crate::models::credential::{Credential, CredentialWire};
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire::{self, ClientVersion};
use serde::{Deserialize, Serialize};

/// Result codes for the delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResultCode {
    /// Catch-all for responses that cannot be interpreted.
    Unspecified,
    /// The credential was deleted.
    Deleted,
    /// The provider considered the request malformed.
    BadRequest,
    /// The provider holds no matching credential.
    NoMatchingCredential,
    /// The provider refused the request by policy.
    ProviderRefused,
    /// The user dismissed the operation without deciding.
    UserCanceled,
    /// The user explicitly refused the deletion.
    UserRefused,
}

impl DeleteResultCode {
    pub(crate) fn to_wire(self) -> u32 {
        match self {
            DeleteResultCode::Unspecified => 0,
            DeleteResultCode::Deleted => 1,
            DeleteResultCode::BadRequest => 2,
            DeleteResultCode::NoMatchingCredential => 3,
            DeleteResultCode::ProviderRefused => 4,
            DeleteResultCode::UserCanceled => 5,
            DeleteResultCode::UserRefused => 6,
        }
    }

    pub(crate) fn from_wire(value: u32) -> Self {
        match value {
            1 => DeleteResultCode::Deleted,
            2 => DeleteResultCode::BadRequest,
            3 => DeleteResultCode::NoMatchingCredential,
            4 => DeleteResultCode::ProviderRefused,
            5 => DeleteResultCode::UserCanceled,
            6 => DeleteResultCode::UserRefused,
            _ => DeleteResultCode::Unspecified,
        }
    }
}

/// A request to delete a stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    credential: Credential,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct DeleteRequestWire {
    pub client_version: ClientVersion,
    pub credential: CredentialWire,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl DeleteRequest {
    /// Starts a builder from the credential to delete.
    pub fn builder(credential: Credential) -> DeleteRequestBuilder {
        DeleteRequestBuilder {
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

    pub(crate) fn to_wire(&self) -> DeleteRequestWire {
        DeleteRequestWire {
            client_version: self.client_version.clone(),
            credential: self.credential.to_wire(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: DeleteRequestWire) -> Result<Self> {
        let mut builder = DeleteRequest::builder(Credential::from_wire(wire.credential)?);
        builder.additional_properties = wire.additional_properties;
        builder.client_version = wire.client_version;
        builder.build()
    }

    /// The credential to delete.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Version of the requesting client.
    pub fn client_version(&self) -> &ClientVersion {
        &self.client_version
    }
}

impl AdditionalPropertiesContainer for DeleteRequest {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`DeleteRequest`].
#[derive(Debug, Clone)]
pub struct DeleteRequestBuilder {
    credential: Credential,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

impl DeleteRequestBuilder {
    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Overrides the client version (defaults to this crate's version).
    pub fn client_version(mut self, version: ClientVersion) -> Self {
        self.client_version = version;
        self
    }

    /// Validates and produces the immutable request.
    pub fn build(self) -> Result<DeleteRequest> {
        validate_additional_properties(&self.additional_properties)?;
        Ok(DeleteRequest {
            credential: self.credential,
            additional_properties: self.additional_properties,
            client_version: self.client_version,
        })
    }
}

/// A provider's answer to a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    result_code: DeleteResultCode,
    additional_properties: AdditionalProperties,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct DeleteResultWire {
    pub result_code: u32,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl DeleteResult {
    /// Starts a builder from the result code.
    pub fn builder(result_code: DeleteResultCode) -> DeleteResultBuilder {
        DeleteResultBuilder {
            result_code,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Encodes to the binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&DeleteResultWire {
            result_code: self.result_code.to_wire(),
            additional_properties: self.additional_properties.clone(),
        })
    }

    /// Reconstructs from the binary wire form with full re-validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let wire: DeleteResultWire = wire::decode(bytes)?;
        let mut builder = DeleteResult::builder(DeleteResultCode::from_wire(wire.result_code));
        builder.additional_properties = wire.additional_properties;
        builder.build().map_err(ProtocolError::into_malformed)
    }

    /// The result code.
    pub fn result_code(&self) -> DeleteResultCode {
        self.result_code
    }
}

impl AdditionalPropertiesContainer for DeleteResult {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`DeleteResult`].
#[derive(Debug, Clone)]
pub struct DeleteResultBuilder {
    result_code: DeleteResultCode,
    additional_properties: AdditionalProperties,
}

impl DeleteResultBuilder {
    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Validates and produces the immutable result.
    pub fn build(self) -> Result<DeleteResult> {
        validate_additional_properties(&self.additional_properties)?;
        Ok(DeleteResult {
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
        .build()
        .unwrap()
    }

    #[test]
    fn test_request_wire_round_trip() {
        let request = DeleteRequest::builder(test_credential()).build().unwrap();
        let decoded = DeleteRequest::from_bytes(&request.to_bytes().unwrap()).unwrap();
        assert_eq!(request, decoded);
    }

    #[test]
    fn test_result_wire_round_trip() {
        let result = DeleteResult::builder(DeleteResultCode::NoMatchingCredential)
            .build()
            .unwrap();
        let decoded = DeleteResult::from_bytes(&result.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.result_code(), DeleteResultCode::NoMatchingCredential);
    }

    #[test]
    fn test_unknown_result_code_decodes_to_unspecified() {
        let bytes = crate::protocol::wire::encode(&DeleteResultWire {
            result_code: 250,
            additional_properties: AdditionalProperties::new(),
        })
        .unwrap();
        let decoded = DeleteResult::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.result_code(), DeleteResultCode::Unspecified);
    }
}
