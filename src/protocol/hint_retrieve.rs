// src/protocol/hint_retrieve.rs
//! Login-hint retrieval operation.
//!
//! Used for account discovery and creation: the requester asks providers
//! for identifiers the user is known by. The request may carry a password
//! specification so that providers generate new-account passwords the
//! requester will accept.

use crate::error::{ProtocolError, Result};
use crate::models::hint::{Hint, HintWire};
use crate::models::method::AuthenticationMethod;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::models::token_info::{TokenRequestInfo, TokenRequestInfoWire};
use crate::password::{PasswordSpecification, PasswordSpecificationWire};
use crate::protocol::wire::{self, ClientVersion};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result codes for the hint retrieval operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintResultCode {
    /// Catch-all for responses that cannot be interpreted.
    Unspecified,
    /// A hint was returned.
    Success,
    /// The provider considered the request malformed.
    BadRequest,
    /// The provider has no hints to offer.
    NoHintsAvailable,
    /// The user dismissed the operation without deciding.
    UserCanceled,
    /// The user explicitly refused to share a hint.
    UserRefused,
    /// The provider refused the request by policy.
    ProviderRefused,
}

impl HintResultCode {
    pub(crate) fn to_wire(self) -> u32 {
        match self {
            HintResultCode::Unspecified => 0,
            HintResultCode::Success => 1,
            HintResultCode::BadRequest => 2,
            HintResultCode::NoHintsAvailable => 3,
            HintResultCode::UserCanceled => 4,
            HintResultCode::UserRefused => 5,
            HintResultCode::ProviderRefused => 6,
        }
    }

    pub(crate) fn from_wire(value: u32) -> Self {
        match value {
            1 => HintResultCode::Success,
            2 => HintResultCode::BadRequest,
            3 => HintResultCode::NoHintsAvailable,
            4 => HintResultCode::UserCanceled,
            5 => HintResultCode::UserRefused,
            6 => HintResultCode::ProviderRefused,
            _ => HintResultCode::Unspecified,
        }
    }
}

/// A request for login hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRetrieveRequest {
    authentication_methods: BTreeSet<AuthenticationMethod>,
    password_specification: Option<PasswordSpecification>,
    token_providers: BTreeMap<String, TokenRequestInfo>,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct HintRetrieveRequestWire {
    pub client_version: ClientVersion,
    pub authentication_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_specification: Option<PasswordSpecificationWire>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub token_providers: BTreeMap<String, TokenRequestInfoWire>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl HintRetrieveRequest {
    /// Starts a builder from the set of acceptable authentication methods.
    pub fn builder(
        authentication_methods: impl IntoIterator<Item = AuthenticationMethod>,
    ) -> HintRetrieveRequestBuilder {
        HintRetrieveRequestBuilder {
            authentication_methods: authentication_methods.into_iter().collect(),
            password_specification: None,
            token_providers: BTreeMap::new(),
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

    pub(crate) fn to_wire(&self) -> HintRetrieveRequestWire {
        HintRetrieveRequestWire {
            client_version: self.client_version.clone(),
            authentication_methods: self
                .authentication_methods
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            password_specification: self
                .password_specification
                .as_ref()
                .map(PasswordSpecification::to_wire),
            token_providers: self
                .token_providers
                .iter()
                .map(|(issuer, info)| (issuer.clone(), info.to_wire()))
                .collect(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: HintRetrieveRequestWire) -> Result<Self> {
        let methods = wire
            .authentication_methods
            .into_iter()
            .map(AuthenticationMethod::parse)
            .collect::<Result<Vec<_>>>()?;
        let mut builder = HintRetrieveRequest::builder(methods);
        if let Some(spec) = wire.password_specification {
            builder = builder.password_specification(Some(PasswordSpecification::from_wire(spec)?));
        }
        for (issuer, info) in wire.token_providers {
            builder = builder.token_provider(issuer, TokenRequestInfo::from_wire(info)?);
        }
        builder.additional_properties = wire.additional_properties;
        builder.client_version = wire.client_version;
        builder.build()
    }

    /// The authentication methods the requester can accept.
    pub fn authentication_methods(&self) -> &BTreeSet<AuthenticationMethod> {
        &self.authentication_methods
    }

    /// The password shape a generated password must conform to, if any.
    pub fn password_specification(&self) -> Option<&PasswordSpecification> {
        self.password_specification.as_ref()
    }

    /// Token issuers the requester supports.
    pub fn token_providers(&self) -> &BTreeMap<String, TokenRequestInfo> {
        &self.token_providers
    }

    /// Version of the requesting client.
    pub fn client_version(&self) -> &ClientVersion {
        &self.client_version
    }
}

impl AdditionalPropertiesContainer for HintRetrieveRequest {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`HintRetrieveRequest`].
#[derive(Debug, Clone)]
pub struct HintRetrieveRequestBuilder {
    authentication_methods: BTreeSet<AuthenticationMethod>,
    password_specification: Option<PasswordSpecification>,
    token_providers: BTreeMap<String, TokenRequestInfo>,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

impl HintRetrieveRequestBuilder {
    /// Adds one acceptable authentication method.
    pub fn authentication_method(mut self, method: AuthenticationMethod) -> Self {
        self.authentication_methods.insert(method);
        self
    }

    /// Sets or clears the password specification providers should
    /// generate against.
    pub fn password_specification(mut self, spec: Option<PasswordSpecification>) -> Self {
        self.password_specification = spec;
        self
    }

    /// Declares a supported token issuer with its request parameters.
    pub fn token_provider(mut self, issuer: impl Into<String>, info: TokenRequestInfo) -> Self {
        self.token_providers.insert(issuer.into(), info);
        self
    }

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
    pub fn build(self) -> Result<HintRetrieveRequest> {
        if self.authentication_methods.is_empty() {
            return Err(ProtocolError::InvalidArgument(
                "at least one authentication method is required".into(),
            ));
        }
        for issuer in self.token_providers.keys() {
            if issuer.trim().is_empty() {
                return Err(ProtocolError::InvalidArgument(
                    "token issuer names must not be empty".into(),
                ));
            }
        }
        validate_additional_properties(&self.additional_properties)?;
        Ok(HintRetrieveRequest {
            authentication_methods: self.authentication_methods,
            password_specification: self.password_specification,
            token_providers: self.token_providers,
            additional_properties: self.additional_properties,
            client_version: self.client_version,
        })
    }
}

/// A provider's answer to a hint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRetrieveResult {
    result_code: HintResultCode,
    hint: Option<Hint>,
    additional_properties: AdditionalProperties,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct HintRetrieveResultWire {
    pub result_code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintWire>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl HintRetrieveResult {
    /// Starts a builder from the result code.
    pub fn builder(result_code: HintResultCode) -> HintRetrieveResultBuilder {
        HintRetrieveResultBuilder {
            result_code,
            hint: None,
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

    pub(crate) fn to_wire(&self) -> HintRetrieveResultWire {
        HintRetrieveResultWire {
            result_code: self.result_code.to_wire(),
            hint: self.hint.as_ref().map(Hint::to_wire),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: HintRetrieveResultWire) -> Result<Self> {
        let mut builder = HintRetrieveResult::builder(HintResultCode::from_wire(wire.result_code));
        if let Some(hint) = wire.hint {
            builder = builder.hint(Some(Hint::from_wire(hint)?));
        }
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// The result code.
    pub fn result_code(&self) -> HintResultCode {
        self.result_code
    }

    /// The returned hint, present on success.
    pub fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }
}

impl AdditionalPropertiesContainer for HintRetrieveResult {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`HintRetrieveResult`].
#[derive(Debug, Clone)]
pub struct HintRetrieveResultBuilder {
    result_code: HintResultCode,
    hint: Option<Hint>,
    additional_properties: AdditionalProperties,
}

impl HintRetrieveResultBuilder {
    /// Sets or clears the returned hint.
    pub fn hint(mut self, hint: Option<Hint>) -> Self {
        self.hint = hint;
        self
    }

    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Validates and produces the immutable result.
    pub fn build(self) -> Result<HintRetrieveResult> {
        match (self.result_code, &self.hint) {
            (HintResultCode::Success, None) => {
                return Err(ProtocolError::InvalidArgument(
                    "a success result must carry a hint".into(),
                ))
            }
            (HintResultCode::Success, Some(_)) => {}
            (_, Some(_)) => {
                return Err(ProtocolError::InvalidArgument(
                    "only a success result may carry a hint".into(),
                ))
            }
            (_, None) => {}
        }
        validate_additional_properties(&self.additional_properties)?;
        Ok(HintRetrieveResult {
            result_code: self.result_code,
            hint: self.hint,
            additional_properties: self.additional_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::charsets;

    #[test]
    fn test_request_round_trip_with_password_specification() {
        let spec = PasswordSpecification::builder()
            .require(charsets::LOWER_ALPHA, 1)
            .require(charsets::NUMERALS, 1)
            .length_range(10, 14)
            .build()
            .unwrap();
        let request = HintRetrieveRequest::builder([AuthenticationMethod::email()])
            .password_specification(Some(spec.clone()))
            .build()
            .unwrap();

        let decoded = HintRetrieveRequest::from_bytes(&request.to_bytes().unwrap()).unwrap();
        assert_eq!(request, decoded);
        assert_eq!(decoded.password_specification(), Some(&spec));
    }

    #[test]
    fn test_request_requires_a_method() {
        assert!(HintRetrieveRequest::builder([]).build().is_err());
    }

    #[test]
    fn test_result_round_trip() {
        let hint = Hint::builder("alice@example.com", AuthenticationMethod::email())
            .build()
            .unwrap();
        let result = HintRetrieveResult::builder(HintResultCode::Success)
            .hint(Some(hint))
            .build()
            .unwrap();
        let decoded = HintRetrieveResult::from_bytes(&result.to_bytes().unwrap()).unwrap();
        assert_eq!(result, decoded);
    }

    #[test]
    fn test_success_without_hint_rejected() {
        assert!(HintRetrieveResult::builder(HintResultCode::Success)
            .build()
            .is_err());
    }

    #[test]
    fn test_unknown_result_code_decodes_to_unspecified() {
        let wire = HintRetrieveResultWire {
            result_code: 42,
            hint: None,
            additional_properties: AdditionalProperties::new(),
        };
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        let decoded = HintRetrieveResult::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.result_code(), HintResultCode::Unspecified);
    }
}
