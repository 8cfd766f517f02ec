// src/protocol/retrieve.rs
//! Credential retrieval operation.
//!
//! A requester broadcasts a [`RetrieveRequest`] naming the authentication
//! methods it can accept; each provider answers with a
//! [`RetrieveResult`] carrying a result code and, on success, a
//! credential.

use crate::error::{ProtocolError, Result};
use crate::models::credential::{Credential, CredentialWire};
use crate::models::method::AuthenticationMethod;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::models::token_info::{TokenRequestInfo, TokenRequestInfoWire};
use crate::protocol::wire::{self, ClientVersion};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result codes for the retrieve operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieveResultCode {
    /// Catch-all for responses that cannot be interpreted.
    Unspecified,
    /// A credential was returned.
    Success,
    /// The provider considered the request malformed.
    BadRequest,
    /// The provider has no credential for the requester.
    NoCredentialsAvailable,
    /// The user dismissed the operation without deciding.
    UserCanceled,
    /// The user explicitly refused to release a credential.
    UserRefused,
    /// The provider refused the request by policy.
    ProviderRefused,
}

impl RetrieveResultCode {
    pub(crate) fn to_wire(self) -> u32 {
        match self {
            RetrieveResultCode::Unspecified => 0,
            RetrieveResultCode::Success => 1,
            RetrieveResultCode::BadRequest => 2,
            RetrieveResultCode::NoCredentialsAvailable => 3,
            RetrieveResultCode::UserCanceled => 4,
            RetrieveResultCode::UserRefused => 5,
            RetrieveResultCode::ProviderRefused => 6,
        }
    }

    /// Unknown values decode to `Unspecified`, never an error.
    pub(crate) fn from_wire(value: u32) -> Self {
        match value {
            1 => RetrieveResultCode::Success,
            2 => RetrieveResultCode::BadRequest,
            3 => RetrieveResultCode::NoCredentialsAvailable,
            4 => RetrieveResultCode::UserCanceled,
            5 => RetrieveResultCode::UserRefused,
            6 => RetrieveResultCode::ProviderRefused,
            _ => RetrieveResultCode::Unspecified,
        }
    }
}

/// A request for stored credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveRequest {
    authentication_methods: BTreeSet<AuthenticationMethod>,
    token_providers: BTreeMap<String, TokenRequestInfo>,
    require_user_mediation: bool,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct RetrieveRequestWire {
    pub client_version: ClientVersion,
    pub authentication_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub token_providers: BTreeMap<String, TokenRequestInfoWire>,
    #[serde(default)]
    pub require_user_mediation: bool,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl RetrieveRequest {
    /// Starts a builder from the set of acceptable authentication methods.
    pub fn builder(
        authentication_methods: impl IntoIterator<Item = AuthenticationMethod>,
    ) -> RetrieveRequestBuilder {
        RetrieveRequestBuilder {
            authentication_methods: authentication_methods.into_iter().collect(),
            token_providers: BTreeMap::new(),
            require_user_mediation: false,
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

    pub(crate) fn to_wire(&self) -> RetrieveRequestWire {
        RetrieveRequestWire {
            client_version: self.client_version.clone(),
            authentication_methods: self
                .authentication_methods
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            token_providers: self
                .token_providers
                .iter()
                .map(|(issuer, info)| (issuer.clone(), info.to_wire()))
                .collect(),
            require_user_mediation: self.require_user_mediation,
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: RetrieveRequestWire) -> Result<Self> {
        let methods = wire
            .authentication_methods
            .into_iter()
            .map(AuthenticationMethod::parse)
            .collect::<Result<Vec<_>>>()?;
        let mut builder = RetrieveRequest::builder(methods);
        for (issuer, info) in wire.token_providers {
            builder = builder.token_provider(issuer, TokenRequestInfo::from_wire(info)?);
        }
        builder.additional_properties = wire.additional_properties;
        builder.require_user_mediation = wire.require_user_mediation;
        builder.client_version = wire.client_version;
        builder.build()
    }

    /// The authentication methods the requester can accept.
    pub fn authentication_methods(&self) -> &BTreeSet<AuthenticationMethod> {
        &self.authentication_methods
    }

    /// Token issuers the requester supports, with per-issuer parameters.
    pub fn token_providers(&self) -> &BTreeMap<String, TokenRequestInfo> {
        &self.token_providers
    }

    /// Whether the provider must involve the user before releasing a
    /// credential.
    pub fn require_user_mediation(&self) -> bool {
        self.require_user_mediation
    }

    /// Version of the requesting client.
    pub fn client_version(&self) -> &ClientVersion {
        &self.client_version
    }
}

impl AdditionalPropertiesContainer for RetrieveRequest {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`RetrieveRequest`].
#[derive(Debug, Clone)]
pub struct RetrieveRequestBuilder {
    authentication_methods: BTreeSet<AuthenticationMethod>,
    token_providers: BTreeMap<String, TokenRequestInfo>,
    require_user_mediation: bool,
    additional_properties: AdditionalProperties,
    client_version: ClientVersion,
}

impl RetrieveRequestBuilder {
    /// Adds one acceptable authentication method.
    pub fn authentication_method(mut self, method: AuthenticationMethod) -> Self {
        self.authentication_methods.insert(method);
        self
    }

    /// Declares a supported token issuer with its request parameters.
    pub fn token_provider(mut self, issuer: impl Into<String>, info: TokenRequestInfo) -> Self {
        self.token_providers.insert(issuer.into(), info);
        self
    }

    /// Requires the provider to involve the user before releasing a
    /// credential (suppresses silent single-credential release).
    pub fn require_user_mediation(mut self, require: bool) -> Self {
        self.require_user_mediation = require;
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

    /// Overrides the client version (defaults to this crate's version).
    pub fn client_version(mut self, version: ClientVersion) -> Self {
        self.client_version = version;
        self
    }

    /// Validates and produces the immutable request.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if no authentication method was
    /// supplied, a token-issuer key is empty, or an additional-property
    /// key is empty.
    pub fn build(self) -> Result<RetrieveRequest> {
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
        Ok(RetrieveRequest {
            authentication_methods: self.authentication_methods,
            token_providers: self.token_providers,
            require_user_mediation: self.require_user_mediation,
            additional_properties: self.additional_properties,
            client_version: self.client_version,
        })
    }
}

/// A provider's answer to a retrieve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveResult {
    result_code: RetrieveResultCode,
    credential: Option<Credential>,
    additional_properties: AdditionalProperties,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct RetrieveResultWire {
    pub result_code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialWire>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl RetrieveResult {
    /// Starts a builder from the result code.
    pub fn builder(result_code: RetrieveResultCode) -> RetrieveResultBuilder {
        RetrieveResultBuilder {
            result_code,
            credential: None,
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

    pub(crate) fn to_wire(&self) -> RetrieveResultWire {
        RetrieveResultWire {
            result_code: self.result_code.to_wire(),
            credential: self.credential.as_ref().map(Credential::to_wire),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: RetrieveResultWire) -> Result<Self> {
        let mut builder = RetrieveResult::builder(RetrieveResultCode::from_wire(wire.result_code));
        if let Some(credential) = wire.credential {
            builder = builder.credential(Some(Credential::from_wire(credential)?));
        }
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// The result code.
    pub fn result_code(&self) -> RetrieveResultCode {
        self.result_code
    }

    /// The returned credential, present on success.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

impl AdditionalPropertiesContainer for RetrieveResult {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`RetrieveResult`].
#[derive(Debug, Clone)]
pub struct RetrieveResultBuilder {
    result_code: RetrieveResultCode,
    credential: Option<Credential>,
    additional_properties: AdditionalProperties,
}

impl RetrieveResultBuilder {
    /// Sets or clears the returned credential.
    pub fn credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Validates and produces the immutable result.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if a credential is attached to a
    /// non-success code, or a success result lacks one.
    pub fn build(self) -> Result<RetrieveResult> {
        match (self.result_code, &self.credential) {
            (RetrieveResultCode::Success, None) => {
                return Err(ProtocolError::InvalidArgument(
                    "a success result must carry a credential".into(),
                ))
            }
            (RetrieveResultCode::Success, Some(_)) => {}
            (_, Some(_)) => {
                return Err(ProtocolError::InvalidArgument(
                    "only a success result may carry a credential".into(),
                ))
            }
            (_, None) => {}
        }
        validate_additional_properties(&self.additional_properties)?;
        Ok(RetrieveResult {
            result_code: self.result_code,
            credential: self.credential,
            additional_properties: self.additional_properties,
        })
    }
}
