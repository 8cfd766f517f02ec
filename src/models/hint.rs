// src/models/hint.rs
//! Login hint data model.
//!
//! A hint supports account discovery and creation: a provider suggests an
//! identifier the user is known by (plus optional display metadata, a
//! generated password conforming to the requester's password
//! specification, and a proof-of-access token), without asserting that a
//! credential for the requesting service exists. Unlike a credential, a
//! hint carries no authentication domain - the requester supplies its own
//! when it converts the hint into a credential to save.

use crate::error::{ProtocolError, Result};
use crate::models::credential::{
    validate_identifier, validate_optional_string, validate_picture_uri, Credential,
    CredentialBuilder,
};
use crate::models::domain::AuthenticationDomain;
use crate::models::method::AuthenticationMethod;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire;
use serde::{Deserialize, Serialize};

/// An account hint returned by a provider.
///
/// Required fields: the identifier and the authentication method the
/// provider believes the account uses. Everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    id: String,
    authentication_method: AuthenticationMethod,
    display_name: Option<String>,
    display_picture: Option<String>,
    generated_password: Option<String>,
    id_token: Option<String>,
    additional_properties: AdditionalProperties,
}

/// Wire form of a [`Hint`].
#[derive(Serialize, Deserialize)]
pub(crate) struct HintWire {
    pub id: String,
    pub authentication_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl Hint {
    /// Starts a builder from the two required fields.
    pub fn builder(
        id: impl Into<String>,
        authentication_method: AuthenticationMethod,
    ) -> HintBuilder {
        HintBuilder {
            id: id.into(),
            authentication_method,
            display_name: None,
            display_picture: None,
            generated_password: None,
            id_token: None,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Encodes this hint to its binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&self.to_wire())
    }

    /// Reconstructs a hint from its binary wire form, with the same
    /// validation as direct construction.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wire(wire::decode(bytes)?).map_err(ProtocolError::into_malformed)
    }

    pub(crate) fn to_wire(&self) -> HintWire {
        HintWire {
            id: self.id.clone(),
            authentication_method: self.authentication_method.as_str().to_string(),
            display_name: self.display_name.clone(),
            display_picture: self.display_picture.clone(),
            generated_password: self.generated_password.clone(),
            id_token: self.id_token.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: HintWire) -> Result<Self> {
        let mut builder = Hint::builder(
            wire.id,
            AuthenticationMethod::parse(wire.authentication_method)?,
        );
        builder.display_name = wire.display_name;
        builder.display_picture = wire.display_picture;
        builder.generated_password = wire.generated_password;
        builder.id_token = wire.id_token;
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// Seeds a credential builder from this hint for the given domain.
    ///
    /// The requester calls this after a successful hint retrieval: the
    /// hint's identifier, method, display metadata and generated password
    /// carry over, and the requester's own authentication domain completes
    /// the credential, ready to save once the account is created.
    pub fn to_credential_builder(&self, domain: AuthenticationDomain) -> CredentialBuilder {
        Credential::builder(self.id.clone(), self.authentication_method.clone(), domain)
            .display_name(self.display_name.clone())
            .display_picture(self.display_picture.clone())
            .password(self.generated_password.clone())
            .id_token(self.id_token.clone())
    }

    /// The identifier the provider believes the user is known by.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The authentication method the provider suggests.
    pub fn authentication_method(&self) -> &AuthenticationMethod {
        &self.authentication_method
    }

    /// Human-readable account name, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Account picture URI, if any.
    pub fn display_picture(&self) -> Option<&str> {
        self.display_picture.as_deref()
    }

    /// Provider-generated password, if any.
    pub fn generated_password(&self) -> Option<&str> {
        self.generated_password.as_deref()
    }

    /// Proof-of-access token, if any.
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }
}

impl AdditionalPropertiesContainer for Hint {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`Hint`]; validation is deferred to
/// [`HintBuilder::build`].
#[derive(Debug, Clone)]
pub struct HintBuilder {
    id: String,
    authentication_method: AuthenticationMethod,
    display_name: Option<String>,
    display_picture: Option<String>,
    generated_password: Option<String>,
    id_token: Option<String>,
    additional_properties: AdditionalProperties,
}

impl HintBuilder {
    /// Sets or clears the display name.
    pub fn display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Sets or clears the display-picture URI.
    pub fn display_picture(mut self, uri: Option<String>) -> Self {
        self.display_picture = uri;
        self
    }

    /// Sets or clears the provider-generated password.
    pub fn generated_password(mut self, password: Option<String>) -> Self {
        self.generated_password = password;
        self
    }

    /// Sets or clears the proof-of-access token.
    pub fn id_token(mut self, token: Option<String>) -> Self {
        self.id_token = token;
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

    /// Validates every field and produces the immutable hint.
    pub fn build(self) -> Result<Hint> {
        validate_identifier(&self.id)?;
        validate_optional_string("display name", &self.display_name)?;
        validate_optional_string("generated password", &self.generated_password)?;
        validate_optional_string("id token", &self.id_token)?;
        if let Some(uri) = &self.display_picture {
            validate_picture_uri(uri)?;
        }
        validate_additional_properties(&self.additional_properties)?;
        Ok(Hint {
            id: self.id,
            authentication_method: self.authentication_method,
            display_name: self.display_name,
            display_picture: self.display_picture,
            generated_password: self.generated_password,
            id_token: self.id_token,
            additional_properties: self.additional_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_hint_builds() {
        let hint = Hint::builder("alice@example.com", AuthenticationMethod::email())
            .build()
            .unwrap();
        assert_eq!(hint.id(), "alice@example.com");
        assert!(hint.generated_password().is_none());
    }

    #[test]
    fn test_empty_identifier_rejected() {
        assert!(Hint::builder("", AuthenticationMethod::email()).build().is_err());
    }

    #[test]
    fn test_wire_round_trip() {
        let hint = Hint::builder("alice@example.com", AuthenticationMethod::id_and_password())
            .display_name(Some("Alice".into()))
            .generated_password(Some("zX9#kQ2!mP4w".into()))
            .additional_property("k", vec![7])
            .build()
            .unwrap();
        let decoded = Hint::from_bytes(&hint.to_bytes().unwrap()).unwrap();
        assert_eq!(hint, decoded);
    }

    #[test]
    fn test_tampered_method_fails_revalidation() {
        let hint = Hint::builder("alice", AuthenticationMethod::email())
            .build()
            .unwrap();
        let mut wire = hint.to_wire();
        wire.authentication_method = "not a method".into();
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        assert!(matches!(
            Hint::from_bytes(&bytes).unwrap_err(),
            ProtocolError::MalformedData(_)
        ));
    }

    #[test]
    fn test_hint_converts_to_credential() {
        let hint = Hint::builder("alice@example.com", AuthenticationMethod::id_and_password())
            .display_name(Some("Alice".into()))
            .generated_password(Some("zX9#kQ2!mP4w".into()))
            .build()
            .unwrap();

        let domain = AuthenticationDomain::parse("https://login.example.com").unwrap();
        let credential = hint.to_credential_builder(domain.clone()).build().unwrap();
        assert_eq!(credential.id(), "alice@example.com");
        assert_eq!(credential.authentication_domain(), &domain);
        assert_eq!(credential.password(), Some("zX9#kQ2!mP4w"));
        assert_eq!(credential.display_name(), Some("Alice"));
    }
}
