// src/models/credential.rs
//! Credential data model.
//!
//! A credential is the central aggregate of the protocol: an identifier
//! (username, email address, phone number) bound to an authentication
//! method and the authentication domain where it is usable, with optional
//! display metadata, a password, and a proof-of-access token. Credentials
//! are built through a validating builder, are immutable once built, and
//! round-trip through the compact binary wire form with full
//! re-validation on decode.

use crate::error::{ProtocolError, Result};
use crate::models::domain::AuthenticationDomain;
use crate::models::method::AuthenticationMethod;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire;
use serde::{Deserialize, Serialize};

/// Validates a display-picture URI: web family only, no whitespace.
///
/// Unlike authentication domains, picture URIs may carry a path (they
/// point at an image resource, not an origin).
pub(crate) fn validate_picture_uri(uri: &str) -> Result<()> {
    let valid_scheme = uri.strip_prefix("https://").map_or_else(
        || uri.strip_prefix("http://").map_or(false, |r| !r.is_empty()),
        |rest| !rest.is_empty(),
    );
    if !valid_scheme || uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ProtocolError::InvalidArgument(format!(
            "display picture URI must be http(s): {:?}",
            uri
        )));
    }
    Ok(())
}

/// Validates a required identifier string: non-empty, non-whitespace.
pub(crate) fn validate_identifier(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ProtocolError::InvalidArgument(
            "identifier must not be empty".into(),
        ));
    }
    Ok(())
}

/// Validates an optional string field: if present it must be non-empty.
pub(crate) fn validate_optional_string(field: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        if v.trim().is_empty() {
            return Err(ProtocolError::InvalidArgument(format!(
                "{} must not be empty when present",
                field
            )));
        }
    }
    Ok(())
}

/// A sign-in credential.
///
/// # Required fields
/// - `id`: the identifier the user signs in with (non-empty)
/// - `authentication_method`: how the credential is verified
/// - `authentication_domain`: where the credential is usable
///
/// # Optional fields
/// - `display_name`: human-readable account name
/// - `display_picture`: http(s) URI of an account picture
/// - `password`: the secret itself (non-empty when present)
/// - `id_token`: proof-of-access token demonstrating control of the
///   identifier without re-verifying it
/// - additional properties: uninterpreted extension data
///
/// Immutable once built; use [`Credential::to_builder`] to derive a
/// modified copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    id: String,
    authentication_method: AuthenticationMethod,
    authentication_domain: AuthenticationDomain,
    display_name: Option<String>,
    display_picture: Option<String>,
    password: Option<String>,
    id_token: Option<String>,
    additional_properties: AdditionalProperties,
}

/// Wire form of a [`Credential`]. Identifier types travel as plain
/// strings; reconstruction re-parses and re-validates them.
#[derive(Serialize, Deserialize)]
pub(crate) struct CredentialWire {
    pub id: String,
    pub authentication_method: String,
    pub authentication_domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl Credential {
    /// Starts a builder from the three required fields.
    pub fn builder(
        id: impl Into<String>,
        authentication_method: AuthenticationMethod,
        authentication_domain: AuthenticationDomain,
    ) -> CredentialBuilder {
        CredentialBuilder {
            id: id.into(),
            authentication_method,
            authentication_domain,
            display_name: None,
            display_picture: None,
            password: None,
            id_token: None,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Derives a builder seeded with this credential's fields.
    pub fn to_builder(&self) -> CredentialBuilder {
        CredentialBuilder {
            id: self.id.clone(),
            authentication_method: self.authentication_method.clone(),
            authentication_domain: self.authentication_domain.clone(),
            display_name: self.display_name.clone(),
            display_picture: self.display_picture.clone(),
            password: self.password.clone(),
            id_token: self.id_token.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    /// Encodes this credential to its binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&self.to_wire())
    }

    /// Reconstructs a credential from its binary wire form.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] if the bytes are not valid CBOR;
    /// [`ProtocolError::MalformedData`] if the decoded fields violate any
    /// invariant. Validation is identical to building from raw field
    /// values - there is no trusted deserialization path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wire(wire::decode(bytes)?).map_err(ProtocolError::into_malformed)
    }

    pub(crate) fn to_wire(&self) -> CredentialWire {
        CredentialWire {
            id: self.id.clone(),
            authentication_method: self.authentication_method.as_str().to_string(),
            authentication_domain: self.authentication_domain.as_str().to_string(),
            display_name: self.display_name.clone(),
            display_picture: self.display_picture.clone(),
            password: self.password.clone(),
            id_token: self.id_token.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: CredentialWire) -> Result<Self> {
        let mut builder = Credential::builder(
            wire.id,
            AuthenticationMethod::parse(wire.authentication_method)?,
            AuthenticationDomain::parse(wire.authentication_domain)?,
        );
        builder.display_name = wire.display_name;
        builder.display_picture = wire.display_picture;
        builder.password = wire.password;
        builder.id_token = wire.id_token;
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// The identifier the user signs in with.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// How this credential is verified.
    pub fn authentication_method(&self) -> &AuthenticationMethod {
        &self.authentication_method
    }

    /// Where this credential is usable.
    pub fn authentication_domain(&self) -> &AuthenticationDomain {
        &self.authentication_domain
    }

    /// Human-readable account name, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Account picture URI, if any.
    pub fn display_picture(&self) -> Option<&str> {
        self.display_picture.as_deref()
    }

    /// The password, if this credential carries one.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Proof-of-access token, if any.
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }
}

impl AdditionalPropertiesContainer for Credential {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`Credential`]; validation is deferred to
/// [`CredentialBuilder::build`].
#[derive(Debug, Clone)]
pub struct CredentialBuilder {
    id: String,
    authentication_method: AuthenticationMethod,
    authentication_domain: AuthenticationDomain,
    display_name: Option<String>,
    display_picture: Option<String>,
    password: Option<String>,
    id_token: Option<String>,
    additional_properties: AdditionalProperties,
}

impl CredentialBuilder {
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

    /// Sets or clears the password.
    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password;
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

    /// Sets a single additional property from a UTF-8 string value.
    pub fn additional_property_string(
        self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.additional_property(key, value.into().into_bytes())
    }

    /// Validates every field and produces the immutable credential.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if the identifier is empty, the
    /// display name or password is present but empty, the picture URI is
    /// not http(s), or an additional-property key is empty.
    pub fn build(self) -> Result<Credential> {
        validate_identifier(&self.id)?;
        validate_optional_string("display name", &self.display_name)?;
        validate_optional_string("password", &self.password)?;
        validate_optional_string("id token", &self.id_token)?;
        if let Some(uri) = &self.display_picture {
            validate_picture_uri(uri)?;
        }
        validate_additional_properties(&self.additional_properties)?;
        Ok(Credential {
            id: self.id,
            authentication_method: self.authentication_method,
            authentication_domain: self.authentication_domain,
            display_name: self.display_name,
            display_picture: self.display_picture,
            password: self.password,
            id_token: self.id_token,
            additional_properties: self.additional_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_method() -> AuthenticationMethod {
        AuthenticationMethod::id_and_password()
    }

    fn test_domain() -> AuthenticationDomain {
        AuthenticationDomain::parse("https://login.example.com").unwrap()
    }

    #[test]
    fn test_minimal_credential_builds() {
        let credential = Credential::builder("alice@example.com", test_method(), test_domain())
            .build()
            .unwrap();
        assert_eq!(credential.id(), "alice@example.com");
        assert!(credential.password().is_none());
    }

    #[test]
    fn test_empty_identifier_rejected() {
        assert!(Credential::builder("", test_method(), test_domain())
            .build()
            .is_err());
        assert!(Credential::builder("   ", test_method(), test_domain())
            .build()
            .is_err());
    }

    #[test]
    fn test_empty_optional_fields_rejected() {
        let base = || Credential::builder("alice", test_method(), test_domain());
        assert!(base().password(Some(String::new())).build().is_err());
        assert!(base().display_name(Some("  ".into())).build().is_err());
    }

    #[test]
    fn test_picture_uri_must_be_web() {
        let base = || Credential::builder("alice", test_method(), test_domain());
        assert!(base()
            .display_picture(Some("https://example.com/alice.png".into()))
            .build()
            .is_ok());
        assert!(base()
            .display_picture(Some("ftp://example.com/alice.png".into()))
            .build()
            .is_err());
        assert!(base().display_picture(Some("https://".into())).build().is_err());
    }

    #[test]
    fn test_wire_round_trip_preserves_all_fields() {
        let credential = Credential::builder("alice@example.com", test_method(), test_domain())
            .display_name(Some("Alice".into()))
            .display_picture(Some("https://example.com/alice.png".into()))
            .password(Some("correct horse battery staple".into()))
            .id_token(Some("opaque-token".into()))
            .additional_property_string("provider.extension", "value")
            .additional_property("binary", vec![0, 159, 146, 150])
            .build()
            .unwrap();

        let bytes = credential.to_bytes().unwrap();
        let decoded = Credential::from_bytes(&bytes).unwrap();
        assert_eq!(credential, decoded);
        assert_eq!(decoded.additional_property("binary"), Some(&[0, 159, 146, 150][..]));
    }

    #[test]
    fn test_tampered_wire_form_fails_revalidation() {
        let credential = Credential::builder("alice", test_method(), test_domain())
            .build()
            .unwrap();
        // Rewrite the domain to carry a path, as a tampering provider might.
        let mut wire = credential.to_wire();
        wire.authentication_domain = "https://example.com/path".into();
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        let err = Credential::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedData(_)));

        // An emptied identifier must equally fail.
        let mut wire = credential.to_wire();
        wire.id = "  ".into();
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        assert!(matches!(
            Credential::from_bytes(&bytes).unwrap_err(),
            ProtocolError::MalformedData(_)
        ));
    }

    #[test]
    fn test_to_builder_round_trip() {
        let credential = Credential::builder("alice", test_method(), test_domain())
            .password(Some("secret".into()))
            .build()
            .unwrap();
        let copy = credential.to_builder().build().unwrap();
        assert_eq!(credential, copy);

        let changed = credential
            .to_builder()
            .password(Some("new secret".into()))
            .build()
            .unwrap();
        assert_eq!(changed.password(), Some("new secret"));
        assert_eq!(changed.id(), "alice");
    }
}
