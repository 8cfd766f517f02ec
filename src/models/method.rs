// src/models/method.rs
//! Authentication method value type.
//!
//! An authentication method names *how* a credential is verified: a
//! password, a federated identity provider, an email loop, and so on. It
//! shares the strict `scheme://authority`-only URI shape with
//! [`AuthenticationDomain`](crate::models::domain::AuthenticationDomain)
//! but is a semantically distinct type - the two are never interchangeable.

use crate::error::{ProtocolError, Result};
use crate::models::domain::validate_uri_shape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in authentication method: an identifier paired with a password.
pub const ID_AND_PASSWORD: &str = "credex://id-and-password";

/// Built-in authentication method: possession of an email address.
pub const EMAIL: &str = "credex://email";

/// Built-in authentication method: possession of a phone number.
pub const PHONE: &str = "credex://phone";

/// A validated authentication method.
///
/// Federated identity providers are expressed as web-family URIs (e.g.
/// `https://accounts.example.com`); the built-in methods use the
/// `credex://` scheme. Equality and ordering are defined over the
/// canonical string form for deterministic set iteration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthenticationMethod {
    uri: String,
}

impl AuthenticationMethod {
    /// Parses and validates an authentication method from its string form.
    ///
    /// # Errors
    /// [`ProtocolError::MalformedIdentifier`] if the value is not of the
    /// exact `scheme://authority` shape.
    pub fn parse(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        validate_uri_shape(&uri)?;
        Ok(AuthenticationMethod { uri })
    }

    /// The built-in identifier-and-password method.
    pub fn id_and_password() -> Self {
        AuthenticationMethod {
            uri: ID_AND_PASSWORD.to_string(),
        }
    }

    /// The built-in email-possession method.
    pub fn email() -> Self {
        AuthenticationMethod {
            uri: EMAIL.to_string(),
        }
    }

    /// The built-in phone-possession method.
    pub fn phone() -> Self {
        AuthenticationMethod {
            uri: PHONE.to_string(),
        }
    }

    /// Canonical string form of the method.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<String> for AuthenticationMethod {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<AuthenticationMethod> for String {
    fn from(method: AuthenticationMethod) -> String {
        method.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_methods_are_valid() {
        assert_eq!(AuthenticationMethod::id_and_password().as_str(), ID_AND_PASSWORD);
        assert!(AuthenticationMethod::parse(ID_AND_PASSWORD).is_ok());
        assert!(AuthenticationMethod::parse(EMAIL).is_ok());
        assert!(AuthenticationMethod::parse(PHONE).is_ok());
    }

    #[test]
    fn test_federated_method_is_valid() {
        let method = AuthenticationMethod::parse("https://accounts.example.com").unwrap();
        assert_eq!(method.as_str(), "https://accounts.example.com");
    }

    #[test]
    fn test_malformed_method_rejected() {
        assert!(AuthenticationMethod::parse("credex://id/and/password").is_err());
        assert!(AuthenticationMethod::parse("password").is_err());
        assert!(AuthenticationMethod::parse("").is_err());
    }
}
