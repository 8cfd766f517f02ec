// src/models/domain.rs
//! Authentication domain value type.
//!
//! An authentication domain names *where* a credential is usable: either a
//! web origin (`https://example.com`) or an installed application
//! (`app-id://<identity-hash>@<application-id>`). The string form is held
//! as an absolute URI of the exact shape `scheme://authority` - no path,
//! query, or fragment component is permitted.

use crate::error::{ProtocolError, Result};
use crate::utils::crypto::identity_hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheme used by the application-identity domain family.
pub const APP_ID_SCHEME: &str = "app-id";

/// Validates a `scheme://authority`-only URI and returns the scheme/authority
/// split points.
///
/// The accepted shape is strict:
/// - scheme: one ASCII letter followed by letters, digits, `+`, `-` or `.`
/// - separator: the literal `://`
/// - authority: non-empty, no `/`, `?`, `#`, whitespace or control characters
///
/// Anything else - a path, a query, a fragment, an empty component - is
/// rejected. Returns the byte offset of the authority component on success.
pub(crate) fn validate_uri_shape(value: &str) -> Result<usize> {
    let sep = value
        .find("://")
        .ok_or_else(|| malformed(value, "missing '://' separator"))?;
    let scheme = &value[..sep];
    let authority = &value[sep + 3..];

    if scheme.is_empty() {
        return Err(malformed(value, "empty scheme"));
    }
    let mut chars = scheme.chars();
    // First scheme character must be alphabetic per RFC 3986.
    if !chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) {
        return Err(malformed(value, "scheme must start with a letter"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        return Err(malformed(value, "invalid character in scheme"));
    }

    if authority.is_empty() {
        return Err(malformed(value, "empty authority"));
    }
    if let Some(bad) = authority
        .chars()
        .find(|&c| c == '/' || c == '?' || c == '#' || c.is_whitespace() || c.is_control())
    {
        let reason = match bad {
            '/' => "path component not permitted",
            '?' => "query component not permitted",
            '#' => "fragment component not permitted",
            _ => "invalid character in authority",
        };
        return Err(malformed(value, reason));
    }

    Ok(sep + 3)
}

fn malformed(value: &str, reason: &str) -> ProtocolError {
    ProtocolError::MalformedIdentifier(format!("{:?}: {}", value, reason))
}

/// A validated authentication domain.
///
/// Two families are recognized:
/// - **Web**: `http://` or `https://` origins
/// - **Application identity**: `app-id://<identity-hash>@<application-id>`,
///   where the identity hash is the URL-safe unpadded base64 encoding of
///   the SHA-512 digest over the application's signing certificate
///
/// The type is immutable; equality and ordering are defined over the
/// canonical string form, so a `BTreeSet<AuthenticationDomain>` iterates
/// in a deterministic order and the type is usable as a map key.
///
/// # Errors
/// Construction from a string fails with
/// [`ProtocolError::MalformedIdentifier`] for any value that is not of the
/// exact `scheme://authority` shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthenticationDomain {
    /// Canonical URI string, validated at construction
    uri: String,
    /// Byte offset of the authority component within `uri`
    authority_start: usize,
}

impl AuthenticationDomain {
    /// Parses and validates an authentication domain from its string form.
    ///
    /// # Arguments
    /// * `uri` - Candidate domain string, e.g. `"https://example.com"`
    ///
    /// # Errors
    /// [`ProtocolError::MalformedIdentifier`] if the value has a path,
    /// query or fragment component, an empty scheme or authority, or any
    /// character outside the permitted sets.
    pub fn parse(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        let authority_start = validate_uri_shape(&uri)?;
        Ok(AuthenticationDomain {
            uri,
            authority_start,
        })
    }

    /// Derives the application-identity domain of an installed application.
    ///
    /// # Arguments
    /// * `application_id` - The application's installation identifier
    ///   (e.g. a package name such as `"com.example.app"`)
    /// * `certificate` - The application's signing certificate bytes, as
    ///   obtained from the installed-application registry
    ///
    /// # Returns
    /// `app-id://<identity-hash>@<application-id>` where the hash is the
    /// URL-safe unpadded base64 SHA-512 of the certificate.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if the application id is empty or
    /// contains characters that would break the authority shape.
    pub fn from_app_identity(application_id: &str, certificate: &[u8]) -> Result<Self> {
        if application_id.trim().is_empty() {
            return Err(ProtocolError::InvalidArgument(
                "application id must not be empty".into(),
            ));
        }
        let hash = identity_hash(certificate);
        let uri = format!("{}://{}@{}", APP_ID_SCHEME, hash, application_id);
        // Re-validate: a hostile application id (slashes, whitespace) must
        // not be able to smuggle structure into the authority.
        Self::parse(uri).map_err(|e| ProtocolError::InvalidArgument(e.to_string()))
    }

    /// Returns the scheme component of the domain.
    pub fn scheme(&self) -> &str {
        &self.uri[..self.authority_start - 3]
    }

    /// Returns the authority component of the domain.
    pub fn authority(&self) -> &str {
        &self.uri[self.authority_start..]
    }

    /// Whether this domain names an installed application (`app-id://`).
    pub fn is_app_identity(&self) -> bool {
        self.scheme() == APP_ID_SCHEME
    }

    /// Whether this domain names a web origin (`http://` or `https://`).
    pub fn is_web_domain(&self) -> bool {
        matches!(self.scheme(), "http" | "https")
    }

    /// Extracts the application id from an application-identity domain.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if this domain is not of the
    /// application-identity family or lacks the `<hash>@<id>` authority
    /// structure.
    pub fn application_id(&self) -> Result<&str> {
        if !self.is_app_identity() {
            return Err(ProtocolError::InvalidArgument(format!(
                "{} is not an application-identity domain",
                self.uri
            )));
        }
        match self.authority().split_once('@') {
            Some((hash, app_id)) if !hash.is_empty() && !app_id.is_empty() => Ok(app_id),
            _ => Err(ProtocolError::InvalidArgument(format!(
                "{} lacks an '<identity-hash>@<application-id>' authority",
                self.uri
            ))),
        }
    }

    /// Canonical string form of the domain.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for AuthenticationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<String> for AuthenticationDomain {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<AuthenticationDomain> for String {
    fn from(domain: AuthenticationDomain) -> String {
        domain.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_domain_parses() {
        let domain = AuthenticationDomain::parse("https://example.com").unwrap();
        assert!(domain.is_web_domain());
        assert!(!domain.is_app_identity());
        assert_eq!(domain.scheme(), "https");
        assert_eq!(domain.authority(), "example.com");
    }

    #[test]
    fn test_path_component_rejected() {
        assert!(AuthenticationDomain::parse("https://example.com/path").is_err());
    }

    #[test]
    fn test_query_and_fragment_rejected() {
        assert!(AuthenticationDomain::parse("https://example.com?q=1").is_err());
        assert!(AuthenticationDomain::parse("https://example.com#frag").is_err());
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(AuthenticationDomain::parse("://example.com").is_err());
        assert!(AuthenticationDomain::parse("https://").is_err());
        assert!(AuthenticationDomain::parse("example.com").is_err());
        assert!(AuthenticationDomain::parse("").is_err());
    }

    #[test]
    fn test_scheme_shape_rejected() {
        assert!(AuthenticationDomain::parse("1https://example.com").is_err());
        assert!(AuthenticationDomain::parse("ht tp://example.com").is_err());
    }

    #[test]
    fn test_app_identity_derivation() {
        let domain =
            AuthenticationDomain::from_app_identity("com.example.app", b"certificate").unwrap();
        assert!(domain.is_app_identity());
        assert_eq!(domain.application_id().unwrap(), "com.example.app");

        // Deterministic: same inputs, same domain.
        let again =
            AuthenticationDomain::from_app_identity("com.example.app", b"certificate").unwrap();
        assert_eq!(domain, again);

        // Different certificate, different identity.
        let other =
            AuthenticationDomain::from_app_identity("com.example.app", b"other cert").unwrap();
        assert_ne!(domain, other);
    }

    #[test]
    fn test_hostile_application_id_rejected() {
        assert!(AuthenticationDomain::from_app_identity("com.example/app", b"c").is_err());
        assert!(AuthenticationDomain::from_app_identity("", b"c").is_err());
        assert!(AuthenticationDomain::from_app_identity("  ", b"c").is_err());
    }

    #[test]
    fn test_application_id_fails_on_web_domain() {
        let domain = AuthenticationDomain::parse("https://example.com").unwrap();
        assert!(domain.application_id().is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic_on_canonical_form() {
        let a = AuthenticationDomain::parse("https://a.example.com").unwrap();
        let b = AuthenticationDomain::parse("https://b.example.com").unwrap();
        assert!(a < b);
        assert_eq!(a.as_str().cmp(b.as_str()), std::cmp::Ordering::Less);
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let domain = AuthenticationDomain::parse("https://example.com").unwrap();
        let bytes = serde_cbor::to_vec(&domain).unwrap();
        let decoded: AuthenticationDomain = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(domain, decoded);

        // A domain smuggled in as a raw string with a path must fail decode.
        let bad = serde_cbor::to_vec(&String::from("https://example.com/path")).unwrap();
        assert!(serde_cbor::from_slice::<AuthenticationDomain>(&bad).is_err());
    }
}
