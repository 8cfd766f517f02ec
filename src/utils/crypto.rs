// src/utils/crypto.rs
//! Cryptographic digest utilities for application-identity derivation.
//!
//! SHA-512 is the sole cryptographic primitive in the protocol core: it is
//! used to derive a stable, collision-resistant hash of an application's
//! signing certificate, which becomes the authority component of an
//! `app-id://` authentication domain.

use ring::digest;

/// Computes the identity hash of an application signing certificate.
///
/// # Arguments
/// * `certificate` - Raw signing certificate bytes as obtained from the
///   installed-application registry
///
/// # Returns
/// URL-safe base64 encoding (unpadded) of the SHA-512 digest over the
/// certificate bytes.
///
/// # Determinism
/// The same certificate bytes always produce the same hash, so two parties
/// observing the same installed application derive the same identity
/// without coordination. Collision resistance is inherited from SHA-512.
pub fn identity_hash(certificate: &[u8]) -> String {
    let digest = digest::digest(&digest::SHA512, certificate);
    base64::encode_config(digest.as_ref(), base64::URL_SAFE_NO_PAD)
}
