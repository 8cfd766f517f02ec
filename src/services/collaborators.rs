// src/services/collaborators.rs
//! Traits for the platform collaborators the protocol core calls into.
//!
//! The core itself performs no I/O: broadcasting queries, enumerating
//! installed applications and rendering a disambiguation choice are
//! platform concerns, injected behind these traits. Implementations own
//! any timeout or retry policy; the core imposes none.

use crate::models::domain::AuthenticationDomain;
use crate::protocol::response::FollowUpAction;

/// Inter-process transport for broadcast queries and direct dispatch.
pub trait QueryTransport {
    /// Broadcasts an encoded request for the given action to every
    /// capable provider and returns the completed batch of
    /// `(provider identity, response bytes)` pairs.
    ///
    /// No ordering or latency contract: the implementation decides how
    /// long to wait for stragglers.
    fn broadcast(&self, action: &str, request: &[u8]) -> Vec<(AuthenticationDomain, Vec<u8>)>;

    /// Delivers a follow-up request directly to one provider and returns
    /// its response bytes, or `None` if the provider did not answer.
    fn dispatch(&self, provider: &AuthenticationDomain, request: &[u8]) -> Option<Vec<u8>>;
}

/// Registry of applications installed on the device.
pub trait ApplicationRegistry {
    /// The identities of all applications capable of handling an action,
    /// in the registry's stable enumeration order.
    fn capable_providers(&self, action: &str) -> Vec<AuthenticationDomain>;

    /// The signing certificate of an installed application, or `None` if
    /// no such application exists.
    fn signing_certificate(&self, application_id: &str) -> Option<Vec<u8>>;
}

/// On-screen disambiguation among equally valid follow-up actions.
pub trait DisambiguationUi {
    /// Presents the choices and returns the user's pick, or `None` if the
    /// user declined.
    fn choose(&self, choices: &[FollowUpAction]) -> Option<FollowUpAction>;
}
