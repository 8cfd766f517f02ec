// src/protocol/mod.rs
//! Protocol operations: request/result pairs for credential retrieval,
//! hint retrieval, save and delete, the broadcast-query response payload,
//! and the compact binary wire form they all share.
//!
//! Every request and result is validated at build time and re-validated
//! when reconstructed from its wire form. Result codes are closed
//! per-operation enumerations; unknown codes on the wire decode to the
//! `Unspecified` catch-all, never to an error.

pub mod delete;
pub mod hint_retrieve;
pub mod response;
pub mod retrieve;
pub mod save;
pub mod wire;

pub use wire::ClientVersion;

/// Action name for credential retrieval broadcasts.
pub const ACTION_RETRIEVE: &str = "credex.retrieve";
/// Action name for hint retrieval broadcasts.
pub const ACTION_HINT: &str = "credex.hint";
/// Action name for credential save broadcasts.
pub const ACTION_SAVE: &str = "credex.save";
/// Action name for credential delete broadcasts.
pub const ACTION_DELETE: &str = "credex.delete";
