// src/lib.rs

//! # Credex - Device-Local Credential Exchange Protocol
//!
//! This crate implements the core of a device-local credential-exchange
//! protocol: a requesting application asks one or more credential providers
//! installed on the same device for sign-in credentials, login hints, or to
//! persist/delete a credential, without either party knowing about the other
//! in advance.
//!
//! ## Architecture Overview
//! 1. **Models Layer**: validated identifier value types and protocol
//!    message aggregates (`Credential`, `Hint`, `TokenRequestInfo`)
//! 2. **Protocol Layer**: request/result pairs for the retrieve, hint,
//!    save and delete operations, plus the compact binary wire form
//! 3. **Password Layer**: password specification engine (generation and
//!    conformance checking)
//! 4. **Resolver Layer**: deterministic provider-preference resolution and
//!    broadcast-response aggregation
//! 5. **Services Layer**: collaborator traits (transport, application
//!    registry, disambiguation UI) and the requester-side client
//!
//! All protocol types are built through validating builders, are immutable
//! once built, and round-trip through a compact binary form with full
//! re-validation on decode. Every message is validated independently by
//! both requester and provider; there is no trusted deserialization path.

pub mod error;     // Crate-wide error type
pub mod models;    // Identifier value types and message aggregates
pub mod password;  // Password specification engine
pub mod protocol;  // Request/result pairs and wire form
pub mod resolver;  // Preference resolution and response aggregation
pub mod services;  // Collaborator traits and requester-side client
pub mod utils;     // Digest helpers

pub use error::{ProtocolError, Result};
pub use models::credential::Credential;
pub use models::domain::AuthenticationDomain;
pub use models::hint::Hint;
pub use models::method::AuthenticationMethod;
pub use models::properties::{AdditionalProperties, AdditionalPropertiesContainer};
pub use models::token_info::TokenRequestInfo;
pub use password::{ConformanceFlags, PasswordSpecification};
pub use resolver::aggregator::{aggregate, Aggregation, Outcome};
pub use resolver::preference::PreferenceResolver;
