// src/services/mod.rs
//! Requester-side services: the external-collaborator traits and the
//! client that orchestrates a complete credential exchange.

pub mod client;
pub mod collaborators;

pub use client::{ClientOutcome, CredentialClient};
pub use collaborators::{ApplicationRegistry, DisambiguationUi, QueryTransport};
