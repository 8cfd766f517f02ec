// src/utils/mod.rs
//! Helper functions shared across the protocol core.

pub mod crypto;
