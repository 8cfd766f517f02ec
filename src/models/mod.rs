// src/models/mod.rs
//! Protocol data model: validated identifier value types and the immutable
//! message aggregates built from them.

pub mod credential;
pub mod domain;
pub mod hint;
pub mod method;
pub mod properties;
pub mod token_info;
