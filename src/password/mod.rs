// src/password/mod.rs
//! Password specification engine.
//!
//! Defines an acceptable password shape (length range, allowed and
//! required character sets), generates conforming random passwords from a
//! cryptographically secure source, and checks conformance of arbitrary
//! strings.

mod specification;

pub use specification::{
    charsets, ConformanceFlags, PasswordSpecification, PasswordSpecificationBuilder,
};
pub(crate) use specification::PasswordSpecificationWire;
