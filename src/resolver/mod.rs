// src/resolver/mod.rs
//! Provider selection: deterministic preference resolution over candidate
//! providers and aggregation of broadcast-query responses.

pub mod aggregator;
pub mod known;
pub mod preference;
