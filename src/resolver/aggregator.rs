// src/resolver/aggregator.rs
//! Aggregation of broadcast-query responses.
//!
//! The transport collaborator delivers one completed batch of
//! `(provider identity, response bytes)` pairs per broadcast query. The
//! aggregator validates each response independently and is tolerant of
//! partial failure: an undecodable response is dropped and logged, never
//! fatal to the batch. A response whose follow-up action names a provider
//! other than the application that sent it indicates spoofing or
//! corruption and is dropped as well.

use crate::models::domain::AuthenticationDomain;
use crate::protocol::response::{FollowUpAction, QueryResponse};
use std::collections::BTreeMap;

/// The classified outcome of one aggregated batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No provider offered a follow-up: nothing available.
    Nothing,
    /// Exactly one follow-up survived; it may be acted on directly.
    Single(FollowUpAction),
    /// Several follow-ups survived; the user must choose among them.
    Choice(Vec<FollowUpAction>),
}

/// Result of aggregating one broadcast batch: the surviving per-provider
/// responses plus the classified outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Validated responses, keyed by responding provider identity
    pub responses: BTreeMap<AuthenticationDomain, QueryResponse>,
    /// The actionable classification of the batch
    pub outcome: Outcome,
}

/// Validates, deduplicates and classifies one batch of raw responses.
///
/// # Arguments
/// * `raw` - `(sender identity, response bytes)` pairs as delivered by
///   the transport; delivery order is not significant
///
/// # Drop rules
/// - response bytes that fail to decode or re-validate
/// - responses whose follow-up targets a provider other than the sender
/// - a later response from a sender already seen in the batch
///
/// Dropped responses are logged at `warn` level and never fail the batch.
pub fn aggregate<I>(raw: I) -> Aggregation
where
    I: IntoIterator<Item = (AuthenticationDomain, Vec<u8>)>,
{
    let mut responses: BTreeMap<AuthenticationDomain, QueryResponse> = BTreeMap::new();

    for (sender, bytes) in raw {
        let response = match QueryResponse::from_bytes(&bytes) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("dropping undecodable response from {}: {}", sender, err);
                continue;
            }
        };
        if let Some(follow_up) = response.follow_up() {
            if follow_up.provider() != &sender {
                log::warn!(
                    "dropping response from {} whose follow-up targets {}",
                    sender,
                    follow_up.provider()
                );
                continue;
            }
        }
        if responses.contains_key(&sender) {
            log::warn!("dropping duplicate response from {}", sender);
            continue;
        }
        responses.insert(sender, response);
    }

    let mut follow_ups: Vec<FollowUpAction> = responses
        .values()
        .filter_map(|r| r.follow_up().cloned())
        .collect();
    let outcome = match follow_ups.len() {
        0 => Outcome::Nothing,
        1 => Outcome::Single(follow_ups.remove(0)),
        _ => Outcome::Choice(follow_ups),
    };

    Aggregation { responses, outcome }
}
