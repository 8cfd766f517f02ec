// src/protocol/response.rs
//! Broadcast-query response payload.
//!
//! When a requester broadcasts a query, each capable provider answers with
//! a [`QueryResponse`]: optionally a [`FollowUpAction`] naming the
//! provider application that must be invoked directly to complete the
//! operation, plus uninterpreted additional properties. The follow-up's
//! declared provider identity is checked against the identity of the
//! application that actually sent the response during aggregation; a
//! mismatch indicates spoofing or corruption.

use crate::error::{ProtocolError, Result};
use crate::models::domain::AuthenticationDomain;
use crate::models::properties::{
    replace_or_clear, validate_additional_properties, AdditionalProperties,
    AdditionalPropertiesContainer,
};
use crate::protocol::wire;
use serde::{Deserialize, Serialize};

/// A provider's instruction for completing a broadcast operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpAction {
    /// Application-identity domain of the provider to invoke
    provider: AuthenticationDomain,
    /// Opaque request bytes the provider expects to receive
    request: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct FollowUpActionWire {
    pub provider: String,
    pub request: Vec<u8>,
}

impl FollowUpAction {
    /// Creates a follow-up action for the given provider application.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidArgument`] if the provider domain is not of
    /// the application-identity family - a follow-up must name an
    /// installed application, not a web origin.
    pub fn new(provider: AuthenticationDomain, request: Vec<u8>) -> Result<Self> {
        if !provider.is_app_identity() {
            return Err(ProtocolError::InvalidArgument(format!(
                "follow-up provider must be an application identity: {}",
                provider
            )));
        }
        Ok(FollowUpAction { provider, request })
    }

    /// The provider application the follow-up targets.
    pub fn provider(&self) -> &AuthenticationDomain {
        &self.provider
    }

    /// The opaque request to deliver to the provider.
    pub fn request(&self) -> &[u8] {
        &self.request
    }

    pub(crate) fn to_wire(&self) -> FollowUpActionWire {
        FollowUpActionWire {
            provider: self.provider.as_str().to_string(),
            request: self.request.clone(),
        }
    }

    pub(crate) fn from_wire(wire: FollowUpActionWire) -> Result<Self> {
        FollowUpAction::new(AuthenticationDomain::parse(wire.provider)?, wire.request)
    }
}

/// A single provider's response to a broadcast query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    follow_up: Option<FollowUpAction>,
    additional_properties: AdditionalProperties,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct QueryResponseWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUpActionWire>,
    #[serde(default, skip_serializing_if = "AdditionalProperties::is_empty")]
    pub additional_properties: AdditionalProperties,
}

impl QueryResponse {
    /// Starts an empty builder (a response with no follow-up means "this
    /// provider has nothing to offer").
    pub fn builder() -> QueryResponseBuilder {
        QueryResponseBuilder {
            follow_up: None,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Encodes to the binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&self.to_wire())
    }

    /// Reconstructs from the binary wire form with full re-validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wire(wire::decode(bytes)?).map_err(ProtocolError::into_malformed)
    }

    pub(crate) fn to_wire(&self) -> QueryResponseWire {
        QueryResponseWire {
            follow_up: self.follow_up.as_ref().map(FollowUpAction::to_wire),
            additional_properties: self.additional_properties.clone(),
        }
    }

    pub(crate) fn from_wire(wire: QueryResponseWire) -> Result<Self> {
        let mut builder = QueryResponse::builder();
        if let Some(follow_up) = wire.follow_up {
            builder = builder.follow_up(Some(FollowUpAction::from_wire(follow_up)?));
        }
        builder.additional_properties = wire.additional_properties;
        builder.build()
    }

    /// The follow-up action, if the provider can serve the operation.
    pub fn follow_up(&self) -> Option<&FollowUpAction> {
        self.follow_up.as_ref()
    }
}

impl AdditionalPropertiesContainer for QueryResponse {
    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

/// Staged construction of a [`QueryResponse`].
#[derive(Debug, Clone)]
pub struct QueryResponseBuilder {
    follow_up: Option<FollowUpAction>,
    additional_properties: AdditionalProperties,
}

impl QueryResponseBuilder {
    /// Sets or clears the follow-up action.
    pub fn follow_up(mut self, follow_up: Option<FollowUpAction>) -> Self {
        self.follow_up = follow_up;
        self
    }

    /// Replaces the additional-properties map; `None` clears it.
    pub fn additional_properties(mut self, properties: Option<AdditionalProperties>) -> Self {
        replace_or_clear(&mut self.additional_properties, properties);
        self
    }

    /// Validates and produces the immutable response.
    pub fn build(self) -> Result<QueryResponse> {
        validate_additional_properties(&self.additional_properties)?;
        Ok(QueryResponse {
            follow_up: self.follow_up,
            additional_properties: self.additional_properties,
        })
    }
}
