// src/services/client.rs
//! Requester-side credential client.
//!
//! `CredentialClient` ties the protocol core to its collaborators: it
//! encodes a validated request, broadcasts it through the transport,
//! aggregates the per-provider responses, applies the preference resolver
//! to pick an implicit provider (or falls back to the disambiguation UI),
//! dispatches the surviving follow-up, and decodes the provider's final
//! result.
//!
//! The client is an explicitly constructed service object: its lifetime
//! and its collaborators are owned by the caller. Nothing in this module
//! is a process-wide singleton.

use crate::error::Result;
use crate::models::domain::AuthenticationDomain;
use crate::protocol::delete::{DeleteRequest, DeleteResult};
use crate::protocol::hint_retrieve::{HintRetrieveRequest, HintRetrieveResult};
use crate::protocol::response::FollowUpAction;
use crate::protocol::retrieve::{RetrieveRequest, RetrieveResult};
use crate::protocol::save::{SaveRequest, SaveResult};
use crate::protocol::{ACTION_DELETE, ACTION_HINT, ACTION_RETRIEVE, ACTION_SAVE};
use crate::resolver::aggregator::{aggregate, Outcome};
use crate::resolver::preference::PreferenceResolver;
use crate::services::collaborators::{ApplicationRegistry, DisambiguationUi, QueryTransport};

/// Terminal outcome of one client operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome<T> {
    /// No provider offered to serve the operation.
    NothingAvailable,
    /// Several providers qualified and the user declined to choose.
    UserDeclined,
    /// A provider served the operation; its decoded result.
    Completed(T),
}

/// Requester-side orchestration of the credential exchange protocol.
pub struct CredentialClient<T, R, U> {
    transport: T,
    registry: R,
    ui: U,
    resolver: PreferenceResolver,
}

impl<T, R, U> CredentialClient<T, R, U>
where
    T: QueryTransport,
    R: ApplicationRegistry,
    U: DisambiguationUi,
{
    /// Creates a client from its collaborators and preference policy.
    pub fn new(transport: T, registry: R, ui: U, resolver: PreferenceResolver) -> Self {
        CredentialClient {
            transport,
            registry,
            ui,
            resolver,
        }
    }

    /// Derives the application-identity domain of an installed
    /// application by looking up its signing certificate.
    ///
    /// Returns `None` if the registry does not know the application.
    pub fn provider_identity(&self, application_id: &str) -> Option<AuthenticationDomain> {
        let certificate = self.registry.signing_certificate(application_id)?;
        AuthenticationDomain::from_app_identity(application_id, &certificate).ok()
    }

    /// The providers currently capable of handling an action.
    pub fn capable_providers(&self, action: &str) -> Vec<AuthenticationDomain> {
        self.registry.capable_providers(action)
    }

    /// Retrieves a stored credential.
    pub fn retrieve(&self, request: &RetrieveRequest) -> Result<ClientOutcome<RetrieveResult>> {
        self.execute(ACTION_RETRIEVE, request.to_bytes()?, |bytes| {
            RetrieveResult::from_bytes(bytes)
        })
    }

    /// Retrieves a login hint for account discovery or creation.
    pub fn retrieve_hint(
        &self,
        request: &HintRetrieveRequest,
    ) -> Result<ClientOutcome<HintRetrieveResult>> {
        self.execute(ACTION_HINT, request.to_bytes()?, |bytes| {
            HintRetrieveResult::from_bytes(bytes)
        })
    }

    /// Saves a credential with a provider.
    pub fn save(&self, request: &SaveRequest) -> Result<ClientOutcome<SaveResult>> {
        self.execute(ACTION_SAVE, request.to_bytes()?, |bytes| {
            SaveResult::from_bytes(bytes)
        })
    }

    /// Deletes a stored credential.
    pub fn delete(&self, request: &DeleteRequest) -> Result<ClientOutcome<DeleteResult>> {
        self.execute(ACTION_DELETE, request.to_bytes()?, |bytes| {
            DeleteResult::from_bytes(bytes)
        })
    }

    /// Shared broadcast-aggregate-dispatch pipeline.
    ///
    /// `decode` interprets the final provider response; a response that
    /// fails to decode surfaces as the operation's error, since at that
    /// point a single deliberately chosen provider produced it.
    fn execute<F, O>(
        &self,
        action: &str,
        request_bytes: Vec<u8>,
        decode: F,
    ) -> Result<ClientOutcome<O>>
    where
        F: Fn(&[u8]) -> Result<O>,
    {
        let batch = self.transport.broadcast(action, &request_bytes);
        log::debug!("{}: {} raw responses", action, batch.len());
        let aggregation = aggregate(batch);

        let follow_up = match aggregation.outcome {
            Outcome::Nothing => return Ok(ClientOutcome::NothingAvailable),
            Outcome::Single(follow_up) => follow_up,
            Outcome::Choice(choices) => match self.pick(choices) {
                Some(follow_up) => follow_up,
                None => return Ok(ClientOutcome::UserDeclined),
            },
        };

        log::debug!("{}: dispatching to {}", action, follow_up.provider());
        match self
            .transport
            .dispatch(follow_up.provider(), follow_up.request())
        {
            Some(bytes) => Ok(ClientOutcome::Completed(decode(&bytes)?)),
            None => {
                log::warn!("{}: {} did not answer", action, follow_up.provider());
                Ok(ClientOutcome::NothingAvailable)
            }
        }
    }

    /// Applies the preference policy to a multi-provider choice, falling
    /// back to the disambiguation UI when no implicit preference exists.
    fn pick(&self, choices: Vec<FollowUpAction>) -> Option<FollowUpAction> {
        let providers: Vec<&AuthenticationDomain> =
            choices.iter().map(FollowUpAction::provider).collect();
        if let Some(preferred) = self.resolver.resolve(providers.into_iter()) {
            let preferred = preferred.clone();
            return choices
                .into_iter()
                .find(|follow_up| follow_up.provider() == &preferred);
        }
        self.ui.choose(&choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::method::AuthenticationMethod;
    use crate::protocol::response::QueryResponse;
    use crate::protocol::retrieve::RetrieveResultCode;
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::collections::BTreeSet;

    fn provider(id: &str) -> AuthenticationDomain {
        AuthenticationDomain::from_app_identity(id, id.as_bytes()).unwrap()
    }

    /// Transport serving canned broadcast batches and dispatch replies.
    struct FakeTransport {
        batch: Vec<(AuthenticationDomain, Vec<u8>)>,
        replies: BTreeMap<AuthenticationDomain, Vec<u8>>,
    }

    impl QueryTransport for FakeTransport {
        fn broadcast(&self, _action: &str, _request: &[u8]) -> Vec<(AuthenticationDomain, Vec<u8>)> {
            self.batch.clone()
        }

        fn dispatch(&self, provider: &AuthenticationDomain, _request: &[u8]) -> Option<Vec<u8>> {
            self.replies.get(provider).cloned()
        }
    }

    struct FakeRegistry;

    impl ApplicationRegistry for FakeRegistry {
        fn capable_providers(&self, _action: &str) -> Vec<AuthenticationDomain> {
            Vec::new()
        }

        fn signing_certificate(&self, application_id: &str) -> Option<Vec<u8>> {
            (application_id != "com.example.absent").then(|| application_id.as_bytes().to_vec())
        }
    }

    /// UI that always picks the first choice, recording whether it ran.
    struct FirstChoiceUi {
        invoked: Cell<bool>,
    }

    impl DisambiguationUi for FirstChoiceUi {
        fn choose(&self, choices: &[FollowUpAction]) -> Option<FollowUpAction> {
            self.invoked.set(true);
            choices.first().cloned()
        }
    }

    fn follow_up_response(target: &AuthenticationDomain) -> Vec<u8> {
        QueryResponse::builder()
            .follow_up(Some(FollowUpAction::new(target.clone(), vec![1]).unwrap()))
            .build()
            .unwrap()
            .to_bytes()
            .unwrap()
    }

    fn success_result() -> Vec<u8> {
        let credential = crate::models::credential::Credential::builder(
            "alice@example.com",
            AuthenticationMethod::id_and_password(),
            AuthenticationDomain::parse("https://login.example.com").unwrap(),
        )
        .password(Some("secret".into()))
        .build()
        .unwrap();
        RetrieveResult::builder(RetrieveResultCode::Success)
            .credential(Some(credential))
            .build()
            .unwrap()
            .to_bytes()
            .unwrap()
    }

    fn client(
        batch: Vec<(AuthenticationDomain, Vec<u8>)>,
        replies: BTreeMap<AuthenticationDomain, Vec<u8>>,
        recognized: BTreeSet<AuthenticationDomain>,
        default: Option<AuthenticationDomain>,
    ) -> CredentialClient<FakeTransport, FakeRegistry, FirstChoiceUi> {
        CredentialClient::new(
            FakeTransport { batch, replies },
            FakeRegistry,
            FirstChoiceUi {
                invoked: Cell::new(false),
            },
            PreferenceResolver::new(recognized, default),
        )
    }

    fn retrieve_request() -> RetrieveRequest {
        RetrieveRequest::builder([AuthenticationMethod::id_and_password()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_no_responses_means_nothing_available() {
        let c = client(Vec::new(), BTreeMap::new(), BTreeSet::new(), None);
        let outcome = c.retrieve(&retrieve_request()).unwrap();
        assert_eq!(outcome, ClientOutcome::NothingAvailable);
    }

    #[test]
    fn test_single_provider_is_dispatched_silently() {
        let p = provider("com.example.provider");
        let mut replies = BTreeMap::new();
        replies.insert(p.clone(), success_result());
        let c = client(
            vec![(p.clone(), follow_up_response(&p))],
            replies,
            BTreeSet::new(),
            None,
        );
        match c.retrieve(&retrieve_request()).unwrap() {
            ClientOutcome::Completed(result) => {
                assert_eq!(result.result_code(), RetrieveResultCode::Success);
                assert_eq!(result.credential().unwrap().id(), "alice@example.com");
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(!c.ui.invoked.get());
    }

    #[test]
    fn test_preferred_provider_skips_disambiguation() {
        let default = provider("com.example.default");
        let chosen = provider("com.example.chosen");
        let mut replies = BTreeMap::new();
        replies.insert(chosen.clone(), success_result());
        let c = client(
            vec![
                (default.clone(), follow_up_response(&default)),
                (chosen.clone(), follow_up_response(&chosen)),
            ],
            replies,
            [default.clone(), chosen.clone()].into_iter().collect(),
            Some(default.clone()),
        );
        // Two recognized candidates, one the well-known default: the
        // other is auto-selected without UI.
        match c.retrieve(&retrieve_request()).unwrap() {
            ClientOutcome::Completed(result) => {
                assert_eq!(result.result_code(), RetrieveResultCode::Success)
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(!c.ui.invoked.get());
    }

    #[test]
    fn test_unrecognized_competitor_forces_ui() {
        let known = provider("com.example.known");
        let unknown = provider("com.example.unknown");
        let mut replies = BTreeMap::new();
        replies.insert(known.clone(), success_result());
        let c = client(
            vec![
                (known.clone(), follow_up_response(&known)),
                (unknown.clone(), follow_up_response(&unknown)),
            ],
            replies,
            [known.clone()].into_iter().collect(),
            None,
        );
        let _ = c.retrieve(&retrieve_request()).unwrap();
        assert!(c.ui.invoked.get());
    }

    #[test]
    fn test_provider_silence_after_dispatch_is_nothing_available() {
        let p = provider("com.example.mute");
        let c = client(
            vec![(p.clone(), follow_up_response(&p))],
            BTreeMap::new(),
            BTreeSet::new(),
            None,
        );
        assert_eq!(
            c.retrieve(&retrieve_request()).unwrap(),
            ClientOutcome::NothingAvailable
        );
    }

    #[test]
    fn test_provider_identity_derivation() {
        let c = client(Vec::new(), BTreeMap::new(), BTreeSet::new(), None);
        let identity = c.provider_identity("com.example.app").unwrap();
        assert!(identity.is_app_identity());
        assert_eq!(identity.application_id().unwrap(), "com.example.app");
        assert!(c.provider_identity("com.example.absent").is_none());
    }
}
