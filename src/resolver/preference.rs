// src/resolver/preference.rs
//! Deterministic provider-preference resolution.
//!
//! Given the candidate providers capable of handling an action, the
//! resolver picks at most one as the implicit choice. The rules are
//! deterministic, involve no randomness or I/O, and err on the side of
//! explicit user disambiguation:
//!
//! 1. An unrecognized candidate anywhere in the set suppresses any
//!    implicit preference - an unknown application must never be silently
//!    auto-selected.
//! 2. Zero recognized candidates: no preference.
//! 3. Exactly one recognized candidate: it is preferred.
//! 4. Exactly two recognized candidates, one of which is the configured
//!    well-known default: the *other* one is preferred. The default is
//!    commonly pre-installed; a second provider was deliberately chosen
//!    by the user and is presumed to reflect intent.
//! 5. Anything else: no preference.
//!
//! The well-known default of rule 4 is a policy choice, not a structural
//! requirement, and is therefore configurable; constructing the resolver
//! without one disables the rule.

use crate::models::domain::AuthenticationDomain;
use std::collections::BTreeSet;

/// Resolves which provider, if any, may be invoked without asking the
/// user to disambiguate.
#[derive(Debug, Clone)]
pub struct PreferenceResolver {
    /// Application identities recognized as trustworthy providers
    recognized: BTreeSet<AuthenticationDomain>,
    /// The well-known default provider for the two-candidate rule
    well_known_default: Option<AuthenticationDomain>,
}

impl PreferenceResolver {
    /// Creates a resolver over a recognized-provider set.
    ///
    /// # Arguments
    /// * `recognized` - the externally supplied set of known provider
    ///   identities
    /// * `well_known_default` - the single designated default provider
    ///   that the two-candidate rule treats as pre-installed, or `None`
    ///   to disable that rule
    pub fn new(
        recognized: BTreeSet<AuthenticationDomain>,
        well_known_default: Option<AuthenticationDomain>,
    ) -> Self {
        PreferenceResolver {
            recognized,
            well_known_default,
        }
    }

    /// Whether a provider identity is in the recognized set.
    pub fn is_recognized(&self, provider: &AuthenticationDomain) -> bool {
        self.recognized.contains(provider)
    }

    /// Picks the implicitly preferred provider among the candidates, or
    /// `None` if explicit user disambiguation is required.
    pub fn resolve<'a, I>(&self, candidates: I) -> Option<&'a AuthenticationDomain>
    where
        I: IntoIterator<Item = &'a AuthenticationDomain>,
    {
        let mut recognized: Vec<&AuthenticationDomain> = Vec::new();
        for candidate in candidates {
            if !self.is_recognized(candidate) {
                // An unrecognized competitor forces explicit user choice.
                return None;
            }
            recognized.push(candidate);
        }

        match recognized.as_slice() {
            [] => None,
            [only] => Some(only),
            [first, second] => {
                let default = self.well_known_default.as_ref()?;
                if *first == default {
                    Some(second)
                } else if *second == default {
                    Some(first)
                } else {
                    None
                }
            }
            _ => None,
        }
        .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str) -> AuthenticationDomain {
        AuthenticationDomain::from_app_identity(id, id.as_bytes()).unwrap()
    }

    fn resolver(
        recognized: &[&AuthenticationDomain],
        default: Option<&AuthenticationDomain>,
    ) -> PreferenceResolver {
        PreferenceResolver::new(
            recognized.iter().map(|&d| d.clone()).collect(),
            default.cloned(),
        )
    }

    #[test]
    fn test_unknown_candidate_suppresses_preference() {
        let known = app("com.example.known");
        let unknown = app("com.example.unknown");
        let r = resolver(&[&known], None);
        assert_eq!(r.resolve([&unknown]), None);
        // Even alongside a recognized candidate.
        assert_eq!(r.resolve([&known, &unknown]), None);
    }

    #[test]
    fn test_empty_candidate_set_has_no_preference() {
        let known = app("com.example.known");
        let r = resolver(&[&known], None);
        assert_eq!(r.resolve([]), None);
    }

    #[test]
    fn test_single_recognized_candidate_is_preferred() {
        let known = app("com.example.known");
        let r = resolver(&[&known], None);
        assert_eq!(r.resolve([&known]), Some(&known));
    }

    #[test]
    fn test_two_candidates_with_default_prefers_the_other() {
        let default = app("com.example.default");
        let chosen = app("com.example.chosen");
        let r = resolver(&[&default, &chosen], Some(&default));
        assert_eq!(r.resolve([&default, &chosen]), Some(&chosen));
        // Order of candidates does not matter.
        assert_eq!(r.resolve([&chosen, &default]), Some(&chosen));
    }

    #[test]
    fn test_two_candidates_without_default_have_no_preference() {
        let a = app("com.example.a");
        let b = app("com.example.b");
        let default = app("com.example.default");
        // Default configured but not among the candidates.
        let r = resolver(&[&a, &b, &default], Some(&default));
        assert_eq!(r.resolve([&a, &b]), None);
        // No default configured at all: rule disabled.
        let r = resolver(&[&a, &b], None);
        assert_eq!(r.resolve([&a, &b]), None);
    }

    #[test]
    fn test_three_recognized_candidates_have_no_preference() {
        let a = app("com.example.a");
        let b = app("com.example.b");
        let c = app("com.example.c");
        let r = resolver(&[&a, &b, &c], Some(&a));
        assert_eq!(r.resolve([&a, &b, &c]), None);
    }
}
