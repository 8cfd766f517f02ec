// src/resolver/known.rs
//! Optional process-wide recognized-provider set.
//!
//! Dependency injection is the primary path: construct a
//! [`PreferenceResolver`](crate::resolver::preference::PreferenceResolver)
//! and pass it where needed. Some embedders genuinely need one shared
//! instance across the process; this module provides it behind an
//! initialize-once cell so that concurrent first installation from
//! multiple threads converges on a single winning instance instead of
//! racing to produce divergent singletons.

use crate::models::domain::AuthenticationDomain;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;

static RECOGNIZED_PROVIDERS: OnceCell<BTreeSet<AuthenticationDomain>> = OnceCell::new();

/// Installs the process-wide recognized-provider set.
///
/// # Returns
/// `Ok(())` if this call won the initialization; `Err` with the
/// previously installed set if another caller got there first. The set is
/// immutable once installed.
pub fn install(
    providers: BTreeSet<AuthenticationDomain>,
) -> std::result::Result<(), &'static BTreeSet<AuthenticationDomain>> {
    match RECOGNIZED_PROVIDERS.try_insert(providers) {
        Ok(_) => Ok(()),
        Err((existing, _)) => Err(existing),
    }
}

/// The installed recognized-provider set, or `None` before installation.
pub fn get() -> Option<&'static BTreeSet<AuthenticationDomain>> {
    RECOGNIZED_PROVIDERS.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test because the cell is process-wide state:
    // the first install wins and later installs observe the winner.
    #[test]
    fn test_first_install_wins() {
        let winner: BTreeSet<AuthenticationDomain> =
            [AuthenticationDomain::from_app_identity("com.example.first", b"c1").unwrap()]
                .into_iter()
                .collect();
        let loser: BTreeSet<AuthenticationDomain> =
            [AuthenticationDomain::from_app_identity("com.example.second", b"c2").unwrap()]
                .into_iter()
                .collect();

        assert!(install(winner.clone()).is_ok());
        match install(loser) {
            Err(existing) => assert_eq!(existing, &winner),
            Ok(()) => panic!("second install must not win"),
        }
        assert_eq!(get(), Some(&winner));
    }
}
