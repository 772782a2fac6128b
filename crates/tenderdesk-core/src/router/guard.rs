use tracing::debug;

use super::{Navigation, RouteTable};
use crate::auth::SharedStore;

/// Result of checking one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed,
    Redirected(Navigation),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }
}

/// Runs before every navigation: protected targets need a stored token.
///
/// Only presence is checked. Whether the server still accepts the token is
/// found out on the next API call.
#[derive(Clone)]
pub struct AccessGuard {
    table: RouteTable,
    store: SharedStore,
}

impl AccessGuard {
    pub fn new(table: RouteTable, store: SharedStore) -> Self {
        Self { table, store }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn check(&self, target: &str) -> GuardOutcome {
        if !self.table.is_public(target) && !self.store.has_token() {
            debug!(path = target, "Protected route without session, redirecting");
            return GuardOutcome::Redirected(Navigation::soft(self.table.sign_in_path()));
        }
        GuardOutcome::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::{MemoryStore, SessionStore};

    fn guard(store: Arc<MemoryStore>) -> AccessGuard {
        AccessGuard::new(RouteTable::default(), store)
    }

    #[test]
    fn test_public_without_token_allowed() {
        let guard = guard(Arc::new(MemoryStore::new()));
        assert_eq!(guard.check("/about"), GuardOutcome::Allowed);
        assert_eq!(guard.check("/signin"), GuardOutcome::Allowed);
        assert_eq!(guard.check("/"), GuardOutcome::Allowed);
    }

    #[test]
    fn test_protected_without_token_redirects() {
        let guard = guard(Arc::new(MemoryStore::new()));
        assert_eq!(
            guard.check("/excel-page"),
            GuardOutcome::Redirected(Navigation::soft("/signin"))
        );
        assert!(!guard.check("/search-tender?q=x").is_allowed());
        // Unknown paths are protected too
        assert!(!guard.check("/nowhere").is_allowed());
    }

    #[test]
    fn test_protected_with_token_allowed() {
        let guard = guard(Arc::new(MemoryStore::with_token("xyz")));
        assert_eq!(guard.check("/excel-page"), GuardOutcome::Allowed);
    }

    #[test]
    fn test_sees_store_changes() {
        let store = Arc::new(MemoryStore::new());
        let guard = guard(store.clone());
        assert!(!guard.check("/xpath").is_allowed());

        store.save("xyz").unwrap();
        assert!(guard.check("/xpath").is_allowed());

        store.clear().unwrap();
        assert!(!guard.check("/xpath").is_allowed());
    }

    #[test]
    fn test_empty_token_redirects() {
        let guard = guard(Arc::new(MemoryStore::with_token("")));
        assert!(!guard.check("/excel-page").is_allowed());
    }
}
