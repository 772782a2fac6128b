//! The session store abstraction.
//!
//! Exactly one bearer token lives in a store at a time. Every store is shared
//! behind an `Arc` between the request pipeline and the access guard, so
//! implementations use interior mutability and the last writer wins.

use std::sync::Arc;

use super::StoreError;

/// Default key the token is stored under
pub const DEFAULT_STORAGE_KEY: &str = "token";

pub trait SessionStore: Send + Sync {
    /// Persist the token, replacing any previous one
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Current token, if any
    fn read(&self) -> Option<String>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;

    /// Stored token, with an empty value counted as absent
    fn token(&self) -> Option<String> {
        self.read().filter(|t| !t.is_empty())
    }

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Shared handle used by the client, auth service and guard
pub type SharedStore = Arc<dyn SessionStore>;
