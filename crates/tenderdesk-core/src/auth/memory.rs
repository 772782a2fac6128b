use std::sync::RwLock;

use super::{SessionStore, StoreError};

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        let mut slot = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_read() {
        let store = MemoryStore::new();
        assert_eq!(store.read(), None);

        store.save("abc").unwrap();
        assert_eq!(store.read().as_deref(), Some("abc"));
        // Still there on a second read
        assert_eq!(store.read().as_deref(), Some("abc"));
    }

    #[test]
    fn test_last_writer_wins() {
        let store = MemoryStore::with_token("first");
        store.save("second").unwrap();
        assert_eq!(store.read().as_deref(), Some("second"));
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::with_token("abc");
        assert!(store.has_token());

        store.clear().unwrap();
        assert_eq!(store.read(), None);
        assert!(!store.has_token());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let store = MemoryStore::with_token("");
        assert_eq!(store.read().as_deref(), Some(""));
        assert_eq!(store.token(), None);
        assert!(!store.has_token());
    }
}
