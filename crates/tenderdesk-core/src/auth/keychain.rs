use keyring::Entry;
use tracing::debug;

use super::{SessionStore, StoreError};

/// Token kept in the OS keychain under `(service, key)`.
pub struct KeyringStore {
    service: String,
    key: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, &self.key)?)
    }
}

impl SessionStore for KeyringStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(token)?;
        debug!(service = %self.service, "Token stored in keychain");
        Ok(())
    }

    fn read(&self) -> Option<String> {
        match self.entry().map(|entry| entry.get_password()) {
            Ok(Ok(token)) => Some(token),
            Ok(Err(keyring::Error::NoEntry)) => None,
            Ok(Err(e)) => {
                debug!(error = %e, "Keychain lookup failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "Failed to open keychain entry");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
