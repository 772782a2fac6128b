//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL and endpoint paths, the storage key and backend for the session
//! token, and the route access settings.
//!
//! Configuration is stored at `~/.config/tenderdesk/config.json`. Missing
//! fields fall back to their defaults, and a few values can be overridden
//! from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileStore, KeyringStore, MemoryStore, SharedStore, DEFAULT_STORAGE_KEY};
use crate::router::{DEFAULT_PUBLIC_PATHS, DEFAULT_SIGN_IN_PATH};

/// Application name used for config/cache directory paths and the keychain service
pub const APP_NAME: &str = "tenderdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "TENDERDESK_API_URL";
pub const ENV_STORE: &str = "TENDERDESK_STORE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub current_user: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/auth/login".to_string(),
            register: "/auth/auth/register".to_string(),
            current_user: "/auth/users/me".to_string(),
        }
    }
}

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "keyring" | "keychain" => Ok(StoreBackend::Keyring),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub endpoints: Endpoints,
    pub storage_key: String,
    pub store: StoreBackend,
    pub sign_in_path: String,
    pub public_paths: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            store: StoreBackend::default(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(store) = lookup(ENV_STORE).filter(|v| !v.trim().is_empty()) {
            self.store = store.parse()?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Build the session store selected by `store`
    pub fn open_store(&self) -> Result<SharedStore> {
        let store: SharedStore = match self.store {
            StoreBackend::File => Arc::new(FileStore::new(self.cache_dir()?, &self.storage_key)),
            StoreBackend::Keyring => Arc::new(KeyringStore::new(APP_NAME, &self.storage_key)),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        debug!(backend = ?self.store, "Session store opened");
        Ok(store)
    }
}
