//! Session token storage and the auth operations built on it.
//!
//! This module provides:
//! - `SessionStore`: the save/read/clear contract for the single bearer token
//! - `MemoryStore`, `FileStore`, `KeyringStore`: storage backends
//! - `AuthService`: login, register, current-user and logout
//!
//! A store is injected into the API client and the access guard as a
//! `SharedStore`; nothing reads the token from ambient global state.

pub mod error;
pub mod file;
pub mod keychain;
pub mod memory;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;
pub use service::AuthService;
pub use store::{SessionStore, SharedStore, DEFAULT_STORAGE_KEY};
