//! tenderdesk-core - session token lifecycle and route access control for
//! the tender-search front end.
//!
//! The pieces fit together like this:
//! - a `SessionStore` holds the single bearer token
//! - `ApiClient` attaches it to every request and clears it on a 401,
//!   handing back a `Navigation` to sign-in
//! - `AuthService` performs login, register, current-user and logout
//! - `AccessGuard` and `Router` keep signed-out users off protected routes

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthService, FileStore, KeyringStore, MemoryStore, SessionStore, SharedStore, StoreError,
};
pub use config::{Config, Endpoints, StoreBackend};
pub use router::{
    AccessGuard, GuardOutcome, Location, Navigation, NavigationKind, Route, RouteTable, Router,
};
