//! Client-side routing with an access guard.
//!
//! This module provides:
//! - `RouteTable`: the static path → view table and the public allow-list
//! - `AccessGuard`: the before-each-navigation check against the session store
//! - `Router`: applies navigation requests and `Navigation` intents
//!
//! Any route not on the public allow-list is protected.

pub mod guard;
pub mod navigation;
pub mod routes;
pub mod state;

pub use guard::{AccessGuard, GuardOutcome};
pub use navigation::{Navigation, NavigationKind};
pub use routes::{Route, RouteTable};
pub use state::{Location, Router};

/// The designated public entry point
pub const DEFAULT_SIGN_IN_PATH: &str = "/signin";

/// Paths reachable without a session token
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/signin", "/register", "/", "/about"];

/// Strip query string and fragment, leaving the path the guard classifies
pub fn path_only(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}
