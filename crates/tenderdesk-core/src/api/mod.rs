//! REST API client module for the tender back end.
//!
//! This module provides the `ApiClient`, the authenticated request pipeline:
//! every request picks up the current bearer token from the session store,
//! and a 401 response clears that token and yields a sign-in redirect.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
