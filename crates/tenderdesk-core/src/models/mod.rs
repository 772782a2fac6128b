//! Request and response payloads for the authentication endpoints.

pub mod user;

pub use user::{Credentials, CurrentUser, NewAccount, TokenResponse, UserProfile};
