use thiserror::Error;

use crate::auth::StoreError;
use crate::router::Navigation;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the credential. The session token has already been
    /// cleared; `redirect` is where the caller must send the user.
    #[error("Unauthorized - session cleared: {detail}")]
    Unauthorized { detail: String, redirect: Navigation },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No authentication token found")]
    MissingToken,

    #[error("Stored token cannot be sent as a header value")]
    InvalidToken,

    #[error("No access token in response")]
    MissingAccessToken,

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Map a non-success status to an error. 401 carries a hard redirect to
    /// `sign_in_path`.
    pub fn from_status(status: reqwest::StatusCode, body: &str, sign_in_path: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized {
                detail: truncated,
                redirect: Navigation::hard(sign_in_path),
            },
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Navigation the caller must apply to recover, if any
    pub fn redirect(&self) -> Option<&Navigation> {
        match self {
            ApiError::Unauthorized { redirect, .. } => Some(redirect),
            _ => None,
        }
    }
}
