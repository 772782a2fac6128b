//! API client for the tender back end.
//!
//! `ApiClient` is the authenticated request pipeline. Outgoing requests get
//! the current bearer token from the session store; incoming responses are
//! checked, and a 401 clears the token and surfaces a sign-in redirect.

use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::auth::SharedStore;
use crate::config::Config;

use super::ApiError;

/// API client bound to one base URL and one session store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    sign_in_path: String,
    store: SharedStore,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &Config, store: SharedStore) -> Result<Self, ApiError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sign_in_path: config.sign_in_path.clone(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Headers for the next request. Read per call so a token saved or
    /// cleared in between is picked up.
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.store.token() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// A 401 also clears the session token.
    async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            debug!(status = %status, url = %response.url(), "Response");
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body, &self.sign_in_path);

        if err.is_unauthorized() {
            if let Err(e) = self.store.clear() {
                error!(error = %e, "Failed to clear session token after 401");
            }
            warn!(url = %url, "Authentication rejected, session cleared");
        } else {
            error!(status = %status, url = %url, error = %err, "Request failed");
        }
        Err(err)
    }

    /// Run a request through the pipeline: attach credentials, send, inspect
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let response = request
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| {
                error!(url = url, error = %e, "Request could not be sent");
                ApiError::from(e)
            })?;
        self.check_response(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!(url = url, error = %e, "Failed to parse JSON response");
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.execute(self.client.get(&url), &url).await?;
        Self::parse_json(response, &url).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.execute(self.client.post(&url).json(body), &url).await?;
        Self::parse_json(response, &url).await
    }
}
