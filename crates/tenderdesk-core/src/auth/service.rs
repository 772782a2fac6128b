//! Login, registration, current-user lookup and logout.

use tracing::{debug, error, info};

use crate::api::{ApiClient, ApiError};
use crate::config::Endpoints;
use crate::models::{Credentials, CurrentUser, NewAccount, TokenResponse};
use crate::router::Navigation;

use super::SharedStore;

/// Auth operations over an `ApiClient` and its session store.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    endpoints: Endpoints,
}

impl AuthService {
    pub fn new(api: ApiClient, endpoints: Endpoints) -> Self {
        Self { api, endpoints }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn store(&self) -> &SharedStore {
        self.api.store()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().has_token()
    }

    /// Sign in and persist the returned access token.
    ///
    /// Fails with `MissingAccessToken` (and stores nothing) if the server
    /// answers without a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        debug!(email = email, "Sending login request");
        let body = Credentials::new(email, password);

        let response: TokenResponse = self
            .api
            .post(&self.endpoints.login, &body)
            .await
            .inspect_err(|e| error!(error = %e, "Login failed"))?;

        let token = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                error!("Login response carried no access token");
                ApiError::MissingAccessToken
            })?;
        self.store().save(token)?;

        info!(email = email, "Login successful");
        Ok(response)
    }

    /// Create an account. A token in the response is saved; one is not required.
    pub async fn register(&self, profile: &NewAccount) -> Result<TokenResponse, ApiError> {
        debug!(email = %profile.email, name = %profile.name, "Sending register request");

        let response: TokenResponse = self
            .api
            .post(&self.endpoints.register, profile)
            .await
            .inspect_err(|e| error!(error = %e, "Registration failed"))?;

        match response.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.store().save(token)?;
                info!(email = %profile.email, "Registered and signed in");
            }
            None => info!(email = %profile.email, "Registered without a session token"),
        }
        Ok(response)
    }

    /// Fetch the identity behind the stored token.
    ///
    /// Returns `MissingToken` without touching the network when signed out.
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        if !self.store().has_token() {
            return Err(ApiError::MissingToken);
        }

        let user: CurrentUser = self
            .api
            .get(&self.endpoints.current_user)
            .await
            .inspect_err(|e| error!(error = %e, "Get current user failed"))?;

        debug!(user = user.display_name(), "Current user fetched");
        Ok(user)
    }

    /// Drop the local session. No server call is made; the returned intent
    /// sends the user to sign-in with a full reload.
    pub fn logout(&self) -> Result<Navigation, ApiError> {
        self.store().clear()?;
        info!("Logged out");
        Ok(Navigation::hard(self.api.sign_in_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::{MemoryStore, SessionStore};
    use crate::config::Config;

    fn service_for(server: &MockServer, store: Arc<MemoryStore>) -> AuthService {
        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        let api = ApiClient::new(&config, store).unwrap();
        AuthService::new(api, config.endpoints)
    }

    #[tokio::test]
    async fn test_login_saves_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/login"))
            .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "xyz", "token_type": "bearer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());

        let response = auth.login("a@b.com", "pw").await.unwrap();
        assert_eq!(response.access_token.as_deref(), Some("xyz"));
        assert_eq!(store.read().as_deref(), Some("xyz"));
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_empty_token_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());

        let err = auth.login("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingAccessToken));
        assert_eq!(store.read(), None);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_empty_token_not_saved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/register"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"access_token": ""})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());
        let profile = NewAccount {
            email: "n@b.com".to_string(),
            name: "New".to_string(),
            password: "pw".to_string(),
        };

        auth.register(&profile).await.unwrap();
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_current_user_empty_token_fails_locally() {
        let server = MockServer::start().await;
        let auth = service_for(&server, Arc::new(MemoryStore::with_token("")));

        let err = auth.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_without_token_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());

        let err = auth.login("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingAccessToken));
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_login_bad_credentials_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token("old"));
        let auth = service_for(&server, store.clone());

        let err = auth.login("a@b.com", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_register_saves_optional_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/register"))
            .and(body_json(json!({"email": "n@b.com", "name": "New", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"access_token": "fresh", "token_type": "bearer"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());
        let profile = NewAccount {
            email: "n@b.com".to_string(),
            name: "New".to_string(),
            password: "pw".to_string(),
        };

        auth.register(&profile).await.unwrap();
        assert_eq!(store.read().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_register_without_token_keeps_store_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let auth = service_for(&server, store.clone());
        let profile = NewAccount {
            email: "n@b.com".to_string(),
            name: "New".to_string(),
            password: "pw".to_string(),
        };

        let response = auth.register(&profile).await.unwrap();
        assert_eq!(response.extra.get("id"), Some(&json!(12)));
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_register_conflict_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/auth/register"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": "Email already registered"})),
            )
            .mount(&server)
            .await;

        let auth = service_for(&server, Arc::new(MemoryStore::new()));
        let profile = NewAccount {
            email: "n@b.com".to_string(),
            name: "New".to_string(),
            password: "pw".to_string(),
        };

        let err = auth.register(&profile).await.unwrap_err();
        assert!(err.to_string().contains("Email already registered"));
    }

    #[tokio::test]
    async fn test_current_user_requires_token() {
        let server = MockServer::start().await;
        let auth = service_for(&server, Arc::new(MemoryStore::new()));

        let err = auth.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_current_user_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/users/me"))
            .and(header("authorization", "Bearer xyz"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 3, "name": "Olena", "email": "o@b.com"})),
            )
            .mount(&server)
            .await;

        let auth = service_for(&server, Arc::new(MemoryStore::with_token("xyz")));
        let user = auth.current_user().await.unwrap();
        assert_eq!(user.display_name(), "Olena");
    }

    #[tokio::test]
    async fn test_current_user_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_token("expired"));
        let auth = service_for(&server, store.clone());

        let err = auth.current_user().await.unwrap_err();
        assert_eq!(err.redirect(), Some(&Navigation::hard("/signin")));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_without_request() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::with_token("xyz"));
        let auth = service_for(&server, store.clone());

        let nav = auth.logout().unwrap();
        assert_eq!(nav, Navigation::hard("/signin"));
        assert_eq!(store.read(), None);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
