//! Application wiring for the command-line front end.
//!
//! `App` owns one session store and hands it to both the auth service and the
//! router, mirroring how the web front end shares browser storage between its
//! request interceptor and its navigation guard.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tenderdesk_core::models::NewAccount;
use tenderdesk_core::{
    AccessGuard, ApiClient, ApiError, AuthService, Config, Location, Navigation, RouteTable, Router,
    SharedStore,
};
use tracing::{debug, warn};

/// Environment variables consulted before prompting
pub const ENV_EMAIL: &str = "TENDERDESK_EMAIL";
pub const ENV_PASSWORD: &str = "TENDERDESK_PASSWORD";

pub struct App {
    pub config: Config,
    store: SharedStore,
    auth: AuthService,
    router: Router,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = config.open_store()?;
        let api = ApiClient::new(&config, store.clone()).context("Failed to build HTTP client")?;
        let auth = AuthService::new(api, config.endpoints.clone());
        let router = Router::new(AccessGuard::new(RouteTable::from_config(&config), store.clone()));
        debug!(base_url = %config.base_url, "App initialized");

        Ok(Self {
            config,
            store,
            auth,
            router,
        })
    }

    pub fn has_token(&self) -> bool {
        self.store.has_token()
    }

    pub fn route_table(&self) -> &RouteTable {
        self.router.guard().table()
    }

    pub fn open(&mut self, target: &str) -> &Location {
        self.router.push(target)
    }

    /// Apply an intent returned by the library and report where we landed
    fn follow(&mut self, navigation: &Navigation) -> &Location {
        self.router.apply(navigation)
    }

    /// Turn an API error into a message, following any recovery redirect
    fn report_error(&mut self, err: ApiError) -> anyhow::Error {
        if let Some(redirect) = err.redirect().cloned() {
            let landed = self.follow(&redirect).path.clone();
            warn!(path = %landed, "Session rejected by server");
            return anyhow::anyhow!("{} (redirected to {})", err, landed);
        }
        err.into()
    }

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email.or_else(|| std::env::var(ENV_EMAIL).ok()) {
            Some(email) => email,
            None => prompt_line("Email: ")?,
        };
        let password = password_from_env_or_prompt()?;

        match self.auth.login(&email, &password).await {
            Ok(response) => {
                println!(
                    "Signed in as {} ({} token saved)",
                    email,
                    response.token_type.as_deref().unwrap_or("bearer")
                );
                Ok(())
            }
            Err(e) => Err(self.report_error(e)),
        }
    }

    pub async fn register(&mut self, email: String, name: String) -> Result<()> {
        let password = password_from_env_or_prompt()?;
        let profile = NewAccount { email, name, password };

        match self.auth.register(&profile).await {
            Ok(response) if response.access_token.is_some() => {
                println!("Registered and signed in as {}", profile.email);
                Ok(())
            }
            Ok(_) => {
                println!("Registered {}; sign in to continue", profile.email);
                Ok(())
            }
            Err(e) => Err(self.report_error(e)),
        }
    }

    pub async fn whoami(&mut self) -> Result<()> {
        match self.auth.current_user().await {
            Ok(user) => {
                println!("{}", user.display_name());
                if let Some(email) = user.email().filter(|e| *e != user.display_name()) {
                    println!("  {}", email);
                }
                Ok(())
            }
            Err(e) => Err(self.report_error(e)),
        }
    }

    pub fn logout(&mut self) -> Result<()> {
        let navigation = self.auth.logout()?;
        let landed = self.follow(&navigation).path.clone();
        println!("Signed out, now at {}", landed);
        Ok(())
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn password_from_env_or_prompt() -> Result<String> {
    if let Ok(password) = std::env::var(ENV_PASSWORD) {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenderdesk_core::{SessionStore, StoreBackend};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> App {
        let config = Config {
            base_url: server.uri(),
            store: StoreBackend::Memory,
            ..Config::default()
        };
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_whoami_unauthorized_lands_on_signin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/users/me"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.store.save("stale").unwrap();
        app.open("/excel-page");
        assert_eq!(app.router.current().map(|l| l.path.as_str()), Some("/excel-page"));

        let err = app.whoami().await.unwrap_err();
        assert!(err.to_string().contains("redirected to /signin"));
        assert!(!app.has_token());
        assert_eq!(app.router.current().map(|l| l.path.as_str()), Some("/signin"));
        assert_eq!(app.router.history().len(), 1);
        assert_eq!(app.router.reloads(), 1);
    }

    #[tokio::test]
    async fn test_whoami_signed_out_does_not_redirect() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        let err = app.whoami().await.unwrap_err();
        assert!(err.to_string().contains("No authentication token found"));
        assert!(app.router.current().is_none());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_history_and_lands_on_signin() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        app.store.save("xyz").unwrap();
        app.open("/");
        app.open("/xpath");
        assert_eq!(app.router.history().len(), 2);

        app.logout().unwrap();
        assert!(!app.has_token());
        assert_eq!(app.router.history().len(), 1);
        assert_eq!(app.router.current().map(|l| l.path.as_str()), Some("/signin"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_open_protected_without_session() {
        let config = Config {
            store: StoreBackend::Memory,
            ..Config::default()
        };
        let mut app = App::new(config).unwrap();
        let location = app.open("/search-tender");
        assert_eq!(location.path, "/signin");
        assert_eq!(location.redirected_from.as_deref(), Some("/search-tender"));
    }
}
