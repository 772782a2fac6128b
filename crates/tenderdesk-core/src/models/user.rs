use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Body returned by login and register.
///
/// Unknown fields are kept in `extra` so callers get the body back intact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

/// Identity returned by the current-user endpoint. Older servers answer with
/// the bare token subject (the e-mail) instead of a profile object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum CurrentUser {
    Profile(UserProfile),
    Subject(String),
}

impl CurrentUser {
    /// Best human-readable label for the user
    pub fn display_name(&self) -> &str {
        match self {
            CurrentUser::Subject(subject) => subject,
            CurrentUser::Profile(profile) => profile
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .or(profile.email.as_deref())
                .unwrap_or("unknown user"),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            CurrentUser::Subject(subject) => Some(subject),
            CurrentUser::Profile(profile) => profile.email.as_deref(),
        }
    }
}
