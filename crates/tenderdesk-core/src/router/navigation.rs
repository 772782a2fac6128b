use std::fmt;

use serde::{Deserialize, Serialize};

/// How a navigation intent should be carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// Client-side transition, in-memory state survives
    Soft,
    /// Full reload, in-memory state is discarded
    Hard,
}

/// A navigation the caller (or router) must apply.
///
/// The network layer and the auth operations return these instead of
/// navigating on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub path: String,
    pub kind: NavigationKind,
}

impl Navigation {
    pub fn soft(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NavigationKind::Soft,
        }
    }

    pub fn hard(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NavigationKind::Hard,
        }
    }

    pub fn is_hard(&self) -> bool {
        self.kind == NavigationKind::Hard
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NavigationKind::Soft => write!(f, "{}", self.path),
            NavigationKind::Hard => write!(f, "{} (reload)", self.path),
        }
    }
}
