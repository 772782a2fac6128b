use tracing::{debug, info};

use super::{AccessGuard, GuardOutcome, Navigation, NavigationKind, Route};

/// Where the router ended up after a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Effective target, after any guard redirect
    pub path: String,
    /// Matched route, `None` when the path is not in the table
    pub route: Option<Route>,
    /// Originally requested target when the guard redirected
    pub redirected_from: Option<String>,
}

/// Applies navigations through the access guard and keeps history.
pub struct Router {
    guard: AccessGuard,
    history: Vec<Location>,
    reloads: u32,
}

impl Router {
    pub fn new(guard: AccessGuard) -> Self {
        Self {
            guard,
            history: Vec::new(),
            reloads: 0,
        }
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn current(&self) -> Option<&Location> {
        self.history.last()
    }

    pub fn history(&self) -> &[Location] {
        &self.history
    }

    /// Number of hard navigations applied so far
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    /// Client-side navigation to `target`
    pub fn push(&mut self, target: &str) -> &Location {
        self.apply(&Navigation::soft(target))
    }

    /// Apply an intent. A hard navigation discards history first.
    pub fn apply(&mut self, navigation: &Navigation) -> &Location {
        if navigation.kind == NavigationKind::Hard {
            info!(path = %navigation.path, "Hard navigation, discarding router state");
            self.history.clear();
            self.reloads += 1;
        }

        let requested = navigation.path.as_str();
        let (path, redirected_from) = match self.guard.check(requested) {
            GuardOutcome::Allowed => (requested.to_string(), None),
            GuardOutcome::Redirected(to) => (to.path, Some(requested.to_string())),
        };

        let route = self.guard.table().resolve(&path).cloned();
        debug!(path = %path, route = ?route.as_ref().map(|r| &r.name), "Navigated");

        let location = Location {
            path,
            route,
            redirected_from,
        };
        self.history.push(location);
        &self.history[self.history.len() - 1]
    }
}
