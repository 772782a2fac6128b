use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{path_only, DEFAULT_PUBLIC_PATHS, DEFAULT_SIGN_IN_PATH};
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub name: String,
    /// View rendered for this route
    pub view: String,
}

impl Route {
    pub fn new(path: &str, name: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            view: view.to_string(),
        }
    }
}

/// Static route table plus the public allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
    public: BTreeSet<String>,
    sign_in_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        let routes = vec![
            Route::new("/", "home", "HomeView"),
            Route::new("/about", "about", "AboutView"),
            Route::new("/register", "register", "RegisterView"),
            Route::new("/xpath", "Xpath", "XPathView"),
            Route::new("/signin", "SignIn", "SignInView"),
            Route::new("/excel-page", "ExcelUpload", "PrivateView"),
            Route::new("/search-tender", "Prozorro", "ProzorroView"),
        ];
        Self::new(routes, DEFAULT_PUBLIC_PATHS.iter().copied(), DEFAULT_SIGN_IN_PATH)
    }
}

impl RouteTable {
    pub fn new<I, S>(routes: Vec<Route>, public: I, sign_in_path: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut public: BTreeSet<String> = public.into_iter().map(Into::into).collect();
        // Redirect target must never itself redirect
        public.insert(sign_in_path.to_string());
        Self {
            routes,
            public,
            sign_in_path: sign_in_path.to_string(),
        }
    }

    /// Default routes with the allow-list and sign-in path taken from config
    pub fn from_config(config: &Config) -> Self {
        let routes = Self::default().routes;
        Self::new(routes, config.public_paths.iter().cloned(), &config.sign_in_path)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    /// Exact match on the path, ignoring query and fragment
    pub fn resolve(&self, target: &str) -> Option<&Route> {
        let path = path_only(target);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn is_public(&self, target: &str) -> bool {
        self.public.contains(path_only(target))
    }
}
