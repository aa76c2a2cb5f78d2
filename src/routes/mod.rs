// src/routes/mod.rs
// Views, the route table, and the route guard

pub mod guard;
pub mod table;

pub use guard::{Access, Decision, guard, guard_path};
pub use table::{ROUTES, RouteEntry, menu_for};

use std::fmt;

/// Views that are reachable without a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Unauthorized,
    NotFound,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Unauthorized => "/unauthorized",
            View::NotFound => "/not-found",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim().trim_end_matches('/') {
            "/login" => Some(View::Login),
            "/unauthorized" => Some(View::Unauthorized),
            "/not-found" => Some(View::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
