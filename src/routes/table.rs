// src/routes/table.rs
// The one table of views and the roles allowed to reach them

use super::guard::Access;
use crate::auth::Role;

const ALL_ROLES: &[Role] = &[Role::Teacher, Role::Parent, Role::Student];
const TEACHER_STUDENT: &[Role] = &[Role::Teacher, Role::Student];

/// A protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub access: Access<'static>,
    /// Shown in the navigation menu
    pub in_menu: bool,
}

impl RouteEntry {
    pub fn allows(&self, role: Role) -> bool {
        self.access.allows(role)
    }
}

/// Every protected view. Menu rendering and the guard both read this.
pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        id: "dashboard",
        label: "Dashboard",
        path: "/dashboard",
        access: Access::AnyOf(ALL_ROLES),
        in_menu: true,
    },
    RouteEntry {
        id: "students",
        label: "Student Management",
        path: "/students",
        access: Access::AnyOf(TEACHER_STUDENT),
        in_menu: true,
    },
    RouteEntry {
        id: "input-scores",
        label: "Score Input",
        path: "/input-scores",
        access: Access::Role(Role::Teacher),
        in_menu: true,
    },
    RouteEntry {
        id: "performance",
        label: "Performance",
        path: "/performance",
        access: Access::Role(Role::Teacher),
        in_menu: true,
    },
    RouteEntry {
        id: "notifications",
        label: "Notifications",
        path: "/notifications",
        access: Access::AnyOf(ALL_ROLES),
        in_menu: true,
    },
    RouteEntry {
        id: "profile",
        label: "Profile",
        path: "/profile",
        access: Access::Authenticated,
        in_menu: false,
    },
    RouteEntry {
        id: "profile-edit",
        label: "Edit Profile",
        path: "/profile/edit",
        access: Access::Authenticated,
        in_menu: false,
    },
    RouteEntry {
        id: "change-password",
        label: "Change Password",
        path: "/profile/change-password",
        access: Access::Authenticated,
        in_menu: false,
    },
];

/// Look a view up by path; a trailing slash is ignored
pub fn find(path: &str) -> Option<&'static RouteEntry> {
    let trimmed = path.trim();
    let normalized = if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    };
    ROUTES.iter().find(|route| route.path == normalized)
}

pub fn find_by_id(id: &str) -> Option<&'static RouteEntry> {
    ROUTES.iter().find(|route| route.id == id)
}

/// Menu entries a role can see, in table order
pub fn menu_for(role: Role) -> Vec<&'static RouteEntry> {
    ROUTES
        .iter()
        .filter(|route| route.in_menu && route.allows(role))
        .collect()
}
