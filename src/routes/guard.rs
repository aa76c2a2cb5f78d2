// src/routes/guard.rs
// Pure access decision for a navigation target

use super::View;
use super::table;
use crate::auth::{Role, SessionState};

/// What a view requires of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// Any logged-in user
    Authenticated,
    /// Exactly this role
    Role(Role),
    /// Any of these roles; an empty set means any logged-in user
    AnyOf(&'a [Role]),
}

impl Access<'_> {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Access::Authenticated => true,
            Access::Role(required) => *required == role,
            Access::AnyOf(roles) => roles.is_empty() || roles.contains(&role),
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Session not resolved yet; show a neutral loading state
    Loading,
    Redirect(View),
    Render,
}

/// Decide whether `access` is satisfied by `state`
pub fn guard(state: &SessionState, access: Access<'_>) -> Decision {
    match state {
        SessionState::Uninitialized => Decision::Loading,
        SessionState::Anonymous => Decision::Redirect(View::Login),
        SessionState::Authenticated(identity) if access.allows(identity.role) => Decision::Render,
        SessionState::Authenticated(_) => Decision::Redirect(View::Unauthorized),
    }
}

/// Guard a path from the route table; unknown paths go to NotFound
pub fn guard_path(state: &SessionState, path: &str) -> Decision {
    // public views render for everyone once loading finished
    if View::from_path(path).is_some() {
        return if state.is_loading() {
            Decision::Loading
        } else {
            Decision::Render
        };
    }
    match table::find(path) {
        Some(route) => guard(state, route.access),
        None => Decision::Redirect(View::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Identity {
            username: "u".into(),
            id: 1,
            role,
        })
    }

    // ========================================================================
    // guard
    // ========================================================================

    #[test]
    fn test_loading_never_redirects() {
        for access in [
            Access::Authenticated,
            Access::Role(Role::Teacher),
            Access::AnyOf(&[Role::Parent]),
        ] {
            assert_eq!(guard(&SessionState::Uninitialized, access), Decision::Loading);
        }
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(
            guard(&SessionState::Anonymous, Access::Authenticated),
            Decision::Redirect(View::Login)
        );
        assert_eq!(
            guard(&SessionState::Anonymous, Access::Role(Role::Student)),
            Decision::Redirect(View::Login)
        );
    }

    #[test]
    fn test_student_against_role_requirements() {
        let student = signed_in(Role::Student);
        assert_eq!(
            guard(&student, Access::Role(Role::Teacher)),
            Decision::Redirect(View::Unauthorized)
        );
        assert_eq!(guard(&student, Access::Role(Role::Student)), Decision::Render);
        assert_eq!(guard(&student, Access::Authenticated), Decision::Render);
    }

    #[test]
    fn test_any_of() {
        let parent = signed_in(Role::Parent);
        assert_eq!(
            guard(&parent, Access::AnyOf(&[Role::Teacher, Role::Student])),
            Decision::Redirect(View::Unauthorized)
        );
        assert_eq!(
            guard(&parent, Access::AnyOf(&[Role::Teacher, Role::Parent])),
            Decision::Render
        );
        assert_eq!(guard(&parent, Access::AnyOf(&[])), Decision::Render);
    }

    #[test]
    fn test_guard_is_idempotent() {
        let teacher = signed_in(Role::Teacher);
        let first = guard(&teacher, Access::Role(Role::Parent));
        for _ in 0..3 {
            assert_eq!(guard(&teacher, Access::Role(Role::Parent)), first);
        }
    }

    // ========================================================================
    // guard_path
    // ========================================================================

    #[test]
    fn test_guard_path_uses_table() {
        let parent = signed_in(Role::Parent);
        assert_eq!(
            guard_path(&parent, "/input-scores"),
            Decision::Redirect(View::Unauthorized)
        );
        assert_eq!(guard_path(&parent, "/notifications"), Decision::Render);
        assert_eq!(guard_path(&parent, "/profile"), Decision::Render);
    }

    #[test]
    fn test_guard_path_unknown_and_public() {
        assert_eq!(
            guard_path(&SessionState::Anonymous, "/nowhere"),
            Decision::Redirect(View::NotFound)
        );
        assert_eq!(guard_path(&SessionState::Anonymous, "/login"), Decision::Render);
        assert_eq!(
            guard_path(&SessionState::Uninitialized, "/unauthorized"),
            Decision::Loading
        );
    }
}
