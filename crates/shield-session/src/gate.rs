//! The authorization gate
//!
//! One decision function for route protection, evaluated against the current
//! session snapshot on every call. No caching: a new snapshot means a new
//! decision.

use shield_core::{ClientConfig, Role, SessionState};

/// Outcome of guarding a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected screen.
    Allow,
    /// No identity: send the user to the sign-in screen.
    RedirectSignIn,
    /// Signed in but the role does not match: send to the unauthorized
    /// screen.
    RedirectUnauthorized,
    /// The provider callback has not resolved; render a loading indicator
    /// and do not redirect.
    Pending,
}

/// Decide whether the current session may see a route.
///
/// `Allow` iff an identity is present and the role matches `required_role`
/// (or no role is required).
pub fn guard(state: &SessionState, required_role: Option<Role>) -> Decision {
    if !state.is_resolved() {
        return Decision::Pending;
    }
    if !state.is_signed_in() {
        return Decision::RedirectSignIn;
    }
    match required_role {
        Some(required) if state.role != Some(required) => Decision::RedirectUnauthorized,
        _ => Decision::Allow,
    }
}

/// Outcome of the navigation-layer path check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDecision {
    /// Continue to the requested path.
    Proceed,
    /// No session cookie on a protected path: redirect to sign-in.
    RedirectSignIn,
}

/// Cookie-level guard applied before any screen renders.
///
/// Matches the configured prefixes exactly or as a path segment prefix, so
/// `/admin` also covers `/admin/logs` but not `/administrator`.
#[derive(Debug, Clone)]
pub struct PathGuard {
    protected: Vec<String>,
}

impl PathGuard {
    /// Guard the given path prefixes.
    pub fn new(protected: Vec<String>) -> Self {
        Self { protected }
    }

    /// Use the prefixes from client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.protected_paths.clone())
    }

    /// Whether a path requires a session cookie.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected
            .iter()
            .any(|p| path == p || path.starts_with(&format!("{p}/")))
    }

    /// Decide based on the requested path and cookie presence.
    pub fn check(&self, path: &str, has_session_cookie: bool) -> PathDecision {
        if self.is_protected(path) && !has_session_cookie {
            return PathDecision::RedirectSignIn;
        }
        PathDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::{Identity, IdentityToken, UserId};

    fn signed_in(role: Role) -> SessionState {
        SessionState::authorized(
            Identity::new(IdentityToken::new("t"), UserId::from("u1")),
            role,
        )
    }

    #[test]
    fn test_pending_while_resolving() {
        let state = SessionState::resolving();
        assert_eq!(guard(&state, None), Decision::Pending);
        assert_eq!(guard(&state, Some(Role::Admin)), Decision::Pending);
    }

    #[test]
    fn test_redirect_sign_in_when_identity_absent() {
        let state = SessionState::signed_out();
        assert_eq!(guard(&state, None), Decision::RedirectSignIn);
        assert_eq!(guard(&state, Some(Role::User)), Decision::RedirectSignIn);
    }

    #[test]
    fn test_allow_without_required_role() {
        assert_eq!(guard(&signed_in(Role::User), None), Decision::Allow);
        assert_eq!(guard(&signed_in(Role::Admin), None), Decision::Allow);
    }

    #[test]
    fn test_role_mismatch_redirects_unauthorized() {
        assert_eq!(
            guard(&signed_in(Role::User), Some(Role::Admin)),
            Decision::RedirectUnauthorized
        );
        assert_eq!(
            guard(&signed_in(Role::Admin), Some(Role::Admin)),
            Decision::Allow
        );
    }

    #[test]
    fn test_role_missing_with_requirement_redirects() {
        // Identity present but no role (cannot happen through the store, but
        // the gate must not allow it).
        let mut state = signed_in(Role::User);
        state.role = None;
        assert_eq!(
            guard(&state, Some(Role::User)),
            Decision::RedirectUnauthorized
        );
    }

    #[test]
    fn test_path_guard_prefixes() {
        let gate = PathGuard::from_config(&shield_core::ClientConfig::default());

        assert!(gate.is_protected("/camera"));
        assert!(gate.is_protected("/admin/logs"));
        assert!(!gate.is_protected("/administrator"));
        assert!(!gate.is_protected("/"));
        assert!(!gate.is_protected("/auth/signin"));
    }

    #[test]
    fn test_path_guard_decisions() {
        let gate = PathGuard::new(vec!["/camera".to_string()]);

        assert_eq!(gate.check("/camera", false), PathDecision::RedirectSignIn);
        assert_eq!(gate.check("/camera", true), PathDecision::Proceed);
        assert_eq!(gate.check("/", false), PathDecision::Proceed);
    }
}
