//! Session state data model
//!
//! `SessionState` is the single cross-screen shared resource of the client.
//! It is mutated exclusively by the session store and read by everything else
//! as a snapshot. Invariant: `role` and `profile` are populated iff `identity`
//! is present and the last verification succeeded.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse permission tag returned by the backend's verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to the admin surface (user CRUD, authorization logs).
    Admin,
    /// Regular user: capture and recognition screens only.
    User,
}

impl Role {
    /// Parse the backend's wire string. Unknown roles are rejected; the
    /// verify flow treats a missing or unknown role as a denial.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine-readable denial codes returned by `POST /verify-user`.
///
/// Unknown codes round-trip verbatim through `Other` so new backend codes
/// surface to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthzCode {
    /// Account exists but has not completed first-time enrollment.
    FirstTimeLogin,
    /// No user record for this identity.
    UserNotFound,
    /// The backend rejected the identity token itself.
    InvalidToken,
    /// Any other backend-defined code, preserved verbatim.
    Other(String),
}

impl AuthzCode {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstTimeLogin => "FIRST_TIME_LOGIN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for AuthzCode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "FIRST_TIME_LOGIN" => Self::FirstTimeLogin,
            "USER_NOT_FOUND" => Self::UserNotFound,
            "INVALID_TOKEN" => Self::InvalidToken,
            _ => Self::Other(s),
        }
    }
}

impl From<AuthzCode> for String {
    fn from(code: AuthzCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for AuthzCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-visible authorization failure carried in the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzError {
    /// Message rendered to the user, verbatim from the backend when present.
    pub message: String,
    /// Machine-readable code, when the backend supplied one.
    pub code: Option<AuthzCode>,
}

impl AuthzError {
    /// Error with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Error with a message and a backend code.
    pub fn with_code(message: impl Into<String>, code: AuthzCode) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

/// Profile attributes fetched from `GET /user/me` after authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Backend record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Role string as stored by the backend.
    pub role: String,
    /// Avatar URL.
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    /// Whether face enrollment has completed for this account.
    #[serde(rename = "isFaceTrained", default)]
    pub face_trained: bool,
    /// Whether the account has been validated by an admin.
    #[serde(rename = "isValidated", default)]
    pub validated: bool,
    /// Whether the secure route is unlocked for this account.
    #[serde(rename = "canAccessSecureRoute", default)]
    pub secure_access_granted: bool,
    /// Last sign-in timestamp, ISO-8601 as stored by the backend.
    #[serde(default)]
    pub last_login_at: Option<String>,
    /// Record creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Record update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Whether the initial provider callback has resolved yet.
///
/// While `Resolving`, route guards must render a loading indicator and
/// perform no redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// App load: the identity provider has not reported yet.
    Resolving,
    /// The provider callback ran; the state below is authoritative.
    Resolved,
}

/// The current session snapshot published to all consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Resolution phase of the initial provider callback.
    pub phase: SessionPhase,
    /// Signed-in identity, if any.
    pub identity: Option<Identity>,
    /// Role granted by the last successful verification.
    pub role: Option<Role>,
    /// Profile attributes from the last successful verification.
    pub profile: Option<Profile>,
    /// Last authorization failure, cleared on success and on sign-out.
    pub authz_error: Option<AuthzError>,
}

impl SessionState {
    /// Initial state at app load, before the provider callback resolves.
    pub fn resolving() -> Self {
        Self {
            phase: SessionPhase::Resolving,
            identity: None,
            role: None,
            profile: None,
            authz_error: None,
        }
    }

    /// Resolved, signed-out state with no pending error.
    pub fn signed_out() -> Self {
        Self {
            phase: SessionPhase::Resolved,
            identity: None,
            role: None,
            profile: None,
            authz_error: None,
        }
    }

    /// Resolved, signed-out state carrying an authorization failure.
    pub fn denied(error: AuthzError) -> Self {
        Self {
            authz_error: Some(error),
            ..Self::signed_out()
        }
    }

    /// Resolved, authorized state.
    pub fn authorized(identity: Identity, role: Role) -> Self {
        Self {
            phase: SessionPhase::Resolved,
            identity: Some(identity),
            role: Some(role),
            profile: None,
            authz_error: None,
        }
    }

    /// True once the provider callback has run.
    pub fn is_resolved(&self) -> bool {
        self.phase == SessionPhase::Resolved
    }

    /// True when an identity is present.
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::resolving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityToken;
    use crate::ids::UserId;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_authz_code_round_trip() {
        for (wire, code) in [
            ("FIRST_TIME_LOGIN", AuthzCode::FirstTimeLogin),
            ("USER_NOT_FOUND", AuthzCode::UserNotFound),
            ("INVALID_TOKEN", AuthzCode::InvalidToken),
        ] {
            assert_eq!(AuthzCode::from(wire.to_string()), code);
            assert_eq!(code.as_str(), wire);
        }

        let unknown = AuthzCode::from("ACCOUNT_SUSPENDED".to_string());
        assert_eq!(unknown, AuthzCode::Other("ACCOUNT_SUSPENDED".to_string()));
        assert_eq!(unknown.as_str(), "ACCOUNT_SUSPENDED");
    }

    #[test]
    fn test_profile_decodes_backend_field_names() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "id": "uid-1",
                "name": "Alice",
                "email": "alice@gmail.com",
                "role": "user",
                "photoURL": "https://example.com/a.png",
                "isFaceTrained": true,
                "isValidated": true,
                "canAccessSecureRoute": false,
                "lastLoginAt": "2024-06-01T00:00:00"
            }"#,
        )
        .unwrap();

        assert!(profile.face_trained);
        assert!(profile.validated);
        assert!(!profile.secure_access_granted);
        assert_eq!(profile.photo_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_session_state_constructors_uphold_invariant() {
        let resolving = SessionState::resolving();
        assert!(!resolving.is_resolved());
        assert!(!resolving.is_signed_in());

        let signed_out = SessionState::signed_out();
        assert!(signed_out.is_resolved());
        assert!(signed_out.role.is_none());

        let identity = Identity::new(IdentityToken::new("t"), UserId::from("u"));
        let authorized = SessionState::authorized(identity, Role::Admin);
        assert!(authorized.is_signed_in());
        assert_eq!(authorized.role, Some(Role::Admin));
        assert!(authorized.authz_error.is_none());
    }
}
