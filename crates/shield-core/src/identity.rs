//! Identity types owned by the external identity provider
//!
//! The provider issues a short-lived token and the display attributes of the
//! signed-in account. The session store holds these read-only for the duration
//! of the browser session; it never persists them itself.

use crate::ids::UserId;
use std::fmt;

/// Opaque short-lived credential issued by the identity provider.
///
/// Attached as a bearer credential to backend calls and optionally as a query
/// parameter when opening the capture channel. `Debug` redacts the value so
/// tokens never leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token for attaching to a request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityToken(***)")
    }
}

/// The signed-in identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Current identity token. Refreshed in place on token refresh.
    pub token: IdentityToken,
    /// Provider-assigned user identifier.
    pub user_id: UserId,
    /// Display name, if the provider supplied one.
    pub display_name: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// Avatar URL, if any.
    pub photo_url: Option<String>,
}

impl Identity {
    /// Minimal identity carrying only a token and user id.
    pub fn new(token: IdentityToken, user_id: UserId) -> Self {
        Self {
            token,
            user_id,
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    /// Replace the token after a refresh, keeping display attributes.
    pub fn with_token(mut self, token: IdentityToken) -> Self {
        self.token = token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = IdentityToken::new("very-secret-jwt");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("very-secret-jwt"));
        assert_eq!(rendered, "IdentityToken(***)");
    }

    #[test]
    fn test_with_token_keeps_attributes() {
        let mut identity = Identity::new(IdentityToken::new("t1"), UserId::from("u1"));
        identity.email = Some("alice@example.com".to_string());

        let refreshed = identity.with_token(IdentityToken::new("t2"));
        assert_eq!(refreshed.token.expose(), "t2");
        assert_eq!(refreshed.email.as_deref(), Some("alice@example.com"));
    }
}
