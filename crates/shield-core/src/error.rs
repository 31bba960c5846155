//! Error taxonomy for the Shield client
//!
//! Every failure is caught at a component boundary and converted into
//! user-visible state; nothing here is allowed to crash a hosting screen.

use crate::session::AuthzCode;
use thiserror::Error;

/// Categorized client errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShieldError {
    /// Provider-level sign-in failure (popup dismissed, provider outage).
    #[error("authentication failed: {message}")]
    Authentication {
        /// User-visible description.
        message: String,
    },

    /// The backend verified the identity but refused authorization.
    #[error("not authorized: {message}")]
    AuthorizationDenied {
        /// Backend message, propagated verbatim.
        message: String,
        /// Backend error code, when supplied.
        code: Option<AuthzCode>,
    },

    /// The backend returned 401; the caller may refresh and retry once.
    #[error("identity token expired")]
    TokenExpired,

    /// Network or device failure on the HTTP path.
    #[error("transport failure: {message}")]
    Transport {
        /// User-visible description.
        message: String,
    },

    /// Realtime channel failure; surfaced, never auto-retried by the
    /// application layer.
    #[error("channel failure: {message}")]
    Channel {
        /// User-visible description.
        message: String,
    },
}

impl ShieldError {
    /// Provider sign-in failure.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Authorization denial carrying the backend's message and code.
    pub fn denied(message: impl Into<String>, code: Option<AuthzCode>) -> Self {
        Self::AuthorizationDenied {
            message: message.into(),
            code,
        }
    }

    /// HTTP-path transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Realtime channel failure.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Short stable code for log correlation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "AUTH_FAILED",
            Self::AuthorizationDenied { .. } => "AUTHZ_DENIED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Transport { .. } => "TRANSPORT",
            Self::Channel { .. } => "CHANNEL",
        }
    }

    /// Whether the caller is allowed a retry.
    ///
    /// Only `TokenExpired` is retryable, and only once after a refresh. A
    /// denial must force sign-out instead.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }

    /// Message suitable for rendering inline.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthorizationDenied { message, .. }
            | Self::Authentication { message }
            | Self::Transport { message }
            | Self::Channel { message } => message.clone(),
            Self::TokenExpired => "Your session expired, please sign in again".to_string(),
        }
    }
}
