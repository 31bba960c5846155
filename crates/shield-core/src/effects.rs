//! Effect trait definitions
//!
//! Interfaces for the external collaborators of the client: the identity
//! provider, the backend verification API, and the camera. Implementations
//! live in sibling crates (`shield-client` for HTTP, platform glue for the
//! camera); tests use the scripted versions from `shield-testkit`.

use crate::error::ShieldError;
use crate::identity::{Identity, IdentityToken};
use crate::session::Profile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response body of `POST /verify-user`.
///
/// `role`, `message`, and `error_code` arrive as free-form strings; the
/// session store decides what they mean. A response with `authorized: true`
/// but a missing or unknown role is treated as a denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the backend authorized this identity.
    pub authorized: bool,
    /// Granted role string (`"admin"` / `"user"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// User-visible message accompanying a denial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine-readable denial code.
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// The external identity provider (interactive sign-in, token refresh).
///
/// The provider owns persistence of the local session; the client only ever
/// holds a read-only `Identity` snapshot.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's interactive sign-in flow.
    async fn sign_in(&self) -> Result<Identity, ShieldError>;

    /// Identity restored from the provider's local session at app load, if
    /// one exists.
    async fn current_identity(&self) -> Option<Identity>;

    /// Force-refresh the identity token.
    async fn refresh_token(&self, identity: &Identity) -> Result<IdentityToken, ShieldError>;

    /// Terminate the provider session.
    async fn sign_out(&self) -> Result<(), ShieldError>;
}

/// The backend's verification surface, one call per sign-in (and on 401).
///
/// Error contract: a 401 maps to [`ShieldError::TokenExpired`] (the caller
/// may refresh and retry exactly once), a structured 4xx/5xx body maps to
/// [`ShieldError::AuthorizationDenied`] with the backend's message and code
/// verbatim, and anything else maps to [`ShieldError::Transport`].
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Exchange an identity token for an authorization decision.
    async fn verify_user(&self, token: &IdentityToken) -> Result<VerifyResponse, ShieldError>;

    /// Fetch the signed-in user's profile attributes.
    async fn fetch_profile(&self, token: &IdentityToken) -> Result<Profile, ShieldError>;
}

/// One JPEG-encoded snapshot of the current video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegFrame(pub Vec<u8>);

impl JpegFrame {
    /// Raw JPEG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// The camera: produces one frame per streamer tick.
///
/// A failure here is a device error ([`ShieldError::Transport`]) and ends the
/// capture session.
#[async_trait]
pub trait FrameSource: Send {
    /// Grab the current video frame as JPEG.
    async fn next_frame(&mut self) -> Result<JpegFrame, ShieldError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_response_decodes_denial() {
        let response: VerifyResponse = serde_json::from_str(
            r#"{"authorized": false, "message": "Not authorized", "errorCode": "USER_NOT_FOUND"}"#,
        )
        .unwrap();
        assert!(!response.authorized);
        assert_eq!(response.error_code.as_deref(), Some("USER_NOT_FOUND"));
        assert!(response.role.is_none());
    }

    #[test]
    fn test_verify_response_decodes_grant() {
        let response: VerifyResponse =
            serde_json::from_str(r#"{"authorized": true, "role": "admin"}"#).unwrap();
        assert!(response.authorized);
        assert_eq!(response.role.as_deref(), Some("admin"));
    }
}
