//! The backend HTTP client
//!
//! One `reqwest` client shared by the verification flow and the admin
//! surface. Request timeouts come from [`ClientConfig`]; every response goes
//! through the decode layer so failures map onto the shared taxonomy.

use crate::decode;
use async_trait::async_trait;
use shield_core::{
    ClientConfig, IdentityToken, Profile, ShieldError, VerificationApi, VerifyResponse,
};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for the Shield backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl BackendClient {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ShieldError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ShieldError::transport(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Resolve a path against the configured API base.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ShieldError> {
        self.config
            .api_base
            .join(path)
            .map_err(|e| ShieldError::transport(format!("invalid endpoint {path}: {e}")))
    }

    /// Collapse a reqwest failure into a transport error.
    pub(crate) fn transport_error(context: &str, error: reqwest::Error) -> ShieldError {
        warn!(context, error = %error, "http request failed");
        if error.is_timeout() {
            ShieldError::transport(format!("{context}: request timed out"))
        } else {
            ShieldError::transport(format!("{context}: {error}"))
        }
    }

    /// Grant or revoke access to the secure route for a user.
    pub async fn set_secure_access(
        &self,
        token: &IdentityToken,
        user_id: &str,
        granted: bool,
    ) -> Result<(), ShieldError> {
        let url = self.endpoint(&format!("/set_secure_access/{user_id}"))?;
        let response = self
            .http
            .patch(url)
            .bearer_auth(token.expose())
            .json(&serde_json::json!({ "canAccessSecureRoute": granted }))
            .send()
            .await
            .map_err(|e| Self::transport_error("set_secure_access", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("set_secure_access", e))?;
        decode::decode_unit(status, &body)
    }
}

#[async_trait]
impl VerificationApi for BackendClient {
    async fn verify_user(&self, token: &IdentityToken) -> Result<VerifyResponse, ShieldError> {
        let url = self.endpoint("/verify-user")?;
        debug!(endpoint = %url, "verifying user");

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "token": token.expose() }))
            .send()
            .await
            .map_err(|e| Self::transport_error("verify-user", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("verify-user", e))?;
        decode::decode_verify(status, &body)
    }

    async fn fetch_profile(&self, token: &IdentityToken) -> Result<Profile, ShieldError> {
        let url = self.endpoint("/user/me")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| Self::transport_error("user/me", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("user/me", e))?;
        decode::decode_json(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution() {
        let client = BackendClient::new(ClientConfig::default()).unwrap();
        let url = client.endpoint("/verify-user").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/verify-user");

        let nested = client.endpoint("/admin/authorization_logs").unwrap();
        assert_eq!(
            nested.as_str(),
            "http://localhost:5000/admin/authorization_logs"
        );
    }
}
