//! Admin surface: user CRUD and authorization logs
//!
//! Admin-only endpoints; the backend enforces the role, the client just
//! attaches the bearer token and decodes structured failures.

use crate::backend::BackendClient;
use crate::decode;
use serde::{Deserialize, Serialize};
use shield_core::{IdentityToken, ShieldError, UserId};
use tracing::debug;

/// A user record as listed by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend document id.
    pub id: UserId,
    /// Account email.
    pub email: String,
    /// ISO-8601 creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Email of the account to provision.
    pub email: String,
}

/// One entry of the authorization audit trail.
///
/// The backend stores free-form log documents; fields beyond the typed ones
/// are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationLog {
    /// Backend document id.
    pub id: String,
    /// Email of the subject the decision was about.
    #[serde(default)]
    pub user_email: Option<String>,
    /// Whether access was granted.
    #[serde(default)]
    pub authorized: Option<bool>,
    /// Remaining backend fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Filters for `GET /admin/authorization_logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Filter by subject email.
    pub email: Option<String>,
    /// Filter by decision.
    pub authorized: Option<bool>,
}

impl LogQuery {
    /// Render the query-string pairs the backend expects.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }
        if let Some(authorized) = self.authorized {
            pairs.push(("authorized", authorized.to_string()));
        }
        pairs
    }
}

impl BackendClient {
    /// List all user records.
    pub async fn list_users(&self, token: &IdentityToken) -> Result<Vec<UserRecord>, ShieldError> {
        let url = self.endpoint("/users")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| Self::transport_error("list users", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("list users", e))?;
        decode::decode_json(status, &body)
    }

    /// Provision a new user account by email.
    pub async fn create_user(
        &self,
        token: &IdentityToken,
        user: &NewUser,
    ) -> Result<(), ShieldError> {
        let url = self.endpoint("/users")?;
        debug!(email = %user.email, "creating user");
        let response = self
            .http
            .post(url)
            .bearer_auth(token.expose())
            .json(user)
            .send()
            .await
            .map_err(|e| Self::transport_error("create user", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("create user", e))?;
        decode::decode_unit(status, &body)
    }

    /// Delete a user record and its provider account.
    pub async fn delete_user(
        &self,
        token: &IdentityToken,
        user_id: &UserId,
    ) -> Result<(), ShieldError> {
        let url = self.endpoint(&format!("/users/{user_id}"))?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| Self::transport_error("delete user", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("delete user", e))?;
        decode::decode_unit(status, &body)
    }

    /// Fetch the authorization audit trail, optionally filtered.
    pub async fn authorization_logs(
        &self,
        token: &IdentityToken,
        query: &LogQuery,
    ) -> Result<Vec<AuthorizationLog>, ShieldError> {
        let url = self.endpoint("/admin/authorization_logs")?;
        let response = self
            .http
            .get(url)
            .query(&query.to_pairs())
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| Self::transport_error("authorization logs", e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error("authorization logs", e))?;
        decode::decode_json(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_query_pairs() {
        let empty = LogQuery::default();
        assert!(empty.to_pairs().is_empty());

        let filtered = LogQuery {
            email: Some("alice@gmail.com".to_string()),
            authorized: Some(false),
        };
        assert_eq!(
            filtered.to_pairs(),
            vec![
                ("email", "alice@gmail.com".to_string()),
                ("authorized", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_authorization_log_keeps_unknown_fields() {
        let log: AuthorizationLog = serde_json::from_str(
            r#"{
                "id": "log-1",
                "user_email": "alice@gmail.com",
                "authorized": true,
                "timestamp": "2024-06-01T10:00:00",
                "reason": "face match"
            }"#,
        )
        .unwrap();

        assert_eq!(log.user_email.as_deref(), Some("alice@gmail.com"));
        assert_eq!(log.authorized, Some(true));
        assert_eq!(
            log.extra.get("reason").and_then(|v| v.as_str()),
            Some("face match")
        );
    }

    #[test]
    fn test_user_record_decodes_backend_shape() {
        let record: UserRecord = serde_json::from_str(
            r#"{"id": "uid-9", "email": "bob@gmail.com", "createdAt": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(record.email, "bob@gmail.com");
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01T00:00:00"));
    }
}
