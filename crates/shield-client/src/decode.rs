//! Status/body decoding for backend responses
//!
//! The mapping contract (documented on [`shield_core::VerificationApi`]):
//! 401 → `TokenExpired`, structured 4xx/5xx body → `AuthorizationDenied` with
//! the backend's message and code verbatim, everything else → `Transport`.

use serde::Deserialize;
use shield_core::session::AuthzCode;
use shield_core::{ShieldError, VerifyResponse};

/// Structured error body the backend attaches to 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

const DEFAULT_DENIAL: &str = "Not authorized to access this application";

/// Decode a `POST /verify-user` response.
pub(crate) fn decode_verify(status: u16, body: &str) -> Result<VerifyResponse, ShieldError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body)
            .map_err(|e| ShieldError::transport(format!("malformed verify response: {e}")));
    }
    Err(decode_failure(status, body))
}

/// Decode any other JSON-bodied endpoint on success, failure otherwise.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<T, ShieldError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body)
            .map_err(|e| ShieldError::transport(format!("malformed response body: {e}")));
    }
    Err(decode_failure(status, body))
}

/// Decode an endpoint whose success body carries nothing the client needs.
pub(crate) fn decode_unit(status: u16, body: &str) -> Result<(), ShieldError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(decode_failure(status, body))
}

fn decode_failure(status: u16, body: &str) -> ShieldError {
    if status == 401 {
        return ShieldError::TokenExpired;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if parsed.message.is_some() || parsed.error_code.is_some() => {
            let message = parsed
                .message
                .unwrap_or_else(|| DEFAULT_DENIAL.to_string());
            let code = parsed.error_code.map(AuthzCode::from);
            ShieldError::denied(message, code)
        }
        _ => ShieldError::transport(format!("backend returned status {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_verify_grant() {
        let response = decode_verify(200, r#"{"authorized": true, "role": "admin"}"#).unwrap();
        assert!(response.authorized);
        assert_eq!(response.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_verify_soft_denial_is_a_response_not_an_error() {
        // The backend can answer 200 with authorized=false; the session store
        // owns what happens next.
        let response = decode_verify(
            200,
            r#"{"authorized": false, "message": "pending validation"}"#,
        )
        .unwrap();
        assert!(!response.authorized);
        assert_eq!(response.message.as_deref(), Some("pending validation"));
    }

    #[test]
    fn test_401_maps_to_token_expired() {
        assert_matches!(
            decode_verify(401, r#"{"message": "Invalid token"}"#),
            Err(ShieldError::TokenExpired)
        );
    }

    #[test]
    fn test_structured_denial_propagates_verbatim() {
        let err = decode_verify(
            403,
            r#"{"message": "Please sign in from a registered device", "errorCode": "FIRST_TIME_LOGIN"}"#,
        )
        .unwrap_err();

        assert_matches!(
            err,
            ShieldError::AuthorizationDenied { message, code } => {
                assert_eq!(message, "Please sign in from a registered device");
                assert_eq!(code, Some(AuthzCode::FirstTimeLogin));
            }
        );
    }

    #[test]
    fn test_unknown_error_code_survives() {
        let err = decode_verify(
            403,
            r#"{"message": "suspended", "errorCode": "ACCOUNT_SUSPENDED"}"#,
        )
        .unwrap_err();

        assert_matches!(
            err,
            ShieldError::AuthorizationDenied { code: Some(AuthzCode::Other(raw)), .. } => {
                assert_eq!(raw, "ACCOUNT_SUSPENDED");
            }
        );
    }

    #[test]
    fn test_code_only_body_gets_default_message() {
        let err = decode_verify(403, r#"{"errorCode": "USER_NOT_FOUND"}"#).unwrap_err();
        assert_matches!(
            err,
            ShieldError::AuthorizationDenied { message, code: Some(AuthzCode::UserNotFound) } => {
                assert_eq!(message, DEFAULT_DENIAL);
            }
        );
    }

    #[test]
    fn test_unstructured_failure_is_transport() {
        assert_matches!(
            decode_verify(502, "<html>bad gateway</html>"),
            Err(ShieldError::Transport { .. })
        );
    }

    #[test]
    fn test_malformed_success_body_is_transport() {
        assert_matches!(
            decode_verify(200, "not json"),
            Err(ShieldError::Transport { .. })
        );
    }

    #[test]
    fn test_unit_decode() {
        assert!(decode_unit(201, r#"{"message": "User created successfully"}"#).is_ok());
        assert_matches!(
            decode_unit(400, r#"{"message": "Only Gmail addresses are allowed"}"#),
            Err(ShieldError::AuthorizationDenied { message, .. }) => {
                assert_eq!(message, "Only Gmail addresses are allowed");
            }
        );
    }
}
