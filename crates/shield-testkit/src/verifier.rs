//! Scripted verification backend

use async_trait::async_trait;
use shield_core::session::Profile;
use shield_core::{IdentityToken, ShieldError, VerificationApi, VerifyResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// [`VerificationApi`] driven by queued responses.
///
/// Each `verify_user` call pops the next scripted result and records the
/// token it was called with, so tests can assert the single-retry rule and
/// that a retry carries the refreshed token.
#[derive(Default)]
pub struct ScriptedVerifier {
    verify_results: Mutex<VecDeque<Result<VerifyResponse, ShieldError>>>,
    profile_results: Mutex<VecDeque<Result<Profile, ShieldError>>>,
    verify_tokens: Mutex<Vec<String>>,
    verify_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl ScriptedVerifier {
    /// Empty script; every call fails until results are queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `verify_user` result.
    pub fn queue_verify(&self, result: Result<VerifyResponse, ShieldError>) {
        self.verify_results.lock().unwrap().push_back(result);
    }

    /// Queue a `fetch_profile` result.
    pub fn queue_profile(&self, result: Result<Profile, ShieldError>) {
        self.profile_results.lock().unwrap().push_back(result);
    }

    /// Number of `verify_user` calls made.
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_profile` calls made.
    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    /// Tokens seen by `verify_user`, in call order.
    pub fn verify_tokens(&self) -> Vec<String> {
        self.verify_tokens.lock().unwrap().clone()
    }
}

/// Response granting the given role string.
pub fn grant(role: &str) -> VerifyResponse {
    VerifyResponse {
        authorized: true,
        role: Some(role.to_string()),
        message: None,
        error_code: None,
    }
}

/// Response denying access with a message and optional code.
pub fn deny(message: &str, error_code: Option<&str>) -> VerifyResponse {
    VerifyResponse {
        authorized: false,
        role: None,
        message: Some(message.to_string()),
        error_code: error_code.map(str::to_string),
    }
}

#[async_trait]
impl VerificationApi for ScriptedVerifier {
    async fn verify_user(&self, token: &IdentityToken) -> Result<VerifyResponse, ShieldError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_tokens
            .lock()
            .unwrap()
            .push(token.expose().to_string());
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShieldError::transport("verify script exhausted")))
    }

    async fn fetch_profile(&self, _token: &IdentityToken) -> Result<Profile, ShieldError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShieldError::transport("profile script exhausted")))
    }
}
