//! Scripted identity provider

use async_trait::async_trait;
use shield_core::{Identity, IdentityProvider, IdentityToken, ShieldError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// [`IdentityProvider`] driven by canned results.
///
/// Refresh results are a queue so a test can script a refresh that succeeds
/// once and then fails. Sign-out always succeeds unless scripted otherwise.
pub struct ScriptedIdentityProvider {
    restored: Mutex<Option<Identity>>,
    sign_in_result: Mutex<Result<Identity, ShieldError>>,
    refresh_results: Mutex<VecDeque<Result<IdentityToken, ShieldError>>>,
    sign_in_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl ScriptedIdentityProvider {
    /// Provider with no restored session; interactive sign-in yields the
    /// given identity.
    pub fn fresh(identity: Identity) -> Self {
        Self {
            restored: Mutex::new(None),
            sign_in_result: Mutex::new(Ok(identity)),
            refresh_results: Mutex::new(VecDeque::new()),
            sign_in_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Provider that restores the given identity at load.
    pub fn restoring(identity: Identity) -> Self {
        let provider = Self::fresh(identity.clone());
        *provider.restored.lock().unwrap() = Some(identity);
        provider
    }

    /// Script the interactive sign-in to fail.
    pub fn failing_sign_in(error: ShieldError) -> Self {
        Self {
            restored: Mutex::new(None),
            sign_in_result: Mutex::new(Err(error)),
            refresh_results: Mutex::new(VecDeque::new()),
            sign_in_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Queue a token refresh result.
    pub fn queue_refresh(&self, result: Result<IdentityToken, ShieldError>) {
        self.refresh_results.lock().unwrap().push_back(result);
    }

    /// Number of interactive sign-ins performed.
    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    /// Number of token refreshes performed.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of sign-outs performed.
    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, ShieldError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in_result.lock().unwrap().clone()
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.restored.lock().unwrap().clone()
    }

    async fn refresh_token(&self, _identity: &Identity) -> Result<IdentityToken, ShieldError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShieldError::authentication("refresh script exhausted")))
    }

    async fn sign_out(&self) -> Result<(), ShieldError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
