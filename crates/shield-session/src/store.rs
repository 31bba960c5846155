//! The session store
//!
//! Owns the sign-in, verification, and sign-out flows. State transitions are
//! published over a `tokio::sync::watch` channel: one writer (this store),
//! any number of subscribers, latest-snapshot semantics.
//!
//! The verify flow enforces the two load-bearing rules of the session model:
//! a backend denial always ends signed-out (no stale privileged state), and a
//! 401 gets exactly one token refresh + retry before it is treated as an
//! authentication failure.

use shield_core::session::{AuthzCode, AuthzError};
use shield_core::{
    Identity, IdentityProvider, Role, SessionState, ShieldError, VerificationApi, VerifyResponse,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const DEFAULT_DENIAL: &str = "Not authorized to access this application";
const SIGN_IN_FAILED: &str = "Authentication failed";

/// Single writer of the session state.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    verifier: Arc<dyn VerificationApi>,
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in the resolving phase.
    pub fn new(provider: Arc<dyn IdentityProvider>, verifier: Arc<dyn VerificationApi>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::resolving());
        Self {
            provider,
            verifier,
            tx,
        }
    }

    /// Subscribe to state transitions. Receivers always see the latest
    /// snapshot; intermediate states may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    fn publish(&self, state: SessionState) {
        self.tx.send_replace(state);
    }

    /// Resolve the provider's restored session at app load.
    ///
    /// With a restored identity this runs the full verify flow; without one
    /// the state resolves to signed-out. Either way the phase leaves
    /// `Resolving`, which is what unblocks the authorization gate.
    pub async fn resolve_existing(&self) -> SessionState {
        match self.provider.current_identity().await {
            Some(identity) => {
                debug!(user = %identity.user_id, "restored identity, verifying");
                self.verify(identity).await;
            }
            None => self.publish(SessionState::signed_out()),
        }
        self.snapshot()
    }

    /// Interactive sign-in through the identity provider, then verification.
    pub async fn sign_in(&self) -> SessionState {
        match self.provider.sign_in().await {
            Ok(identity) => {
                info!(user = %identity.user_id, "provider sign-in succeeded");
                self.verify(identity).await;
            }
            Err(error) => {
                warn!(error = %error, "provider sign-in failed");
                self.publish(SessionState::denied(AuthzError::message(SIGN_IN_FAILED)));
            }
        }
        self.snapshot()
    }

    /// Sign out and clear the session to empty.
    pub async fn sign_out(&self) -> SessionState {
        if let Err(error) = self.provider.sign_out().await {
            warn!(error = %error, "provider sign-out failed");
        }
        self.publish(SessionState::signed_out());
        self.snapshot()
    }

    /// Re-fetch profile attributes, e.g. after face training completes.
    ///
    /// Uses the same one-refresh-on-401 policy as verification. A failure
    /// leaves the current profile untouched; the backend's earlier
    /// authorization stands.
    pub async fn refresh_profile(&self) -> SessionState {
        let Some(identity) = self.snapshot().identity else {
            return self.snapshot();
        };

        let result = match self.verifier.fetch_profile(&identity.token).await {
            Err(ShieldError::TokenExpired) => match self.provider.refresh_token(&identity).await {
                Ok(token) => {
                    // Keep the refreshed token so later calls do not refresh
                    // again.
                    self.tx.send_modify(|state| {
                        if let Some(current) = state.identity.as_mut() {
                            current.token = token.clone();
                        }
                    });
                    self.verifier.fetch_profile(&token).await
                }
                Err(error) => Err(error),
            },
            other => other,
        };

        match result {
            Ok(profile) => {
                self.tx.send_modify(|state| state.profile = Some(profile));
            }
            Err(error) => warn!(error = %error, "profile refresh failed"),
        }
        self.snapshot()
    }

    /// The verify flow: one backend round trip, with exactly one token
    /// refresh + retry when the backend answers 401.
    async fn verify(&self, identity: Identity) {
        match self.verifier.verify_user(&identity.token).await {
            Err(ShieldError::TokenExpired) => {
                debug!(user = %identity.user_id, "verify returned 401, refreshing token");
                match self.provider.refresh_token(&identity).await {
                    Ok(token) => {
                        let identity = identity.with_token(token);
                        let retry = self.verifier.verify_user(&identity.token).await;
                        self.settle(identity, retry).await;
                    }
                    Err(error) => {
                        warn!(error = %error, "token refresh failed");
                        self.force_out(AuthzError::message(SIGN_IN_FAILED)).await;
                    }
                }
            }
            first => self.settle(identity, first).await,
        }
    }

    /// Turn the final verify result into session state. By the time this
    /// runs, the single refresh+retry (if any) has already been spent.
    async fn settle(&self, identity: Identity, result: Result<VerifyResponse, ShieldError>) {
        match result {
            Ok(response) if response.authorized => {
                match response.role.as_deref().and_then(Role::parse) {
                    Some(role) => self.grant(identity, role).await,
                    // Authorized without a usable role is a denial; the
                    // original client required both fields.
                    None => {
                        self.force_out(AuthzError {
                            message: response.message.unwrap_or_else(|| DEFAULT_DENIAL.to_string()),
                            code: response.error_code.map(AuthzCode::from),
                        })
                        .await;
                    }
                }
            }
            Ok(response) => {
                self.force_out(AuthzError {
                    message: response.message.unwrap_or_else(|| DEFAULT_DENIAL.to_string()),
                    code: response.error_code.map(AuthzCode::from),
                })
                .await;
            }
            Err(ShieldError::AuthorizationDenied { message, code }) => {
                self.force_out(AuthzError { message, code }).await;
            }
            Err(error) => {
                warn!(error = %error, "verification failed");
                self.force_out(AuthzError::message(SIGN_IN_FAILED)).await;
            }
        }
    }

    /// Populate the authorized state, then best-effort fetch the profile.
    /// A profile fetch failure does not undo the authorization.
    async fn grant(&self, identity: Identity, role: Role) {
        info!(user = %identity.user_id, role = %role, "user authorized");
        let token = identity.token.clone();
        let mut state = SessionState::authorized(identity, role);

        match self.verifier.fetch_profile(&token).await {
            Ok(profile) => state.profile = Some(profile),
            Err(error) => warn!(error = %error, "profile fetch failed after authorization"),
        }
        self.publish(state);
    }

    /// Force sign-out so no stale privileged state survives, then record the
    /// denial for the UI.
    async fn force_out(&self, error: AuthzError) {
        if let Err(sign_out_error) = self.provider.sign_out().await {
            warn!(error = %sign_out_error, "provider sign-out failed during denial");
        }
        info!(code = ?error.code, "session denied, signed out");
        self.publish(SessionState::denied(error));
    }
}
