//! Shield test support
//!
//! Scripted implementations of the client's effect traits plus common
//! fixtures. Scripts are queues of canned results: each call pops the next
//! entry and records that it happened, so tests can assert both outcomes and
//! call counts without a live provider, backend, or camera.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod camera;
pub mod identity;
pub mod io;
pub mod verifier;

pub use camera::ScriptedFrameSource;
pub use identity::ScriptedIdentityProvider;
pub use io::{scripted_io, IoHarness, ScriptedIo};
pub use verifier::ScriptedVerifier;

use shield_core::{Identity, IdentityToken, UserId};

/// Install a compact tracing subscriber for a test. Safe to call from every
/// test; only the first call wins.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A signed-in identity with a fixed token.
pub fn test_identity() -> Identity {
    Identity::new(IdentityToken::new("token-1"), UserId::from("uid-1"))
}

/// The same identity carrying a different token, as after a refresh.
pub fn refreshed_token() -> IdentityToken {
    IdentityToken::new("token-2")
}
