//! Shield client core
//!
//! Shared vocabulary for the Shield face-authentication client: the
//! identity/session data model, per-frame face records, the error taxonomy,
//! client configuration, and the effect traits that decouple the session and
//! capture state machines from real I/O.
//!
//! This crate is pure: no networking, no timers. Sibling crates implement the
//! effect traits (`shield-client` for HTTP verification, `shield-channel` for
//! the realtime capture channel) and drive the state machines.

pub mod config;
pub mod effects;
pub mod error;
pub mod faces;
pub mod identity;
pub mod ids;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use effects::{FrameSource, IdentityProvider, JpegFrame, VerificationApi, VerifyResponse};
pub use error::ShieldError;
pub use faces::{DetectedFace, FinalAuthorization, RecognizedFace};
pub use identity::{Identity, IdentityToken};
pub use ids::{FaceId, UserId, Username};
pub use session::{AuthzCode, AuthzError, Profile, Role, SessionPhase, SessionState};
