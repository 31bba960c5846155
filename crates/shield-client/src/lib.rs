//! HTTP client for the Shield backend
//!
//! Implements [`shield_core::VerificationApi`] over `reqwest` and carries the
//! admin surface (user CRUD, authorization logs, secure-access toggle). All
//! status/body decoding lives in pure functions so the error mapping is
//! testable without a live server.

pub mod admin;
pub mod backend;
mod decode;

pub use admin::{AuthorizationLog, LogQuery, NewUser, UserRecord};
pub use backend::BackendClient;
