//! Session store and authorization gate
//!
//! The store is the single writer of [`shield_core::SessionState`]; every
//! other component subscribes and reads the latest snapshot. The gate is a
//! pure decision function over that snapshot, so route protection is testable
//! without any rendering.

pub mod gate;
pub mod store;

pub use gate::{guard, Decision, PathDecision, PathGuard};
pub use store::SessionStore;
