//! Listener bookkeeping.
//!
//! - [`ListenerId`] the identity handed back by every registration
//! - `adapter` payload-only → full-event → type-erased wrappers, once wrapping
//! - `registry` per-event ordered `id → wrapper` stores with live iteration

pub(crate) mod adapter;
mod id;
pub(crate) mod registry;

pub use id::ListenerId;
