//! Emitter core: dispatch, awaiting, subscriptions and reserved events.
//!
//! The public API from this module is [`Emitter`] plus the handles its
//! methods return. Each file adds one `impl Emitter` block:
//! - [`emitter`]: registration, removal, synchronous dispatch, introspection;
//! - [`pull`]: `pull` and its [`Pull`] future;
//! - [`subscription`]: `subscribe` and its [`Subscription`] handle;
//! - [`reserved`]: `emit_reserved` behind the map's owner proof.

mod emitter;
mod pull;
mod reserved;
mod subscription;

pub use emitter::Emitter;
pub use pull::Pull;
pub use subscription::Subscription;
