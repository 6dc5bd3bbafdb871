//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`], the per-emitter settings passed to
//! [`Emitter::with_config`](crate::Emitter::with_config).
//!
//! ## Sentinel values
//! - `max_listeners = 0` → unlimited (no leak warning is ever logged)

/// What happens when a listener panics during dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The panic unwinds out of `emit` to the caller; listeners after the
    /// failing one are not invoked for that emit (default).
    ///
    /// A once-listener that panics is still removed.
    #[default]
    Propagate,
    /// Each listener runs under `catch_unwind`; a panic is logged via
    /// `tracing::error!` and dispatch continues with the next listener.
    Isolate,
}

/// Per-emitter configuration.
///
/// ## Field semantics
/// - `failure_policy`: how listener panics affect the rest of a dispatch
/// - `max_listeners`: per-event listener count above which a leak warning is logged (`0` = unlimited)
/// - `cancellable`: whether records built by `emit` accept `prevent_default()`
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Listener panic handling.
    pub failure_policy: FailurePolicy,

    /// Soft limit of listeners per event name.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = registering the `n+1`-th listener on one name logs a
    ///   `tracing::warn!`; registration still succeeds.
    pub max_listeners: usize,

    /// Whether event records built by `emit`/`emit_reserved` are cancellable.
    ///
    /// When `false`, `prevent_default()` is ignored and `emit` always returns `true`.
    pub cancellable: bool,
}

impl EmitterConfig {
    /// Returns the listener limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → warn above `n` listeners per event
    #[inline]
    pub fn listener_limit(&self) -> Option<usize> {
        if self.max_listeners == 0 {
            None
        } else {
            Some(self.max_listeners)
        }
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `failure_policy = FailurePolicy::Propagate` (fail-fast)
    /// - `max_listeners = 0` (unlimited)
    /// - `cancellable = false`
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            max_listeners: 0,
            cancellable: false,
        }
    }
}
