//! Error types produced by the emitter.
//!
//! Only awaiting an event can fail at runtime; see [`EmitterError`].
//!
//! Everything else is infallible by construction:
//! - removing an unknown listener is a silent no-op;
//! - registration is never rejected (the name/payload relationship is checked at compile time);
//! - the removal shapes are separate typed methods, so an invalid combination does not compile.
//!
//! Listener panics are not represented here; they are governed by
//! [`FailurePolicy`](crate::FailurePolicy).

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while awaiting an event with [`Emitter::pull`](crate::Emitter::pull).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// The deadline elapsed before the event fired; the pending listener was removed.
    #[error("event '{event}' not emitted within {timeout:?}")]
    Timeout {
        /// Name of the awaited event.
        event: &'static str,
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The pending listener was dropped without firing
    /// (listeners cleared with `off_all`/`off`, or the emitter itself was dropped).
    #[error("listener for event '{event}' detached before it fired")]
    Detached {
        /// Name of the awaited event.
        event: &'static str,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use emitvisor::EmitterError;
    /// use std::time::Duration;
    ///
    /// let err = EmitterError::Timeout { event: "ready", timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "pull_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::Timeout { .. } => "pull_timeout",
            EmitterError::Detached { .. } => "pull_detached",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitterError::Timeout { event, timeout } => {
                format!("timeout: event={event} after {timeout:?}")
            }
            EmitterError::Detached { event } => format!("detached: event={event}"),
        }
    }

    /// Name of the event the failed pull was waiting for.
    pub fn event(&self) -> &'static str {
        match self {
            EmitterError::Timeout { event, .. } | EmitterError::Detached { event } => *event,
        }
    }

    /// Indicates whether the failure came from an elapsed deadline.
    ///
    /// # Example
    /// ```
    /// use emitvisor::EmitterError;
    ///
    /// let err = EmitterError::Detached { event: "ready" };
    /// assert!(!err.is_timeout());
    /// ```
    pub fn is_timeout(&self) -> bool {
        matches!(self, EmitterError::Timeout { .. })
    }
}
