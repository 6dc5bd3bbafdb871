//! # Event record delivered to full-event listeners.
//!
//! One [`EventRecord`] is built per emit call and dropped once every
//! listener has seen it. Listeners only get a shared reference; the one
//! piece of mutable state is the *default prevented* flag, which is honored
//! only when the record is cancellable.
//!
//! ## Example
//! ```rust
//! use emitvisor::{EventMap, EventName, EventRecord};
//!
//! struct Doc;
//! impl EventMap for Doc {
//!     type Owner = ();
//! }
//! const SAVE: EventName<Doc, String> = EventName::new("save");
//!
//! let ev = EventRecord::new(SAVE, "draft.txt".to_string()).cancellable(true);
//! ev.prevent_default();
//! assert!(ev.default_prevented());
//! assert_eq!(ev.payload(), "draft.txt");
//! ```

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use super::name::{EventKey, EventName, Public, Visibility};

/// `{name, payload, cancellable}` for one occurrence of an event.
pub struct EventRecord<M, P> {
    key: EventKey,
    payload: P,
    cancellable: bool,
    prevented: Cell<bool>,
    _map: PhantomData<fn() -> M>,
}

impl<M, P> EventRecord<M, P> {
    /// Builds a non-cancellable record for a public event.
    ///
    /// Records of reserved events are only built inside the emitter.
    pub fn new(name: EventName<M, P, Public>, payload: P) -> Self {
        Self::build(name, payload)
    }

    pub(crate) fn build<V: Visibility>(name: EventName<M, P, V>, payload: P) -> Self {
        Self {
            key: name.key(),
            payload,
            cancellable: false,
            prevented: Cell::new(false),
            _map: PhantomData,
        }
    }

    /// Sets whether listeners may cancel this record.
    #[must_use]
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    /// Event name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// True for records of reserved events (built by `emit_reserved`).
    #[inline]
    pub fn is_reserved(&self) -> bool {
        self.key.is_reserved()
    }

    /// Registry key the record is dispatched under.
    #[inline]
    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Borrowed payload.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Takes the payload out of the record.
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Whether [`prevent_default`](Self::prevent_default) has any effect.
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Marks the record as cancelled. Ignored for non-cancellable records.
    pub fn prevent_default(&self) {
        if self.cancellable {
            self.prevented.set(true);
        }
    }

    /// True once a listener cancelled a cancellable record.
    #[inline]
    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

impl<M, P: fmt::Debug> fmt::Debug for EventRecord<M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecord")
            .field("name", &self.key.name())
            .field("reserved", &self.key.is_reserved())
            .field("payload", &self.payload)
            .field("cancellable", &self.cancellable)
            .field("default_prevented", &self.prevented.get())
            .finish()
    }
}
