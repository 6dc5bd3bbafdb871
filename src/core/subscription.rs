//! # Subscription: cancellation handle for a payload listener.
//!
//! [`Emitter::subscribe`] is [`Emitter::on`] that hands back the means of
//! undoing itself. `subscription.cancel()` is equivalent to
//! `emitter.off_listener(names, subscription.id())`.
//!
//! Dropping a `Subscription` does **not** cancel it; the listener stays
//! registered until cancelled or removed by other means.

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::emitter::Emitter;
use crate::events::{EventKey, EventMap, EventName, ListenerOptions, Visibility};
use crate::listeners::ListenerId;
use crate::listeners::registry::ListenerRegistry;

impl<M: EventMap> Emitter<M> {
    /// Registers `listener` on the given name(s) and returns its [`Subscription`].
    ///
    /// ## Example
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use emitvisor::{Emitter, EventMap, EventName};
    ///
    /// struct App;
    /// impl EventMap for App {
    ///     type Owner = ();
    /// }
    /// const X: EventName<App, i32> = EventName::new("x");
    ///
    /// let emitter = Emitter::<App>::new();
    /// let calls = Rc::new(Cell::new(0));
    /// let sink = Rc::clone(&calls);
    /// let cleanup = emitter.subscribe(X, move |_: &i32| sink.set(sink.get() + 1));
    ///
    /// cleanup.cancel();
    /// emitter.emit(X, 1);
    /// assert_eq!(calls.get(), 0);
    /// ```
    pub fn subscribe<P, V, N, F>(&self, names: N, listener: F) -> Subscription
    where
        P: 'static,
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
        F: Fn(&P) + 'static,
    {
        self.subscribe_with(names, ListenerOptions::default(), listener)
    }

    /// [`subscribe`](Self::subscribe) with explicit options.
    pub fn subscribe_with<P, V, N, F>(
        &self,
        names: N,
        options: ListenerOptions,
        listener: F,
    ) -> Subscription
    where
        P: 'static,
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
        F: Fn(&P) + 'static,
    {
        let names: Vec<EventName<M, P, V>> = names.into_iter().collect();
        let id = self.on_with(names.iter().copied(), options, listener);
        Subscription {
            registry: Rc::downgrade(&self.registry),
            keys: names.iter().map(EventName::key).collect(),
            id,
        }
    }
}

/// Handle returned by [`Emitter::subscribe`].
#[must_use = "a Subscription is the only way to cancel its listener; call cancel() when done"]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    keys: Vec<EventKey>,
    id: ListenerId,
}

impl Subscription {
    /// Identity of the subscribed listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Keys of the events the listener was registered on.
    pub fn keys(&self) -> &[EventKey] {
        &self.keys
    }

    /// True while the listener is still registered on at least one name.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            self.keys
                .iter()
                .any(|key| registry.resolve(*key, self.id).is_some())
        })
    }

    /// Removes the listener from every subscribed name.
    pub fn cancel(self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        for key in &self.keys {
            if registry.unregister(*key, self.id) {
                trace!(event = %key, listener = %self.id, "subscription cancelled");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("keys", &self.keys)
            .field("active", &self.is_active())
            .finish()
    }
}
