//! # Emitter: registration, removal and synchronous dispatch.
//!
//! [`Emitter`] is the public surface. It owns a [`ListenerRegistry`] and
//! dispatches [`EventRecord`]s through it.
//!
//! ## Architecture
//! ```text
//! on/once/on_with ──► adapt(Fn(&P)) ──┐
//! add_event_listener(Fn(&EventRecord))┴─► erase ─► once? ─► ListenerRegistry::register
//!
//! emit/dispatch/publish(name, payload)
//!   └─► EventRecord{name, payload, cancellable}
//!         └─► dispatch_event(&record)
//!               └─► for slot in registry[record.key()] (live cursor, registration order):
//!                     invoke(slot.wrapper, &record)   ← FailurePolicy applies here
//!               └─► returns !record.default_prevented()
//! ```
//!
//! ## Rules
//! - Listeners run synchronously, in registration order, before `emit` returns.
//! - A listener removed while a dispatch is running is skipped if not yet reached.
//! - A listener added while a dispatch is running first sees the *next* emit.
//! - Re-entrant `emit` from a listener is allowed and runs to completion first.
//! - Removal never fails; unknown ids are ignored.
//! - Listeners are keyed by [`EventKey`]: a public name spelled like a
//!   reserved one reaches none of the reserved listeners.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{error, trace, warn};

use crate::config::{EmitterConfig, FailurePolicy};
use crate::events::{
    EventKey, EventMap, EventName, EventRecord, ListenerOptions, Public, Visibility,
};
use crate::listeners::ListenerId;
use crate::listeners::adapter;
use crate::listeners::registry::{ListenerRegistry, Wrapper};

/// Typed event emitter for the event map `M`.
///
/// Cheap to clone: clones share the same listeners. Single-threaded
/// (`!Send`, `!Sync`); listener closures need not be `Send`.
///
/// A listener that captures a clone of its own emitter creates an `Rc`
/// cycle that keeps both alive; capture a [`Subscription`](crate::Subscription)
/// or remove the listener explicitly when that matters.
pub struct Emitter<M: EventMap> {
    pub(super) registry: Rc<ListenerRegistry>,
    pub(super) config: Rc<EmitterConfig>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> Emitter<M> {
    /// Creates an emitter with [`EmitterConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter with the given configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Rc::new(ListenerRegistry::new()),
            config: Rc::new(config),
            _map: PhantomData,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a full-event listener on `name`.
    ///
    /// With `options.once` the listener removes itself after its first call;
    /// the returned id still identifies it until then.
    pub fn add_event_listener<P, V, F>(
        &self,
        name: EventName<M, P, V>,
        listener: F,
        options: ListenerOptions,
    ) -> ListenerId
    where
        P: 'static,
        V: Visibility,
        F: Fn(&EventRecord<M, P>) + 'static,
    {
        let id = self.registry.allocate_id();
        let key = name.key();
        self.attach(key, id, adapter::erase::<M, P, F>(key, listener), options);
        id
    }

    /// Registers a payload listener on one name or on every name of a list.
    ///
    /// ```rust
    /// # use emitvisor::{Emitter, EventMap, EventName};
    /// # struct Map;
    /// # impl EventMap for Map { type Owner = (); }
    /// const FOO: EventName<Map, &'static str> = EventName::new("foo");
    /// const BAR: EventName<Map, &'static str> = EventName::new("bar");
    ///
    /// let emitter = Emitter::<Map>::new();
    /// let id = emitter.on([FOO, BAR], |v: &&str| println!("got {v}"));
    /// assert_eq!(emitter.listeners(FOO), vec![id]);
    /// assert_eq!(emitter.listeners(BAR), vec![id]);
    /// ```
    pub fn on<P, V, N, F>(&self, names: N, listener: F) -> ListenerId
    where
        P: 'static,
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
        F: Fn(&P) + 'static,
    {
        self.on_with(names, ListenerOptions::default(), listener)
    }

    /// Same as [`on`](Self::on), but the listener fires at most once per name.
    pub fn once<P, V, N, F>(&self, names: N, listener: F) -> ListenerId
    where
        P: 'static,
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
        F: Fn(&P) + 'static,
    {
        self.on_with(names, ListenerOptions::once(), listener)
    }

    /// Registers a payload listener with explicit options.
    ///
    /// All names share the returned id; each name holds its own registration
    /// (and, with `once`, its own single shot). Repeating a name in the list
    /// does not duplicate delivery.
    pub fn on_with<P, V, N, F>(&self, names: N, options: ListenerOptions, listener: F) -> ListenerId
    where
        P: 'static,
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
        F: Fn(&P) + 'static,
    {
        let id = self.registry.allocate_id();
        let listener = Rc::new(listener);
        for name in names {
            let key = name.key();
            let wrapper =
                adapter::erase::<M, P, _>(key, adapter::adapt::<M, P, F>(Rc::clone(&listener)));
            self.attach(key, id, wrapper, options);
        }
        id
    }

    fn attach(&self, key: EventKey, id: ListenerId, wrapper: Wrapper, options: ListenerOptions) {
        let wrapper = if options.once {
            adapter::once(Rc::downgrade(&self.registry), key, id, wrapper)
        } else {
            wrapper
        };
        let count = self.registry.register(key, id, wrapper, options.capture);
        trace!(
            event = %key,
            listener = %id,
            once = options.once,
            capture = options.capture,
            "listener registered"
        );

        if let Some(limit) = self.config.listener_limit() {
            if count > limit {
                warn!(
                    event = %key,
                    listeners = count,
                    limit,
                    "listener limit exceeded; possible leak"
                );
            }
        }
    }

    // ---------------------------
    // Removal
    // ---------------------------

    /// Removes the listener `id` from `name`. Unknown ids are ignored.
    pub fn remove_event_listener<P, V: Visibility>(
        &self,
        name: EventName<M, P, V>,
        id: ListenerId,
    ) -> &Self {
        let key = name.key();
        if self.registry.unregister(key, id) {
            trace!(event = %key, listener = %id, "listener removed");
        }
        self
    }

    /// Removes every listener of every event.
    pub fn off_all(&self) -> &Self {
        let removed = self.registry.clear();
        trace!(removed, "all listeners removed");
        self
    }

    /// Removes every listener of the given name(s), whatever their id.
    pub fn off<P, V, N>(&self, names: N) -> &Self
    where
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
    {
        for name in names {
            let key = name.key();
            let removed = self.registry.unregister_name(key);
            trace!(event = %key, removed, "event listeners removed");
        }
        self
    }

    /// Removes the listener `id` from the given name(s) only.
    pub fn off_listener<P, V, N>(&self, names: N, id: ListenerId) -> &Self
    where
        V: Visibility,
        N: IntoIterator<Item = EventName<M, P, V>>,
    {
        for name in names {
            self.remove_event_listener(name, id);
        }
        self
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Emits a public event; returns `false` if a listener cancelled it.
    ///
    /// The record is cancellable when [`EmitterConfig::cancellable`] is set.
    pub fn emit<P: 'static>(&self, name: EventName<M, P, Public>, payload: P) -> bool {
        let record = EventRecord::new(name, payload).cancellable(self.config.cancellable);
        self.dispatch_event(&record)
    }

    /// Alias of [`emit`](Self::emit).
    pub fn dispatch<P: 'static>(&self, name: EventName<M, P, Public>, payload: P) -> bool {
        self.emit(name, payload)
    }

    /// Alias of [`emit`](Self::emit).
    pub fn publish<P: 'static>(&self, name: EventName<M, P, Public>, payload: P) -> bool {
        self.emit(name, payload)
    }

    /// Dispatches a pre-built record; returns `!record.default_prevented()`.
    pub fn dispatch_event<P: 'static>(&self, record: &EventRecord<M, P>) -> bool {
        self.dispatch_record(record);
        !record.default_prevented()
    }

    pub(super) fn dispatch_record<P: 'static>(&self, record: &EventRecord<M, P>) {
        let key = record.key();
        let horizon = self.registry.horizon();
        let mut cursor = 0;
        let mut delivered = 0usize;

        while let Some((seq, id, wrapper)) = self.registry.next_after(key, cursor, horizon) {
            cursor = seq;
            if self.invoke(key, id, &wrapper, record) {
                delivered += 1;
            }
        }
        trace!(event = %key, delivered, "event dispatched");
    }

    /// Runs one wrapper; `true` if the listener ran to completion.
    fn invoke(&self, key: EventKey, id: ListenerId, wrapper: &Wrapper, record: &dyn Any) -> bool {
        match self.config.failure_policy {
            FailurePolicy::Propagate => wrapper(record),
            FailurePolicy::Isolate => {
                match panic::catch_unwind(AssertUnwindSafe(|| wrapper(record))) {
                    Ok(ran) => ran,
                    Err(panic) => {
                        error!(
                            event = %key,
                            listener = %id,
                            panic = panic_message(panic.as_ref()),
                            "listener panicked; dispatch continues"
                        );
                        false
                    }
                }
            }
        }
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Listener ids registered on `name`, in registration order.
    pub fn listeners<P, V: Visibility>(&self, name: EventName<M, P, V>) -> Vec<ListenerId> {
        self.registry.list(name.key())
    }

    /// Listener ids of every event that has listeners, keyed by [`EventKey`].
    pub fn all_listeners(&self) -> BTreeMap<EventKey, Vec<ListenerId>> {
        self.registry.list_all()
    }

    /// Number of listeners registered on `name`.
    pub fn listener_count<P, V: Visibility>(&self, name: EventName<M, P, V>) -> usize {
        self.registry.len(name.key())
    }

    /// True if `id` is registered on `name`.
    pub fn has_listener<P, V: Visibility>(&self, name: EventName<M, P, V>, id: ListenerId) -> bool {
        self.registry.resolve(name.key(), id).is_some()
    }

    /// Capture flag `id` was registered with on `name`; `None` if it is not registered there.
    pub fn listener_capture<P, V: Visibility>(
        &self,
        name: EventName<M, P, V>,
        id: ListenerId,
    ) -> Option<bool> {
        self.registry.capture(name.key(), id)
    }

    /// True if no event has listeners.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

impl<M: EventMap> Clone for Emitter<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            config: Rc::clone(&self.config),
            _map: PhantomData,
        }
    }
}

impl<M: EventMap> Default for Emitter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EventMap> fmt::Debug for Emitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("map", &std::any::type_name::<M>())
            .field("listeners", &self.registry.list_all())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    struct Map;
    impl EventMap for Map {
        type Owner = ();
    }

    const FOO: EventName<Map, String> = EventName::new("foo");
    const BAR: EventName<Map, String> = EventName::new("bar");
    const TICK: EventName<Map, ()> = EventName::new("tick");
    const MAYBE: EventName<Map, Option<u32>> = EventName::new("maybe");

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Log, tag: &'static str) -> Box<dyn Fn(&())> {
        let log = Rc::clone(log);
        Box::new(move |_: &()| log.borrow_mut().push(tag.to_string()))
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` under a thread-local fmt subscriber and returns what it logged.
    fn with_logs<R>(level: Level, f: impl FnOnce() -> R) -> (R, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(level)
            .with_ansi(false)
            .finish();

        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
        (out, logs)
    }

    #[test]
    fn test_on_emit_calls_listener_once_synchronously() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let sink = Rc::clone(&seen);
        emitter.on(FOO, move |v: &String| sink.borrow_mut().push(v.clone()));

        assert!(emitter.emit(FOO, "bar".to_string()));
        assert_eq!(*seen.borrow(), vec!["bar".to_string()]);
    }

    #[test]
    fn test_once_fires_only_first_emit() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let sink = Rc::clone(&seen);
        let id = emitter.once(FOO, move |v: &String| sink.borrow_mut().push(v.clone()));

        assert!(emitter.has_listener(FOO, id));
        emitter.emit(FOO, "a".to_string());
        emitter.emit(FOO, "b".to_string());

        assert_eq!(*seen.borrow(), vec!["a".to_string()]);
        assert!(!emitter.listeners(FOO).contains(&id));
    }

    #[test]
    fn test_name_list_fans_out_same_identity() {
        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let id = emitter.on([FOO, BAR], move |_: &String| sink.set(sink.get() + 1));

        emitter.emit(FOO, "x".to_string());
        emitter.emit(BAR, "x".to_string());
        assert_eq!(hits.get(), 2);

        emitter.off_listener(FOO, id);
        emitter.emit(FOO, "x".to_string());
        emitter.emit(BAR, "x".to_string());
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_repeated_name_does_not_duplicate_delivery() {
        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        emitter.on([FOO, FOO], move |_: &String| sink.set(sink.get() + 1));

        emitter.emit(FOO, "x".to_string());
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(FOO), 1);
    }

    #[test]
    fn test_once_over_name_list_fires_once_per_name() {
        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        emitter.once([FOO, BAR], move |_: &String| sink.set(sink.get() + 1));

        for _ in 0..3 {
            emitter.emit(FOO, "x".to_string());
            emitter.emit(BAR, "x".to_string());
        }
        assert_eq!(hits.get(), 2);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        emitter.on(TICK, push(&seen, "first"));
        emitter.on(TICK, push(&seen, "second"));
        emitter.on(TICK, push(&seen, "third"));

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_off_listener_removes_only_that_listener() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let a = emitter.on(TICK, push(&seen, "a"));
        let b = emitter.on(TICK, push(&seen, "b"));
        let other = emitter.on(FOO, |_: &String| {});

        emitter.off_listener(TICK, a);
        assert_eq!(emitter.listeners(TICK), vec![b]);
        assert_eq!(emitter.listeners(FOO), vec![other]);

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["b"]);
    }

    #[test]
    fn test_off_by_name_and_off_all() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        emitter.on(TICK, push(&seen, "tick-1"));
        emitter.on(TICK, push(&seen, "tick-2"));
        let foo = emitter.on(FOO, |_: &String| {});

        emitter.off(TICK);
        emitter.emit(TICK, ());
        assert!(seen.borrow().is_empty());
        assert_eq!(emitter.all_listeners().get(&FOO.key()), Some(&vec![foo]));

        emitter.on(TICK, push(&seen, "tick-3"));
        emitter.off_all();
        assert!(emitter.all_listeners().is_empty());
        emitter.emit(TICK, ());
        emitter.emit(FOO, "x".to_string());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_removal_is_chainable_and_idempotent() {
        let emitter = Emitter::<Map>::new();
        let id = emitter.on(FOO, |_: &String| {});

        emitter
            .remove_event_listener(FOO, id)
            .remove_event_listener(FOO, id)
            .off([FOO, BAR])
            .off_all();
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_add_event_listener_sees_full_record() {
        let emitter = Emitter::<Map>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = emitter.add_event_listener(
            MAYBE,
            move |ev: &EventRecord<Map, Option<u32>>| {
                sink.borrow_mut().push((ev.name(), *ev.payload()));
            },
            ListenerOptions::default(),
        );

        emitter.emit(MAYBE, Some(3));
        emitter.emit(MAYBE, None);
        assert_eq!(*seen.borrow(), vec![("maybe", Some(3)), ("maybe", None)]);

        emitter.remove_event_listener(MAYBE, id);
        emitter.emit(MAYBE, Some(4));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_add_event_listener_once_keeps_caller_identity() {
        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let id = emitter.add_event_listener(
            TICK,
            move |_: &EventRecord<Map, ()>| sink.set(sink.get() + 1),
            ListenerOptions::once().with_capture(true),
        );

        assert_eq!(emitter.listeners(TICK), vec![id]);
        assert_eq!(emitter.listener_capture(TICK, id), Some(true));
        emitter.emit(TICK, ());
        emitter.emit(TICK, ());
        assert_eq!(hits.get(), 1);
        assert!(emitter.listeners(TICK).is_empty());
        assert_eq!(emitter.listener_capture(TICK, id), None);
    }

    #[test]
    fn test_dispatch_event_reports_cancellation() {
        let emitter = Emitter::<Map>::new();
        emitter.add_event_listener(
            FOO,
            |ev: &EventRecord<Map, String>| {
                if ev.payload() == "stop" {
                    ev.prevent_default();
                }
            },
            ListenerOptions::default(),
        );

        let go = EventRecord::new(FOO, "go".to_string()).cancellable(true);
        let stop = EventRecord::new(FOO, "stop".to_string()).cancellable(true);
        assert!(emitter.dispatch_event(&go));
        assert!(!emitter.dispatch_event(&stop));
        assert!(stop.default_prevented());

        // emit builds non-cancellable records by default
        assert!(emitter.emit(FOO, "stop".to_string()));
    }

    #[test]
    fn test_cancellable_config_applies_to_emit() {
        let emitter = Emitter::<Map>::with_config(EmitterConfig {
            cancellable: true,
            ..EmitterConfig::default()
        });
        emitter.add_event_listener(
            TICK,
            |ev: &EventRecord<Map, ()>| ev.prevent_default(),
            ListenerOptions::default(),
        );
        assert!(!emitter.emit(TICK, ()));
        assert!(!emitter.publish(TICK, ()));
    }

    #[test]
    fn test_aliases_dispatch_like_emit() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        emitter.on(TICK, push(&seen, "t"));

        emitter.emit(TICK, ());
        emitter.dispatch(TICK, ());
        emitter.publish(TICK, ());
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_listener_added_during_dispatch_waits_for_next_emit() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let inner_seen = Rc::clone(&seen);
        let handle = emitter.clone();
        emitter.on(TICK, move |_: &()| {
            inner_seen.borrow_mut().push("outer".to_string());
            handle.on(TICK, push(&inner_seen, "late"));
        });

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["outer"]);

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["outer", "outer", "late"]);
        emitter.off_all();
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let victim = Rc::new(Cell::new(None));

        let handle = emitter.clone();
        let target = Rc::clone(&victim);
        emitter.on(TICK, move |_: &()| {
            if let Some(id) = target.get() {
                handle.off_listener(TICK, id);
            }
        });
        victim.set(Some(emitter.on(TICK, push(&seen, "victim"))));
        emitter.on(TICK, push(&seen, "survivor"));

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["survivor"]);
        emitter.off_all();
    }

    #[test]
    fn test_once_reregistering_itself_is_not_retriggered() {
        fn arm(emitter: &Emitter<Map>, hits: Rc<Cell<u32>>) {
            let handle = emitter.clone();
            emitter.once(TICK, move |_: &()| {
                hits.set(hits.get() + 1);
                arm(&handle, Rc::clone(&hits));
            });
        }

        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        arm(&emitter, Rc::clone(&hits));

        emitter.emit(TICK, ());
        assert_eq!(hits.get(), 1);
        emitter.emit(TICK, ());
        assert_eq!(hits.get(), 2);
        assert_eq!(emitter.listener_count(TICK), 1);
        emitter.off_all();
    }

    #[test]
    fn test_reentrant_emit_inside_once_fires_once() {
        let emitter = Emitter::<Map>::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let handle = emitter.clone();
        emitter.once(TICK, move |_: &()| {
            sink.set(sink.get() + 1);
            handle.emit(TICK, ());
        });

        emitter.emit(TICK, ());
        emitter.emit(TICK, ());
        assert_eq!(hits.get(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_reentrant_emit_of_other_event() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        let handle = emitter.clone();
        let sink = Rc::clone(&seen);
        emitter.on(FOO, move |v: &String| {
            sink.borrow_mut().push(format!("foo:{v}"));
            handle.emit(BAR, v.to_uppercase());
        });
        let sink = Rc::clone(&seen);
        emitter.on(BAR, move |v: &String| sink.borrow_mut().push(format!("bar:{v}")));

        emitter.emit(FOO, "x".to_string());
        assert_eq!(*seen.borrow(), vec!["foo:x", "bar:X"]);
        emitter.off_all();
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_propagate_policy_unwinds_out_of_emit() {
        let emitter = Emitter::<Map>::new();
        emitter.on(TICK, |_: &()| panic!("boom"));
        emitter.emit(TICK, ());
    }

    #[test]
    fn test_propagate_policy_skips_remaining_and_removes_once() {
        let emitter = Emitter::<Map>::new();
        let seen = log();
        emitter.once(TICK, |_: &()| panic!("boom"));
        emitter.on(TICK, push(&seen, "after"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| emitter.emit(TICK, ())));
        assert!(result.is_err());
        assert!(seen.borrow().is_empty());
        assert_eq!(emitter.listener_count(TICK), 1);

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["after"]);
    }

    #[test]
    fn test_isolate_policy_continues_after_panic() {
        let emitter = Emitter::<Map>::with_config(EmitterConfig {
            failure_policy: FailurePolicy::Isolate,
            ..EmitterConfig::default()
        });
        let seen = log();
        emitter.on(TICK, push(&seen, "before"));
        emitter.on(TICK, |_: &()| panic!("boom"));
        emitter.on(TICK, push(&seen, "after"));

        assert!(emitter.emit(TICK, ()));
        assert_eq!(*seen.borrow(), vec!["before", "after"]);
    }

    #[test]
    fn test_listener_limit_warns_but_registers() {
        let emitter = Emitter::<Map>::with_config(EmitterConfig {
            max_listeners: 1,
            ..EmitterConfig::default()
        });

        let ((), logs) = with_logs(Level::WARN, || {
            emitter.on(TICK, |_: &()| {});
        });
        assert!(!logs.contains("listener limit exceeded"));

        let ((), logs) = with_logs(Level::WARN, || {
            emitter.on(TICK, |_: &()| {});
        });
        assert!(logs.contains("listener limit exceeded"), "logs: {logs}");
        assert!(logs.contains("listeners=2"), "logs: {logs}");
        assert!(logs.contains("limit=1"), "logs: {logs}");
        assert_eq!(emitter.listener_count(TICK), 2);
    }

    #[test]
    fn test_payload_mismatch_is_skipped_and_not_counted() {
        const TICK_COUNT: EventName<Map, u32> = EventName::new("tick");

        let emitter = Emitter::<Map>::new();
        let seen = log();
        emitter.on(TICK, push(&seen, "tick"));

        let (accepted, logs) = with_logs(Level::TRACE, || emitter.emit(TICK_COUNT, 1));
        assert!(accepted);
        assert!(seen.borrow().is_empty());
        assert!(logs.contains("payload type mismatch"), "logs: {logs}");
        assert!(logs.contains("delivered=0"), "logs: {logs}");

        let ((), logs) = with_logs(Level::TRACE, || {
            emitter.emit(TICK, ());
        });
        assert_eq!(*seen.borrow(), vec!["tick"]);
        assert!(logs.contains("delivered=1"), "logs: {logs}");
    }

    #[test]
    fn test_clones_share_listeners() {
        let emitter = Emitter::<Map>::new();
        let other = emitter.clone();
        let seen = log();
        other.on(TICK, push(&seen, "shared"));

        emitter.emit(TICK, ());
        assert_eq!(*seen.borrow(), vec!["shared"]);
        assert!(format!("{emitter:?}").contains("tick"));
    }
}
