//! # Listener registry: per-event ordered `ListenerId → wrapper` stores.
//!
//! ## Architecture
//! ```text
//! ListenerRegistry
//!   ├─ EventKey("message")            ─► [ slot{id=1, seq=1}, slot{id=4, seq=6}, ... ]
//!   ├─ EventKey("typing")             ─► [ slot{id=2, seq=2} ]
//!   └─ EventKey("closed", reserved)   ─► [ ]
//! ```
//!
//! ## Rules
//! - Stores are keyed by [`EventKey`]: a public and a reserved name sharing
//!   one string never share listeners.
//! - One slot per `(name, id)`: registering a present id overwrites its wrapper in place.
//! - Every new slot gets a registry-wide `seq`; slots of a store are sorted by `seq`.
//! - Unknown ids are silent no-ops on removal.
//! - No `RefCell` borrow escapes a method, and removed wrappers are dropped
//!   after the borrow ends, so listeners (and their captures' `Drop`) may
//!   re-enter the registry freely.
//!
//! ## Live iteration
//! Dispatch walks a store with a `seq` cursor instead of holding a borrow:
//! ```text
//! horizon = registry.horizon()          // seq of the next slot to be created
//! cursor  = 0
//! while let Some(slot) = next_after(name, cursor, horizon) {
//!     cursor = slot.seq; call(slot.wrapper)
//! }
//! ```
//! A slot removed mid-dispatch is never reached; a slot added mid-dispatch has
//! `seq >= horizon` and waits for the next emit.

use std::any::Any;
use std::cell::{Cell, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use super::id::ListenerId;
use crate::events::EventKey;

/// Type-erased dispatch wrapper. Receives `&EventRecord<M, P>` as `&dyn Any`
/// and returns whether the listener actually ran.
pub(crate) type Wrapper = Rc<dyn Fn(&dyn Any) -> bool>;

/// One registered listener.
struct Slot {
    id: ListenerId,
    seq: u64,
    wrapper: Wrapper,
    capture: bool,
}

/// Ordered listeners of a single event name.
#[derive(Default)]
pub(crate) struct ListenerStore {
    slots: Vec<Slot>,
}

impl ListenerStore {
    fn position(&self, id: ListenerId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// Inserts or overwrites; returns the replaced wrapper, if any.
    fn upsert(&mut self, slot: Slot) -> Option<Wrapper> {
        match self.position(slot.id) {
            Some(idx) => {
                let old = &mut self.slots[idx];
                old.capture = slot.capture;
                Some(std::mem::replace(&mut old.wrapper, slot.wrapper))
            }
            None => {
                self.slots.push(slot);
                None
            }
        }
    }

    fn remove(&mut self, id: ListenerId) -> Option<Slot> {
        self.position(id).map(|idx| self.slots.remove(idx))
    }

    fn get(&self, id: ListenerId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn ids(&self) -> Vec<ListenerId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Number of listeners.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Registry of all listeners of one emitter.
pub(crate) struct ListenerRegistry {
    stores: RefCell<HashMap<EventKey, ListenerStore>>,
    next_seq: Cell<u64>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            stores: RefCell::new(HashMap::new()),
            next_seq: Cell::new(1),
            next_id: Cell::new(1),
        }
    }

    /// Hands out a fresh listener identity.
    pub(crate) fn allocate_id(&self) -> ListenerId {
        let raw = self.next_id.get();
        self.next_id.set(raw + 1);
        ListenerId::new(raw)
    }

    /// Returns the store for `key`, creating an empty one if absent.
    ///
    /// The returned borrow must be released before any listener runs.
    pub(crate) fn get_or_create(&self, key: EventKey) -> RefMut<'_, ListenerStore> {
        RefMut::map(self.stores.borrow_mut(), |stores| {
            stores.entry(key).or_default()
        })
    }

    /// Inserts `id → wrapper` for `key`, overwriting an existing mapping for `id`.
    ///
    /// Returns the number of listeners now registered for `key`.
    pub(crate) fn register(
        &self,
        key: EventKey,
        id: ListenerId,
        wrapper: Wrapper,
        capture: bool,
    ) -> usize {
        let seq = self.next_seq.get();
        let (replaced, len) = {
            let mut store = self.get_or_create(key);
            let replaced = store.upsert(Slot {
                id,
                seq,
                wrapper,
                capture,
            });
            (replaced, store.len())
        };
        if replaced.is_none() {
            self.next_seq.set(seq + 1);
        }
        drop(replaced);
        len
    }

    /// Returns the wrapper registered for `id` under `key`.
    pub(crate) fn resolve(&self, key: EventKey, id: ListenerId) -> Option<Wrapper> {
        let stores = self.stores.borrow();
        stores.get(&key)?.get(id).map(|s| Rc::clone(&s.wrapper))
    }

    /// Capture flag `id` was registered with under `key`.
    pub(crate) fn capture(&self, key: EventKey, id: ListenerId) -> Option<bool> {
        let stores = self.stores.borrow();
        stores.get(&key)?.get(id).map(|s| s.capture)
    }

    /// Removes `id` from `key`. Unknown ids are ignored.
    ///
    /// Returns `true` if a listener was removed.
    pub(crate) fn unregister(&self, key: EventKey, id: ListenerId) -> bool {
        let removed = {
            let mut stores = self.stores.borrow_mut();
            stores.get_mut(&key).and_then(|store| store.remove(id))
        };
        removed.is_some()
    }

    /// Removes every listener of `key`; returns how many were removed.
    pub(crate) fn unregister_name(&self, key: EventKey) -> usize {
        let removed = self.stores.borrow_mut().remove(&key);
        removed.map_or(0, |store| store.len())
    }

    /// Removes every listener of every name; returns how many were removed.
    pub(crate) fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.stores.borrow_mut());
        removed.values().map(ListenerStore::len).sum()
    }

    /// Listener ids of `key`, in registration order.
    pub(crate) fn list(&self, key: EventKey) -> Vec<ListenerId> {
        self.stores
            .borrow()
            .get(&key)
            .map(ListenerStore::ids)
            .unwrap_or_default()
    }

    /// Listener ids of every key that currently has listeners.
    pub(crate) fn list_all(&self) -> BTreeMap<EventKey, Vec<ListenerId>> {
        self.stores
            .borrow()
            .iter()
            .filter(|(_, store)| !store.is_empty())
            .map(|(key, store)| (*key, store.ids()))
            .collect()
    }

    /// Number of listeners of `key`.
    pub(crate) fn len(&self, key: EventKey) -> usize {
        self.stores.borrow().get(&key).map_or(0, ListenerStore::len)
    }

    /// True when no key has a listener.
    pub(crate) fn is_empty(&self) -> bool {
        self.stores.borrow().values().all(ListenerStore::is_empty)
    }

    /// `seq` the next created slot will get; slots below it exist now.
    pub(crate) fn horizon(&self) -> u64 {
        self.next_seq.get()
    }

    /// First slot of `key` with `cursor < seq < horizon`.
    pub(crate) fn next_after(
        &self,
        key: EventKey,
        cursor: u64,
        horizon: u64,
    ) -> Option<(u64, ListenerId, Wrapper)> {
        let stores = self.stores.borrow();
        let slots = &stores.get(&key)?.slots;
        let idx = slots.partition_point(|s| s.seq <= cursor);
        slots
            .get(idx)
            .filter(|s| s.seq < horizon)
            .map(|s| (s.seq, s.id, Rc::clone(&s.wrapper)))
    }
}

/// Removes `(key, id)` from the registry when dropped (or on [`detach`](Self::detach)).
///
/// Holds a `Weak` so a pending guard never keeps the emitter alive.
pub(crate) struct RegistrationGuard {
    registry: Weak<ListenerRegistry>,
    key: EventKey,
    id: ListenerId,
}

impl RegistrationGuard {
    pub(crate) fn new(registry: Weak<ListenerRegistry>, key: EventKey, id: ListenerId) -> Self {
        Self { registry, key, id }
    }

    /// Removes the listener now; later calls and the drop are no-ops.
    pub(crate) fn detach(&mut self) -> bool {
        match std::mem::take(&mut self.registry).upgrade() {
            Some(registry) => registry.unregister(self.key, self.id),
            None => false,
        }
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.detach();
    }
}
