//! # Typed event names.
//!
//! An [`EventName`] is a `&'static str` tagged with three type parameters:
//! - `M` the [`EventMap`] it belongs to (names of one map are rejected by emitters of another);
//! - `P` the payload it carries (`T`, `Option<T>` or `()` for no payload);
//! - `V` its [`Visibility`]: [`Public`] (anyone may emit) or [`Reserved`] (owner only).
//!
//! The set of `EventName` constants declared for a map *is* the map:
//! ```rust
//! use emitvisor::{EventMap, EventName, ReservedName};
//!
//! pub struct Chat;
//! pub struct ChatOwner(());
//!
//! impl EventMap for Chat {
//!     type Owner = ChatOwner;
//! }
//!
//! pub const MESSAGE: EventName<Chat, String> = EventName::new("message");
//! pub const TYPING: EventName<Chat, Option<u32>> = EventName::new("typing");
//! pub const CLOSED: ReservedName<Chat, ()> = EventName::reserved("closed");
//!
//! assert_eq!(MESSAGE.as_str(), "message");
//! assert!(CLOSED.is_reserved());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;

/// Compile-time event map.
///
/// Implemented by a marker type that the map's `EventName` constants refer to.
///
/// `Owner` is the proof required by
/// [`Emitter::emit_reserved`](crate::Emitter::emit_reserved). Make it a type
/// only the defining module can construct (e.g. a struct with a private field)
/// to keep reserved events owner-only. Maps without reserved events can use
/// [`std::convert::Infallible`].
pub trait EventMap: 'static {
    /// Capability required to emit reserved events of this map.
    type Owner;
}

/// Event names anybody holding the emitter may emit.
#[derive(Debug)]
pub enum Public {}

/// Event names only the map owner may emit.
#[derive(Debug)]
pub enum Reserved {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Public {}
    impl Sealed for super::Reserved {}
}

/// Visibility marker of an [`EventName`]: [`Public`] or [`Reserved`].
pub trait Visibility: sealed::Sealed + 'static {
    /// Whether names of this visibility are reserved.
    const RESERVED: bool;
}

impl Visibility for Public {
    const RESERVED: bool = false;
}

impl Visibility for Reserved {
    const RESERVED: bool = true;
}

/// Registry key of an event: its string plus its visibility.
///
/// A public and a reserved name sharing one string are different events;
/// listeners of one never see emits of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    name: &'static str,
    reserved: bool,
}

impl EventKey {
    pub(crate) const fn new(name: &'static str, reserved: bool) -> Self {
        Self { name, reserved }
    }

    /// Event name string.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// True for the key of a reserved name.
    #[inline]
    pub const fn is_reserved(&self) -> bool {
        self.reserved
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reserved {
            write!(f, "{} (reserved)", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

/// Typed event identifier.
pub struct EventName<M, P, V = Public> {
    name: &'static str,
    _marker: PhantomData<fn() -> (M, P, V)>,
}

/// Name of an event only the map owner may emit.
pub type ReservedName<M, P> = EventName<M, P, Reserved>;

impl<M, P> EventName<M, P, Public> {
    /// Declares a public event name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<M, P> EventName<M, P, Reserved> {
    /// Declares a reserved event name.
    ///
    /// Reserved names can be listened to like any other name, but only emitted
    /// through [`Emitter::emit_reserved`](crate::Emitter::emit_reserved).
    pub const fn reserved(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<M, P, V: Visibility> EventName<M, P, V> {
    /// Returns the string identifier.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.name
    }

    /// True for reserved names.
    #[inline]
    pub const fn is_reserved(&self) -> bool {
        V::RESERVED
    }

    /// Registry key: the string tagged with the visibility.
    #[inline]
    pub const fn key(&self) -> EventKey {
        EventKey::new(self.name, V::RESERVED)
    }
}

// Manual impls: derives would put bounds on `M`, `P` and `V`.

impl<M, P, V> Clone for EventName<M, P, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, P, V> Copy for EventName<M, P, V> {}

impl<M, P, V> PartialEq for EventName<M, P, V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<M, P, V> Eq for EventName<M, P, V> {}

impl<M, P, V> Hash for EventName<M, P, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<M, P, V> fmt::Debug for EventName<M, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventName").field(&self.name).finish()
    }
}

impl<M, P, V> fmt::Display for EventName<M, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A single name is a one-element name list, so `on(NAME, f)` and
/// `on([A, B], f)` share one signature.
impl<M, P, V> IntoIterator for EventName<M, P, V> {
    type Item = Self;
    type IntoIter = iter::Once<Self>;

    fn into_iter(self) -> Self::IntoIter {
        iter::once(self)
    }
}
