//! # Reserved events: owner-only emission.
//!
//! Reserved names ([`ReservedName`]) are listened to like any other name,
//! but [`Emitter::emit`] only accepts public names. The single way to emit a
//! reserved name is [`Emitter::emit_reserved`], which demands a reference to
//! the map's [`EventMap::Owner`].
//!
//! The restriction is enforced by types plus the listener key: `emit` only
//! takes public names, and a public name redeclared with a reserved name's
//! string is a different [`EventKey`](crate::EventKey), so it reaches none
//! of the reserved listeners. There is no runtime owner check.
//!
//! ## Pattern
//! ```rust
//! mod socket {
//!     use emitvisor::{Emitter, EventMap, EventName, ReservedName};
//!
//!     pub struct SocketEvents;
//!     /// Constructible only inside `socket`.
//!     pub struct SocketOwner(());
//!
//!     impl EventMap for SocketEvents {
//!         type Owner = SocketOwner;
//!     }
//!
//!     pub const MESSAGE: EventName<SocketEvents, String> = EventName::new("message");
//!     pub const CONNECTED: ReservedName<SocketEvents, ()> = EventName::reserved("connected");
//!
//!     pub struct Socket {
//!         events: Emitter<SocketEvents>,
//!         owner: SocketOwner,
//!     }
//!
//!     impl Socket {
//!         pub fn new() -> Self {
//!             Self { events: Emitter::new(), owner: SocketOwner(()) }
//!         }
//!         pub fn events(&self) -> &Emitter<SocketEvents> {
//!             &self.events
//!         }
//!         pub fn connect(&self) {
//!             self.events.emit_reserved(&self.owner, CONNECTED, ());
//!         }
//!     }
//! }
//!
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let socket = socket::Socket::new();
//! let connected = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&connected);
//! socket.events().on(socket::CONNECTED, move |_: &()| flag.set(true));
//!
//! socket.connect();
//! assert!(connected.get());
//! ```
//!
//! Outside the owning module, emitting a reserved name does not compile:
//! ```compile_fail
//! use emitvisor::{Emitter, EventMap, EventName, ReservedName};
//!
//! struct Events;
//! impl EventMap for Events {
//!     type Owner = std::convert::Infallible;
//! }
//! const CONNECTED: ReservedName<Events, ()> = EventName::reserved("connected");
//!
//! let emitter = Emitter::<Events>::new();
//! emitter.emit(CONNECTED, ());
//! ```

use super::emitter::Emitter;
use crate::events::{EventMap, EventRecord, ReservedName};

impl<M: EventMap> Emitter<M> {
    /// Emits a reserved event; returns `false` if a listener cancelled it.
    ///
    /// The owner reference proves the caller may emit reserved events of `M`.
    pub fn emit_reserved<P: 'static>(
        &self,
        _owner: &M::Owner,
        name: ReservedName<M, P>,
        payload: P,
    ) -> bool {
        let record = EventRecord::build(name, payload).cancellable(self.config.cancellable);
        self.dispatch_record(&record);
        !record.default_prevented()
    }
}
