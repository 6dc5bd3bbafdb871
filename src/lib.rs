//! # emitvisor
//!
//! **emitvisor** is a typed, single-threaded publish/subscribe event emitter.
//!
//! It provides typed listener registration and removal, one-shot listeners,
//! awaiting the next occurrence of an event (`pull`, optionally with a
//! deadline), and a two-tier event space: *public* events anybody holding the
//! emitter may emit, and *reserved* events only the owner of the event map may
//! emit.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   EventName<M, P, V>  (typed constants: map M, payload P, visibility V)
//!          │
//!          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Emitter<M>                                                       │
//! │  - on / once / on_with / subscribe   (Fn(&P), adapted)            │
//! │  - add_event_listener                (Fn(&EventRecord<M, P>))     │
//! │  - off_all / off / off_listener / remove_event_listener           │
//! │  - emit / dispatch / publish / dispatch_event   (public names)    │
//! │  - emit_reserved(&M::Owner, ..)                 (reserved names)  │
//! │  - pull(name, timeout) ──► Pull<P> future                         │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ListenerRegistry                                                 │
//! │  EventKey ─► [ (ListenerId, wrapper), ... ]   (registration order)│
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Dispatch
//! ```text
//! emit(name, payload)
//!   ├─► build EventRecord { name, payload, cancellable }
//!   ├─► for each listener of `name` present when the emit started:
//!   │       ├─ skipped if removed meanwhile
//!   │       ├─ call wrapper(&record)            (synchronously, in order)
//!   │       └─ once? → removed right after the call
//!   └─► return !record.default_prevented()
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                                   |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Event map**     | Compile-time name → payload map, public/reserved split   | [`EventMap`], [`EventName`], [`ReservedName`] |
//! | **Listeners**     | Register by name or name list, remove by id              | [`Emitter`], [`ListenerId`], [`ListenerOptions`] |
//! | **Records**       | Full-event view with optional cancellation               | [`EventRecord`]                             |
//! | **Awaiting**      | Next occurrence as a future, optional deadline           | [`Pull`], [`EmitterError`]                  |
//! | **Subscriptions** | Registration with a cancellation handle                  | [`Subscription`]                            |
//! | **Configuration** | Failure policy, listener limit, cancellable records      | [`EmitterConfig`], [`FailurePolicy`]        |
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use emitvisor::{Emitter, EventMap, EventName};
//!
//! struct Chat;
//! impl EventMap for Chat {
//!     type Owner = std::convert::Infallible;
//! }
//!
//! const MESSAGE: EventName<Chat, String> = EventName::new("message");
//! const JOINED: EventName<Chat, Option<String>> = EventName::new("joined");
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let chat = Emitter::<Chat>::new();
//!
//!     let log = Rc::new(RefCell::new(Vec::new()));
//!     let sink = Rc::clone(&log);
//!     let id = chat.on(MESSAGE, move |text: &String| sink.borrow_mut().push(text.clone()));
//!
//!     chat.emit(MESSAGE, "hello".to_string());
//!     chat.off_listener(MESSAGE, id);
//!     chat.emit(MESSAGE, "nobody listens".to_string());
//!     assert_eq!(*log.borrow(), vec!["hello".to_string()]);
//!
//!     let joined = chat.pull(JOINED, Some(Duration::from_secs(1)));
//!     chat.emit(JOINED, Some("ana".to_string()));
//!     assert_eq!(joined.await?, Some("ana".to_string()));
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use config::{EmitterConfig, FailurePolicy};
pub use self::core::{Emitter, Pull, Subscription};
pub use error::EmitterError;
pub use events::{
    EventKey, EventMap, EventName, EventRecord, ListenerOptions, Public, Reserved, ReservedName,
    Visibility,
};
pub use listeners::ListenerId;
