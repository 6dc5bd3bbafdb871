//! Event data model: names, records and listener options.
//!
//! ## Contents
//! - [`EventName`], [`ReservedName`], [`EventMap`] typed identifiers and the map they belong to
//! - [`Public`], [`Reserved`], [`Visibility`] who may emit a name
//! - [`EventKey`] name plus visibility, the key listeners are stored under
//! - [`EventRecord`] `{name, payload, cancellable}` built per emit
//! - [`ListenerOptions`] `{once, capture}`

mod name;
mod options;
mod record;

pub use name::{EventKey, EventMap, EventName, Public, Reserved, ReservedName, Visibility};
pub use options::ListenerOptions;
pub use record::EventRecord;
