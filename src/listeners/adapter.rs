//! # Payload adapter and wrapper builders.
//!
//! Listeners come in two shapes:
//! - payload-only `Fn(&P)` (used by `on`/`once`/`subscribe`/`pull`)
//! - full-event `Fn(&EventRecord<M, P>)` (used by `add_event_listener`)
//!
//! The registry stores neither; it stores a type-erased [`Wrapper`]:
//! ```text
//! Fn(&P) ──adapt──► Fn(&EventRecord<M, P>) ──erase──► Wrapper ──once?──► Wrapper
//! ```
//!
//! A wrapper returns `true` only when the user listener actually ran.

use std::any::{Any, type_name};
use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::warn;

use super::id::ListenerId;
use super::registry::{ListenerRegistry, RegistrationGuard, Wrapper};
use crate::events::{EventKey, EventRecord};

/// Turns a payload-only callback into a full-event callback.
///
/// `adapt(f)(ev)` calls `f(ev.payload())`.
pub(crate) fn adapt<M, P, F>(f: Rc<F>) -> impl Fn(&EventRecord<M, P>) + 'static
where
    F: Fn(&P) + ?Sized + 'static,
    M: 'static,
    P: 'static,
{
    move |ev: &EventRecord<M, P>| f(ev.payload())
}

/// Type-erases a full-event callback for the registry.
///
/// Records of another concrete type (two declarations sharing one name string
/// with different payloads) are skipped with a warning.
pub(crate) fn erase<M, P, F>(key: EventKey, f: F) -> Wrapper
where
    F: Fn(&EventRecord<M, P>) + 'static,
    M: 'static,
    P: 'static,
{
    Rc::new(move |ev: &dyn Any| match ev.downcast_ref::<EventRecord<M, P>>() {
        Some(ev) => {
            f(ev);
            true
        }
        None => {
            warn!(
                event = %key,
                expected = type_name::<P>(),
                "payload type mismatch; listener skipped"
            );
            false
        }
    })
}

/// Makes `inner` fire at most once.
///
/// The `(key, id)` registration is removed as soon as the single invocation
/// returns or unwinds. Re-entrant dispatches during that invocation see the
/// wrapper as spent and skip it.
pub(crate) fn once(
    registry: Weak<ListenerRegistry>,
    key: EventKey,
    id: ListenerId,
    inner: Wrapper,
) -> Wrapper {
    let fired = Cell::new(false);
    Rc::new(move |ev: &dyn Any| {
        if fired.replace(true) {
            return false;
        }
        let _detach = RegistrationGuard::new(registry.clone(), key, id);
        inner(ev)
    })
}
