//! # Pull: await the next occurrence of an event.
//!
//! [`Emitter::pull`] registers a once-listener *immediately* and returns a
//! [`Pull`] future that resolves with a clone of the next payload.
//!
//! ## Race
//! ```text
//! pull(name, Some(t))
//!   ├─► once-listener ──► oneshot::Sender ─┐
//!   └─► deadline = now + t                 │
//!                                          ▼
//!                     Pull::poll: rx ready?  ──► Ok(payload)        (listener already gone)
//!                                 rx closed? ──► Err(Detached)      (listener dropped unfired)
//!                                 deadline?  ──► Err(Timeout)       (listener removed now)
//! ```
//!
//! ## Rules
//! - The event wins a tie: the channel is checked before the deadline.
//! - A timed-out pull leaves no listener behind.
//! - Dropping an unresolved `Pull` removes its listener.
//! - Concurrent pulls on one name are independent; each consumes its own occurrence.
//! - A deadline needs a Tokio runtime with the time driver enabled.

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{self, Instant, Sleep};
use tracing::debug;

use super::emitter::Emitter;
use crate::error::EmitterError;
use crate::events::{EventMap, EventName, EventRecord, ListenerOptions, Visibility};
use crate::listeners::registry::RegistrationGuard;

impl<M: EventMap> Emitter<M> {
    /// Waits for the next occurrence of `name`.
    ///
    /// - `timeout = None` waits without bound.
    /// - `timeout = Some(t)` fails with [`EmitterError::Timeout`] if nothing is emitted within `t`.
    ///
    /// The listener is in place as soon as this returns, so an emit that
    /// happens before the future is first polled is not missed.
    ///
    /// ## Example
    /// ```rust
    /// use std::time::Duration;
    /// use emitvisor::{Emitter, EventMap, EventName};
    ///
    /// struct Net;
    /// impl EventMap for Net {
    ///     type Owner = ();
    /// }
    /// const READY: EventName<Net, u16> = EventName::new("ready");
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let emitter = Emitter::<Net>::new();
    ///     let port = emitter.pull(READY, Some(Duration::from_secs(1)));
    ///     emitter.emit(READY, 8080);
    ///     assert_eq!(port.await, Ok(8080));
    /// }
    /// ```
    pub fn pull<P, V>(&self, name: EventName<M, P, V>, timeout: Option<Duration>) -> Pull<P>
    where
        P: Clone + 'static,
        V: Visibility,
    {
        let (tx, rx) = oneshot::channel();
        let tx = Cell::new(Some(tx));
        let id = self.add_event_listener(
            name,
            move |ev: &EventRecord<M, P>| {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(ev.payload().clone());
                }
            },
            ListenerOptions::once(),
        );

        let event = name.as_str();
        Pull {
            event,
            rx,
            timeout,
            deadline: timeout.and_then(|t| Instant::now().checked_add(t)),
            sleep: None,
            guard: RegistrationGuard::new(Rc::downgrade(&self.registry), name.key(), id),
        }
    }
}

/// Future returned by [`Emitter::pull`].
#[must_use = "futures do nothing unless polled; dropping a Pull removes its listener"]
pub struct Pull<P> {
    event: &'static str,
    rx: oneshot::Receiver<P>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    sleep: Option<Pin<Box<Sleep>>>,
    guard: RegistrationGuard,
}

impl<P> Pull<P> {
    /// Name of the awaited event.
    pub fn event(&self) -> &'static str {
        self.event
    }
}

// No field is structurally pinned.
impl<P> Unpin for Pull<P> {}

impl<P> Future for Pull<P> {
    type Output = Result<P, EmitterError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(payload)) => {
                debug!(event = this.event, "pull resolved");
                return Poll::Ready(Ok(payload));
            }
            Poll::Ready(Err(_)) => {
                debug!(event = this.event, "pull detached");
                return Poll::Ready(Err(EmitterError::Detached { event: this.event }));
            }
            Poll::Pending => {}
        }

        let (Some(deadline), Some(timeout)) = (this.deadline, this.timeout) else {
            return Poll::Pending;
        };
        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(time::sleep_until(deadline)));

        match sleep.as_mut().poll(cx) {
            Poll::Ready(()) => {
                this.guard.detach();
                debug!(event = this.event, ?timeout, "pull timed out");
                Poll::Ready(Err(EmitterError::Timeout {
                    event: this.event,
                    timeout,
                }))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<P> fmt::Debug for Pull<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pull")
            .field("event", &self.event)
            .field("timeout", &self.timeout)
            .finish()
    }
}
