//! # Socket Example
//!
//! A fake socket that owns its emitter. Callers can listen to every event
//! and emit `message`, but only the socket itself can emit the reserved
//! `connected` / `closed` events.
//!
//! ## Run
//! ```bash
//! RUST_LOG=emitvisor=trace cargo run --example socket
//! ```

use std::time::Duration;

use emitvisor::{Emitter, EmitterError, EventRecord, ListenerOptions};
use tracing_subscriber::EnvFilter;

mod socket {
    use emitvisor::{Emitter, EventMap, EventName, ReservedName};

    pub struct SocketEvents;

    /// Only this module can build one, so only `Socket` emits reserved events.
    pub struct SocketOwner(());

    impl EventMap for SocketEvents {
        type Owner = SocketOwner;
    }

    pub const MESSAGE: EventName<SocketEvents, String> = EventName::new("message");
    pub const CONNECTED: ReservedName<SocketEvents, u16> = EventName::reserved("connected");
    pub const CLOSED: ReservedName<SocketEvents, Option<String>> = EventName::reserved("closed");

    pub struct Socket {
        events: Emitter<SocketEvents>,
        owner: SocketOwner,
    }

    impl Socket {
        pub fn new() -> Self {
            Self {
                events: Emitter::new(),
                owner: SocketOwner(()),
            }
        }

        pub fn events(&self) -> &Emitter<SocketEvents> {
            &self.events
        }

        pub fn connect(&self, port: u16) {
            self.events.emit_reserved(&self.owner, CONNECTED, port);
        }

        pub fn close(&self, reason: Option<&str>) {
            self.events
                .emit_reserved(&self.owner, CLOSED, reason.map(str::to_string));
            self.events.off_all();
        }
    }
}

use socket::{CLOSED, CONNECTED, MESSAGE, Socket, SocketEvents};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EmitterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let socket = Socket::new();
    let events: &Emitter<SocketEvents> = socket.events();

    events.once(CONNECTED, |port: &u16| println!("[connected] port={port}"));
    let printer = events.on(MESSAGE, |text: &String| println!("[message] {text}"));
    events.add_event_listener(
        CLOSED,
        |ev: &EventRecord<SocketEvents, Option<String>>| {
            println!("[{}] reason={:?}", ev.name(), ev.payload());
        },
        ListenerOptions::default(),
    );

    let connected = events.pull(CONNECTED, Some(Duration::from_secs(1)));
    socket.connect(9000);
    println!("pulled port {}", connected.await?);

    events.emit(MESSAGE, "hello".to_string());
    events.off_listener(MESSAGE, printer);
    events.emit(MESSAGE, "unheard".to_string());

    match events.pull(MESSAGE, Some(Duration::from_millis(50))).await {
        Err(err) => println!("[{}] {}", err.as_label(), err),
        Ok(text) => println!("unexpected message {text}"),
    }

    socket.close(Some("bye"));
    println!("listeners after close: {:?}", events.all_listeners());
    Ok(())
}
