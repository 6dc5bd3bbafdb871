/// Registration options for `add_event_listener` / `on_with`.
///
/// - `once`: the listener removes itself right after its first invocation.
/// - `capture`: stored with the listener for parity with DOM-style targets and readable
///   through `Emitter::listener_capture`; it does not change delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Fire at most once.
    pub once: bool,
    /// Capture-phase flag, passed through.
    pub capture: bool,
}

impl ListenerOptions {
    /// Options with `once = true`.
    pub const fn once() -> Self {
        Self {
            once: true,
            capture: false,
        }
    }

    /// Sets the capture flag.
    #[must_use]
    pub const fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }
}
