use std::fmt;

/// Opaque listener identity returned by every registration call.
///
/// The same id is used to remove the listener later. Ids are unique per
/// emitter; an `on([A, B], f)` call shares one id across `A` and `B`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, useful as a log field.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}
