use std::fmt;

use crate::listener::{Context, Listener};

/// A registration record: the listener plus its per-registration settings.
///
/// The listener value itself is never tagged; registering the same listener
/// twice with different settings yields two independent entries.
#[derive(Clone)]
pub struct ListenerEntry {
    pub(crate) seq: u64,
    listener: Listener,
    context: Option<Context>,
    once: bool,
}

impl ListenerEntry {
    pub(crate) const fn new(seq: u64, listener: Listener, context: Option<Context>, once: bool) -> Self {
        Self {
            seq,
            listener,
            context,
            once,
        }
    }

    /// The registered listener.
    #[must_use]
    pub const fn listener(&self) -> &Listener {
        &self.listener
    }

    /// The receiver bound at registration, if any.
    #[must_use]
    pub const fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Whether the entry is removed on its first invocation.
    #[must_use]
    pub const fn is_once(&self) -> bool {
        self.once
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("listener", &self.listener.id())
            .field("has_context", &self.context.is_some())
            .field("once", &self.once)
            .finish()
    }
}
