//! Listener handles and the per-call invocation view.
//!
//! A [`Listener`] wraps a shared closure. Cloning a listener is cheap and the
//! clone keeps the same [`ListenerId`], which is what the registry compares
//! when removing listeners. Two listeners built from identical closures are
//! still distinct.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ListenerError;
use crate::registry::EventRegistry;
use crate::value::Value;

/// Receiver bound to a listener at registration time.
pub type Context = Arc<dyn Any + Send + Sync>;

type Callback = dyn Fn(&Invocation<'_>) -> Result<(), ListenerError> + Send + Sync;

/// Unique identity of a listener.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Create a new random listener id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A callable registered to receive dispatched events.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Arc<Callback>,
}

impl Listener {
    /// Wrap a closure into a listener with a fresh identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::new(),
            callback: Arc::new(callback),
        }
    }

    /// Wrap an infallible closure.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&Invocation<'_>) + Send + Sync + 'static,
    {
        Self::new(move |invocation| {
            callback(invocation);
            Ok(())
        })
    }

    /// The identity shared by this listener and all of its clones.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn call(&self, invocation: &Invocation<'_>) -> Result<(), ListenerError> {
        (self.callback)(invocation)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish_non_exhaustive()
    }
}

/// What a listener sees when it is invoked.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    registry: &'a EventRegistry,
    event: &'a str,
    args: &'a [Value],
    context: Option<&'a Context>,
}

impl<'a> Invocation<'a> {
    pub(crate) const fn new(
        registry: &'a EventRegistry,
        event: &'a str,
        args: &'a [Value],
        context: Option<&'a Context>,
    ) -> Self {
        Self {
            registry,
            event,
            args,
            context,
        }
    }

    /// The registry performing the dispatch.
    ///
    /// Listeners may register, remove or dispatch through it. Registrations
    /// made here take effect from the next dispatch round.
    #[must_use]
    pub const fn registry(&self) -> &'a EventRegistry {
        self.registry
    }

    /// Name of the event being dispatched.
    #[must_use]
    pub const fn event(&self) -> &'a str {
        self.event
    }

    /// Positional arguments, exactly as passed to dispatch.
    #[must_use]
    pub const fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Argument at `index`, if present.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// The bound context downcast to `T`.
    ///
    /// Returns `None` when no context was bound or it has a different type.
    #[must_use]
    pub fn context<T: Any>(&self) -> Option<&'a T> {
        self.context.and_then(|ctx| (**ctx).downcast_ref::<T>())
    }

    /// The bound context without downcasting.
    #[must_use]
    pub const fn raw_context(&self) -> Option<&'a Context> {
        self.context
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("event", &self.event)
            .field("args", &self.args)
            .field("has_context", &self.context.is_some())
            .finish_non_exhaustive()
    }
}
