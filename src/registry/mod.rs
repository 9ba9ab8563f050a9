//! The event registry: registration, removal, dispatch and introspection.
//!
//! Every method takes `&self`. The internal lock is released before any
//! listener runs, so listeners can call back into the registry while a
//! dispatch is in progress. Each dispatch round walks a snapshot of the
//! event's entries taken when the round starts.

/// Registry configuration.
pub mod config;
/// Registration records.
pub mod entry;

use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::error::{EventError, EventResult, ListenerError};
use crate::listener::{Context, Invocation, Listener};
use crate::value::Value;

pub use config::RegistryConfig;
pub use entry::ListenerEntry;

#[derive(Debug, Default)]
struct RegistryState {
    events: BTreeMap<String, Vec<ListenerEntry>>,
    next_seq: u64,
    warned: HashSet<String>,
}

impl RegistryState {
    /// Keep the entries matching `keep` and drop the event once it is empty.
    fn retain(&mut self, event: &str, mut keep: impl FnMut(&ListenerEntry) -> bool) -> usize {
        let Some(entries) = self.events.get_mut(event) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|entry| keep(entry));
        let removed = before - entries.len();
        if entries.is_empty() {
            self.events.remove(event);
            self.warned.remove(event);
        }
        removed
    }
}

/// Named-event listener registry with synchronous dispatch.
///
/// # Examples
///
/// ```
/// use evemit::{args, EventRegistry};
///
/// let registry = EventRegistry::new();
/// let greet = registry.on("greet", |inv| {
///     assert_eq!(inv.arg(0).and_then(|v| v.as_string()), Some("world"));
///     Ok(())
/// });
///
/// assert!(registry.dispatch("greet", &args!["world"])?);
/// registry.remove("greet", &greet);
/// assert!(!registry.dispatch("greet", &args!["world"])?);
/// # Ok::<(), evemit::EventError>(())
/// ```
#[derive(Debug, Default)]
pub struct EventRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl EventRegistry {
    /// Create an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn label(&self) -> &str {
        self.config.label.as_deref().unwrap_or("evemit")
    }

    // The lock is never held while user code runs, so a poisoned lock still
    // guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: &str, listener: Listener, context: Option<Context>, once: bool) -> &Self {
        let (count, leak) = {
            let mut state = self.lock();
            let seq = state.next_seq;
            state.next_seq += 1;

            let entries = state.events.entry(event.to_string()).or_default();
            entries.push(ListenerEntry::new(seq, listener, context, once));
            let count = entries.len();
            let leak = self.config.exceeds_limit(count) && state.warned.insert(event.to_string());
            (count, leak)
        };

        trace!(
            registry = self.label(),
            event,
            once,
            count,
            "listener registered"
        );

        if leak {
            warn!(
                registry = self.label(),
                event,
                count,
                max_listeners = self.config.max_listeners,
                "possible listener leak: event has more listeners than the configured maximum"
            );
        }
        self
    }

    /// Register `listener` for `event`.
    ///
    /// Registering the same listener again adds an independent entry.
    pub fn register(&self, event: &str, listener: Listener) -> &Self {
        self.push(event, listener, None, false)
    }

    /// Register `listener` for `event`, invoked with `context` bound.
    pub fn register_with_context<T>(&self, event: &str, listener: Listener, context: Arc<T>) -> &Self
    where
        T: Any + Send + Sync,
    {
        let context: Context = context;
        self.push(event, listener, Some(context), false)
    }

    /// Register `listener` for a single invocation.
    ///
    /// The entry is removed right before it runs, so a listener that
    /// dispatches its own event again is not re-invoked.
    pub fn register_once(&self, event: &str, listener: Listener) -> &Self {
        self.push(event, listener, None, true)
    }

    /// One-shot variant of [`register_with_context`](Self::register_with_context).
    pub fn register_once_with_context<T>(&self, event: &str, listener: Listener, context: Arc<T>) -> &Self
    where
        T: Any + Send + Sync,
    {
        let context: Context = context;
        self.push(event, listener, Some(context), true)
    }

    /// Wrap `callback` into a new listener, register it and return it.
    pub fn on<F>(&self, event: &str, callback: F) -> Listener
    where
        F: Fn(&Invocation<'_>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.register(event, listener.clone());
        listener
    }

    /// Wrap `callback` into a new one-shot listener, register it and return it.
    pub fn once<F>(&self, event: &str, callback: F) -> Listener
    where
        F: Fn(&Invocation<'_>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.register_once(event, listener.clone());
        listener
    }

    /// Remove every entry for `event` whose listener is `listener`.
    ///
    /// Other entries keep their relative order. Unknown events are ignored.
    pub fn remove(&self, event: &str, listener: &Listener) -> &Self {
        let removed = self.lock().retain(event, |entry| entry.listener() != listener);
        trace!(registry = self.label(), event, removed, "listener removed");
        self
    }

    /// Remove every entry for `event`.
    pub fn clear(&self, event: &str) -> &Self {
        let removed = {
            let mut state = self.lock();
            state.warned.remove(event);
            state.events.remove(event).map_or(0, |entries| entries.len())
        };
        trace!(registry = self.label(), event, removed, "event cleared");
        self
    }

    /// Remove every entry for every event.
    pub fn clear_all(&self) -> &Self {
        {
            let mut state = self.lock();
            state.events.clear();
            state.warned.clear();
        }
        trace!(registry = self.label(), "registry cleared");
        self
    }

    /// Invoke every listener registered for `event`, in registration order.
    ///
    /// Returns `Ok(false)` if nothing is registered for `event`, otherwise
    /// `Ok(true)`. The first listener error aborts the round and is returned
    /// as [`EventError::Listener`]; listeners after it are not invoked.
    ///
    /// Listeners registered during the round first run on the next dispatch.
    /// A one-shot entry already consumed by a nested dispatch, or removed
    /// earlier in the round, is skipped.
    pub fn dispatch(&self, event: &str, args: &[Value]) -> EventResult<bool> {
        let snapshot = {
            let state = self.lock();
            match state.events.get(event) {
                Some(entries) => entries.clone(),
                None => {
                    trace!(registry = self.label(), event, "dispatch without listeners");
                    return Ok(false);
                }
            }
        };

        trace!(
            registry = self.label(),
            event,
            listeners = snapshot.len(),
            args = args.len(),
            "dispatching"
        );

        for (position, entry) in snapshot.iter().enumerate() {
            if entry.is_once() && !self.consume(event, entry.seq) {
                continue;
            }

            let invocation = Invocation::new(self, event, args, entry.context());
            if let Err(source) = entry.listener().call(&invocation) {
                debug!(
                    registry = self.label(),
                    event,
                    position,
                    error = %source,
                    "listener failed, aborting dispatch"
                );
                return Err(EventError::Listener {
                    event: event.to_string(),
                    position,
                    source,
                });
            }
        }

        Ok(true)
    }

    /// Detach the one-shot entry `seq`. Returns false if it is already gone.
    fn consume(&self, event: &str, seq: u64) -> bool {
        let consumed = self.lock().retain(event, |entry| entry.seq != seq) > 0;
        if consumed {
            debug!(registry = self.label(), event, "one-shot listener consumed");
        }
        consumed
    }

    /// Listeners registered for `event`, in registration order.
    ///
    /// The result is a copy; modifying it does not affect the registry.
    #[must_use]
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.lock()
            .events
            .get(event)
            .map(|entries| entries.iter().map(|e| e.listener().clone()).collect())
            .unwrap_or_default()
    }

    /// Every registered listener across all events.
    ///
    /// Events are visited in lexicographic order of their names; within an
    /// event, listeners appear in registration order.
    #[must_use]
    pub fn all_listeners(&self) -> Vec<Listener> {
        self.lock()
            .events
            .values()
            .flat_map(|entries| entries.iter().map(|e| e.listener().clone()))
            .collect()
    }

    /// Registration records for `event`, including one-shot flags and contexts.
    #[must_use]
    pub fn entries(&self, event: &str) -> Vec<ListenerEntry> {
        self.lock().events.get(event).cloned().unwrap_or_default()
    }

    /// Snapshot of the whole event map.
    #[must_use]
    pub fn events(&self) -> BTreeMap<String, Vec<Listener>> {
        self.lock()
            .events
            .iter()
            .map(|(name, entries)| {
                (
                    name.clone(),
                    entries.iter().map(|e| e.listener().clone()).collect(),
                )
            })
            .collect()
    }

    /// Names of events that currently have listeners.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.lock().events.keys().cloned().collect()
    }

    /// Number of entries registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.lock().events.get(event).map_or(0, Vec::len)
    }

    /// Whether anything is registered for `event`.
    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.lock().events.contains_key(event)
    }
}
