//! Error types for evemit.
//!
//! Registry operations are infallible apart from dispatch (a listener may
//! fail) and configuration parsing. Both failure paths are strongly typed
//! using thiserror.

use thiserror::Error;

/// Error returned by a listener body.
///
/// Boxed so that listeners can propagate any error type with `?`.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for evemit.
#[derive(Debug, Error)]
pub enum EventError {
    /// A listener failed while an event was being dispatched.
    ///
    /// The remainder of the dispatch round was not delivered.
    #[error("Listener #{position} for event '{event}' failed: {source}")]
    Listener {
        /// Name of the event being dispatched.
        event: String,
        /// Index of the failing listener within the round.
        position: usize,
        /// The error returned by the listener.
        #[source]
        source: ListenerError,
    },

    /// Registry configuration could not be parsed.
    #[error("Invalid registry configuration: {message}")]
    Config {
        /// Parser diagnostic.
        message: String,
    },
}

impl EventError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this error came from a listener.
    #[must_use]
    pub const fn is_listener(&self) -> bool {
        matches!(self, Self::Listener { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Name of the event whose dispatch failed, if any.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Listener { event, .. } => Some(event),
            Self::Config { .. } => None,
        }
    }

    /// Consumes the error and returns the listener's own error, if any.
    #[must_use]
    pub fn into_listener_error(self) -> Option<ListenerError> {
        match self {
            Self::Listener { source, .. } => Some(source),
            Self::Config { .. } => None,
        }
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Result type alias for evemit operations.
pub type EventResult<T> = Result<T, EventError>;
