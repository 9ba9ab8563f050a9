use serde::{Deserialize, Serialize};

use crate::error::EventResult;

/// Default leak-detection threshold per event name.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Tuning knobs for an [`EventRegistry`](super::EventRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Name attached to the registry's log events.
    pub label: Option<String>,
    /// Listener count per event above which a warning is logged once.
    /// Zero disables the check.
    pub max_listeners: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            label: None,
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> EventResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Set the log label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the leak-detection threshold.
    #[must_use]
    pub const fn with_max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    pub(crate) fn exceeds_limit(&self, count: usize) -> bool {
        self.max_listeners != 0 && count > self.max_listeners
    }
}
