//! In-process settings source.

use super::ConfigSource;
use crate::core::Settings;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Writable settings source held in memory.
///
/// Stands in for the host's option storage when the host keeps settings
/// itself, and in tests.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::core::Settings;
/// use pubindex_notifier::sources::{ConfigSource, MemorySource};
///
/// let source = MemorySource::new("options");
/// source.persist(&Settings::with_api_key("abc123")).unwrap();
/// assert_eq!(source.load().unwrap().len(), 3);
/// ```
pub struct MemorySource {
    label: String,
    priority: i32,
    values: RwLock<HashMap<String, config::Value>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            priority: 200,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Create a source pre-populated with `settings`.
    pub fn with_settings(label: impl Into<String>, settings: &Settings) -> Self {
        let source = Self::new(label);
        *source.values.write() = settings.to_values();
        source
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set a single raw value, as the host's option API would.
    pub fn set(&self, key: impl Into<String>, value: impl Into<config::Value>) {
        self.values.write().insert(key.into(), value.into());
    }
}

impl ConfigSource for MemorySource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        Ok(self.values.read().clone())
    }

    fn name(&self) -> String {
        format!("memory:{}", self.label)
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        *self.values.write() = settings.to_values();
        Ok(())
    }
}
