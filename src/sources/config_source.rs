//! Settings source trait.

use crate::core::Settings;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// Trait for settings sources.
///
/// Implement this trait to back the settings store with the host's own
/// option storage (a database table, a key-value service, ...).
pub trait ConfigSource: Send + Sync {
    /// Load settings as a raw key-value map.
    ///
    /// The returned map will be merged with other sources according to precedence rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Environment variables: 300
    /// - Persisted settings file: 200
    /// - Default file: 100
    fn priority(&self) -> i32 {
        100
    }

    /// Whether [`persist`](Self::persist) is supported.
    fn is_writable(&self) -> bool {
        false
    }

    /// Write settings back to the source.
    ///
    /// # Errors
    ///
    /// Read-only sources return [`ConfigError::ReadOnlySource`].
    fn persist(&self, _settings: &Settings) -> Result<()> {
        Err(ConfigError::ReadOnlySource(self.name()))
    }
}
