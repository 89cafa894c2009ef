//! Settings loader that merges multiple sources.

use crate::error::{ConfigError, Result};
use crate::sources::ConfigSource;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Key the trigger mode is persisted under.
const TRIGGER_MODE_KEY: &str = "ping_options";
/// Older name for the trigger mode, still accepted on input.
const LEGACY_TRIGGER_MODE_KEY: &str = "trigger_mode";

/// Loads and merges settings from multiple sources.
///
/// The loader handles precedence by sorting sources by priority and merging them
/// in order (lower priority first, higher priority sources override).
pub struct ConfigLoader {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl ConfigLoader {
    /// Create a new settings loader.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a settings source.
    pub fn add_source(&mut self, source: Arc<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Whether no sources have been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load and merge settings from all sources.
    ///
    /// Sources are merged in priority order (lowest to highest), so higher priority
    /// sources override values from lower priority sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources were added
    /// - Any source fails to load
    /// - Deserialization fails
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.sources.is_empty() {
            return Err(ConfigError::LoadError(
                "No settings sources specified".to_string(),
            ));
        }

        let mut builder = config::Config::builder();

        for source in self.sorted() {
            let values = source.load().map_err(|e| {
                ConfigError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            for (key, value) in canonical_keys(values) {
                builder = builder.set_override(&key, value).map_err(|e| {
                    ConfigError::LoadError(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to build settings: {}", e)))?;

        config
            .try_deserialize::<T>()
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted().iter().map(|s| s.name()).collect()
    }

    fn sorted(&self) -> Vec<&Arc<dyn ConfigSource>> {
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());
        sorted_sources
    }
}

/// Rename legacy keys within one source so layers using different names
/// for the same field override each other instead of colliding.
fn canonical_keys(mut values: HashMap<String, config::Value>) -> HashMap<String, config::Value> {
    if let Some(value) = values.remove(LEGACY_TRIGGER_MODE_KEY) {
        values.entry(TRIGGER_MODE_KEY.to_string()).or_insert(value);
    }
    values
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Settings, TriggerMode};
    use crate::sources::MemorySource;

    fn memory(name: &str, priority: i32) -> MemorySource {
        MemorySource::new(name).with_priority(priority)
    }

    #[test]
    fn test_empty_loader() {
        let loader = ConfigLoader::new();
        assert!(loader.is_empty());
        let result: Result<Settings> = loader.load();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut loader = ConfigLoader::new();
        let source = memory("options", 100);
        source.set("api_key", "abc123");
        loader.add_source(Arc::new(source));

        let settings: Settings = loader.load().unwrap();
        assert_eq!(settings.api_key, "abc123");
        assert!(settings.is_selected("post"));
        assert_eq!(settings.trigger_mode, TriggerMode::Publish);
    }

    #[test]
    fn test_precedence() {
        let mut loader = ConfigLoader::new();

        let defaults = memory("defaults", 100);
        defaults.set("api_key", "from-defaults");
        defaults.set("ping_options", "both");

        let overrides = memory("overrides", 300);
        overrides.set("api_key", "from-overrides");

        loader.add_source(Arc::new(overrides));
        loader.add_source(Arc::new(defaults));

        let settings: Settings = loader.load().unwrap();
        assert_eq!(settings.api_key, "from-overrides");
        assert_eq!(settings.trigger_mode, TriggerMode::Both);
    }

    #[test]
    fn test_comma_separated_content_types() {
        let mut loader = ConfigLoader::new();
        let source = memory("env-like", 300);
        source.set("content_types", "post, page");
        loader.add_source(Arc::new(source));

        let settings: Settings = loader.load().unwrap();
        assert!(settings.is_selected("post"));
        assert!(settings.is_selected("page"));
    }

    #[test]
    fn test_trigger_mode_alias() {
        let mut loader = ConfigLoader::new();
        let source = memory("legacy", 100);
        source.set("trigger_mode", "both");
        loader.add_source(Arc::new(source));

        let settings: Settings = loader.load().unwrap();
        assert_eq!(settings.trigger_mode, TriggerMode::Both);
    }

    #[test]
    fn test_mixed_trigger_mode_keys_follow_priority() {
        let mut loader = ConfigLoader::new();

        let saved = memory("saved", 200);
        saved.set("ping_options", "publish");
        let legacy = memory("legacy", 300);
        legacy.set("trigger_mode", "both");

        loader.add_source(Arc::new(saved));
        loader.add_source(Arc::new(legacy));

        let settings: Settings = loader.load().unwrap();
        assert_eq!(settings.trigger_mode, TriggerMode::Both);
    }

    #[test]
    fn test_mixed_trigger_mode_keys_lower_legacy_loses() {
        let mut loader = ConfigLoader::new();

        let legacy = memory("legacy", 100);
        legacy.set("trigger_mode", "both");
        let saved = memory("saved", 200);
        saved.set("ping_options", "publish");

        loader.add_source(Arc::new(legacy));
        loader.add_source(Arc::new(saved));

        let settings: Settings = loader.load().unwrap();
        assert_eq!(settings.trigger_mode, TriggerMode::Publish);
    }

    #[test]
    fn test_canonical_key_wins_within_one_source() {
        let values = HashMap::from([
            ("trigger_mode".to_string(), config::Value::from("both")),
            ("ping_options".to_string(), config::Value::from("publish")),
        ]);

        let values = canonical_keys(values);
        assert_eq!(values.len(), 1);
        assert_eq!(
            values["ping_options"].clone().into_string().unwrap(),
            "publish"
        );
    }

    #[test]
    fn test_deserialization_error_message_is_not_repeated() {
        let mut loader = ConfigLoader::new();
        let source = memory("broken", 100);
        source.set("api_key", vec![1i64, 2]);
        loader.add_source(Arc::new(source));

        let err = loader.load::<Settings>().unwrap_err();
        assert!(matches!(err, ConfigError::DeserializationError(_)));
        assert_eq!(
            err.to_string().matches("Failed to deserialize settings").count(),
            1
        );
    }

    #[test]
    fn test_source_names() {
        let mut loader = ConfigLoader::new();
        loader.add_source(Arc::new(memory("source1", 100)));
        loader.add_source(Arc::new(memory("source2", 200)));
        loader.add_source(Arc::new(memory("source3", 50)));

        let names = loader.source_names();
        assert_eq!(
            names,
            vec!["memory:source3", "memory:source1", "memory:source2"]
        );
    }
}
