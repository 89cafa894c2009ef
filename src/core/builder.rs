//! Builder for constructing SettingsStore instances.

use crate::core::store::Validator;
use crate::core::{ConfigLoader, ContentTypeRegistry, Settings, SettingsStore, Validate};
use crate::error::{ConfigError, Result, ValidationError};
use crate::sources::{ConfigSource, EnvSource, FileSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for constructing a `SettingsStore`.
///
/// Provides a fluent interface for layering settings sources and choosing
/// where settings form submissions are saved.
///
/// # Examples
///
/// ```rust,no_run
/// use pubindex_notifier::prelude::*;
///
/// # fn example() -> Result<()> {
/// let store = SettingsStore::builder()
///     .with_file("config/pubindex.yaml")
///     .with_settings_file("data/pubindex-settings.json")
///     .with_env_overrides("PUBINDEX", "__")
///     .with_content_types(ContentTypeRegistry::default().with_type("page"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsStoreBuilder {
    file_paths: Vec<PathBuf>,
    settings_file: Option<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Arc<dyn ConfigSource>>,
    writer: Option<Arc<dyn ConfigSource>>,
    registry: ContentTypeRegistry,
    validator: Option<Validator>,
}

impl SettingsStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            settings_file: None,
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            writer: None,
            registry: ContentTypeRegistry::default(),
            validator: None,
        }
    }

    /// Add a required, read-only file source.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    ///
    /// Files are added in the order they are specified. Later files have higher
    /// priority and will override earlier files.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Save form submissions to this file and read it back on load.
    ///
    /// The file may be missing on first run. It sits above plain files and
    /// below environment overrides.
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Add environment variable source with custom prefix.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "PUBINDEX")
    /// * `separator` - Separator for nested keys (e.g., "__")
    ///
    /// Environment variables have the highest priority by default (300).
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom settings source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Arc::new(source));
        self
    }

    /// Read from and save to a custom writable source, such as the host's
    /// own option storage.
    ///
    /// Takes precedence over [`with_settings_file`](Self::with_settings_file).
    pub fn with_store_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.writer = Some(source);
        self
    }

    /// Restrict selectable content types to those the host has registered.
    pub fn with_content_types(mut self, registry: ContentTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a validation function that must pass before settings take effect.
    ///
    /// It runs on the initial build and on every write and reload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pubindex_notifier::prelude::*;
    ///
    /// let store = SettingsStore::builder()
    ///     .with_validation(|settings: &Settings| {
    ///         if settings.has_api_key() && settings.api_key.len() < 6 {
    ///             return Err(ValidationError::invalid_field("api_key", "too short"));
    ///         }
    ///         Ok(())
    ///     })
    ///     .build()
    ///     .unwrap();
    /// assert!(store.update(Settings::with_api_key("abc")).is_err());
    /// ```
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Settings) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Build the settings store.
    ///
    /// This performs the initial load from all sources, sanitizes and
    /// validates the result. With no sources at all the store starts from
    /// default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required file is missing or any source cannot be read
    /// - Deserialization fails
    /// - Validation fails
    pub fn build(self) -> Result<SettingsStore> {
        let mut loader = ConfigLoader::new();

        // Add file sources with increasing priority
        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10); // 100, 110, 120, etc.
            loader.add_source(Arc::new(FileSource::new(path).with_priority(priority)));
        }

        let writer = match (self.writer, self.settings_file) {
            (Some(writer), _) => Some(writer),
            (None, Some(path)) => {
                let file = FileSource::new(path)
                    .optional()
                    .writable()
                    .with_priority(200);
                Some(Arc::new(file) as Arc<dyn ConfigSource>)
            }
            (None, None) => None,
        };

        if let Some(writer) = &writer {
            if !writer.is_writable() {
                return Err(ConfigError::ReadOnlySource(writer.name()));
            }
            loader.add_source(Arc::clone(writer));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        // Environment variables take the highest priority
        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Arc::new(EnvSource::new(prefix, separator)));
        }

        let (initial, loader) = if loader.is_empty() {
            (Settings::default(), None)
        } else {
            let loaded: Settings = loader.load()?;
            (loaded.sanitized(&self.registry), Some(loader))
        };

        initial.validate()?;
        if let Some(validator) = &self.validator {
            validator(&initial)?;
        }

        Ok(SettingsStore::from_parts(
            initial,
            loader,
            writer,
            self.registry,
            self.validator,
        ))
    }
}

impl Default for SettingsStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// Create a new builder for constructing a settings store.
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }
}
