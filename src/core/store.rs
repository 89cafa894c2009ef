//! The settings store handle providing lock-free reads and atomic writes.

use crate::core::{ConfigLoader, ContentTypeRegistry, Settings, SettingsForm, Validate};
use crate::error::{ConfigError, Result, ValidationError};
use crate::sources::ConfigSource;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Type alias for validator functions.
pub(crate) type Validator =
    Arc<dyn Fn(&Settings) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Holds the current notification settings.
///
/// Reads are lock-free snapshots. Writes go through sanitization, validation
/// and the persistence target (if any) before being swapped in, so a failed
/// write leaves the previous settings in effect.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::core::{SettingsForm, SettingsStore};
///
/// let store = SettingsStore::builder().build().unwrap();
/// assert!(!store.read().has_api_key());
///
/// store
///     .write(&SettingsForm {
///         api_key: " abc123 ".to_string(),
///         content_types: vec!["post".to_string()],
///         ping_options: "both".to_string(),
///     })
///     .unwrap();
/// assert_eq!(store.read().api_key, "abc123");
/// ```
pub struct SettingsStore {
    /// The current settings, wrapped in ArcSwap for atomic updates
    current: Arc<ArcSwap<Settings>>,
    /// Settings loader for reloading
    loader: Option<Arc<ConfigLoader>>,
    /// Where accepted writes are persisted
    writer: Option<Arc<dyn ConfigSource>>,
    /// Content types that may be selected
    registry: Arc<ContentTypeRegistry>,
    /// Optional validator function
    validator: Option<Validator>,
}

impl SettingsStore {
    /// Create an in-memory store with an initial value and the default registry.
    ///
    /// Nothing is persisted. For most use cases, prefer `SettingsStore::builder()`.
    pub fn new(initial: Settings) -> Self {
        Self {
            current: Arc::new(ArcSwap::new(Arc::new(initial))),
            loader: None,
            writer: None,
            registry: Arc::new(ContentTypeRegistry::default()),
            validator: None,
        }
    }

    pub(crate) fn from_parts(
        initial: Settings,
        loader: Option<ConfigLoader>,
        writer: Option<Arc<dyn ConfigSource>>,
        registry: ContentTypeRegistry,
        validator: Option<Validator>,
    ) -> Self {
        Self {
            current: Arc::new(ArcSwap::new(Arc::new(initial))),
            loader: loader.map(Arc::new),
            writer,
            registry: Arc::new(registry),
            validator,
        }
    }

    /// Get a reference-counted snapshot of the current settings.
    ///
    /// Readers never block writers or other readers.
    pub fn read(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// The content types that may be selected.
    pub fn registry(&self) -> &ContentTypeRegistry {
        &self.registry
    }

    /// Whether accepted writes are persisted.
    pub fn is_persistent(&self) -> bool {
        self.writer.is_some()
    }

    /// Apply a settings form submission.
    ///
    /// The form is sanitized, validated and persisted before it takes effect.
    /// Returns the settings now in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the persistence target rejects
    /// the write. The previous settings are retained in both cases.
    pub fn write(&self, form: &SettingsForm) -> Result<Arc<Settings>> {
        self.commit(form.sanitize(&self.registry))
    }

    /// Replace the settings with an already-typed value.
    ///
    /// The value goes through the same sanitization as form input.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn update(&self, settings: Settings) -> Result<Arc<Settings>> {
        self.commit(settings.sanitized(&self.registry))
    }

    /// Re-read settings from all sources.
    ///
    /// If loading or validation fails, the old settings are retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the store was not built with any sources, a source
    /// cannot be read, or the loaded settings fail validation.
    pub fn reload(&self) -> Result<Arc<Settings>> {
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| ConfigError::Other("No loader available for reload".to_string()))?;

        let loaded: Settings = loader.load()?;
        let settings = loaded.sanitized(&self.registry);
        self.check(&settings)?;

        let settings = Arc::new(settings);
        self.current.store(Arc::clone(&settings));
        tracing::debug!(sources = ?loader.source_names(), "Reloaded settings");
        Ok(settings)
    }

    fn check(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        if let Some(validator) = &self.validator {
            validator(settings)?;
        }
        Ok(())
    }

    fn commit(&self, settings: Settings) -> Result<Arc<Settings>> {
        if let Err(err) = self.check(&settings) {
            tracing::warn!(error = %err, "Rejected settings update");
            return Err(err);
        }

        if let Some(writer) = &self.writer {
            if let Err(err) = writer.persist(&settings) {
                tracing::warn!(source = %writer.name(), error = %err, "Failed to persist settings");
                return Err(err);
            }
        }

        let settings = Arc::new(settings);
        self.current.store(Arc::clone(&settings));
        tracing::debug!(
            content_types = ?settings.content_types,
            trigger_mode = %settings.trigger_mode,
            has_api_key = settings.has_api_key(),
            "Settings updated"
        );
        Ok(settings)
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            loader: self.loader.clone(),
            writer: self.writer.clone(),
            registry: Arc::clone(&self.registry),
            validator: self.validator.clone(),
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
