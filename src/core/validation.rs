//! Settings validation support.

use crate::core::Settings;
use crate::error::ValidationError;

/// Trait for settings validation.
///
/// Runs after sanitization and before any new settings take effect.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::core::{Settings, Validate};
///
/// let settings = Settings::with_api_key("abc123");
/// assert!(settings.validate().is_ok());
/// ```
pub trait Validate {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Settings {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.api_key.chars().any(char::is_control) {
            errors.push(ValidationError::invalid_field(
                "api_key",
                "must not contain control characters",
            ));
        }

        if self.content_types.is_empty() {
            errors.push(ValidationError::invalid_field(
                "content_types",
                "at least one content type must be selected",
            ));
        }

        if let Some(bad) = self.content_types.iter().find(|name| {
            name.is_empty()
                || !name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        }) {
            errors.push(ValidationError::invalid_field(
                "content_types",
                format!("'{}' is not a valid content type name", bad),
            ));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}
