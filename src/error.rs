//! Error types for pubindex-notifier.

use std::fmt;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading, validating or persisting settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load settings from a source.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// Failed to deserialize settings.
    #[error("Failed to deserialize settings: {0}")]
    DeserializationError(String),

    /// Settings validation failed.
    #[error("Settings validation failed: {0}")]
    ValidationError(String),

    /// Failed to write settings back to their persistence target.
    #[error("Failed to persist settings to '{source_name}': {reason}")]
    PersistError {
        /// Name of the source that rejected the write
        source_name: String,
        /// Underlying failure
        reason: String,
    },

    /// The source cannot be written to.
    #[error("Settings source '{0}' is read-only")]
    ReadOnlySource(String),

    /// Attempted to use a feature that is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Settings error: {0}")]
    Other(String),
}

/// Validation error for settings validation.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_errors_display() {
        let err = ValidationError::Multiple(vec![
            ValidationError::invalid_field("content_types", "must not be empty"),
            ValidationError::custom("bad key"),
        ]);
        let text = err.to_string();
        assert!(text.contains("1. Field 'content_types' is invalid: must not be empty"));
        assert!(text.contains("2. bad key"));
    }

    #[test]
    fn test_validation_error_converts() {
        let err: ConfigError = ValidationError::custom("nope").into();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg == "nope"));
    }
}
