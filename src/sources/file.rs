//! File-based settings source.

use super::ConfigSource;
use crate::core::Settings;
use crate::error::{ConfigError, Result};
use config::File;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

/// File-based settings source.
///
/// Loads settings from YAML, TOML, or JSON files with automatic format detection
/// based on file extension. A writable file source is where the settings
/// form saves its values.
///
/// # Examples
///
/// ```rust,no_run
/// use pubindex_notifier::sources::FileSource;
///
/// let defaults = FileSource::new("config/pubindex.yaml");
/// let saved = FileSource::new("data/pubindex-settings.json")
///     .optional()
///     .writable()
///     .with_priority(200);
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
    required: bool,
    writable: bool,
}

impl FileSource {
    /// Create a new required, read-only file source.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
            required: true,
            writable: false,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Treat a missing file as an empty source instead of an error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Allow settings to be persisted to this file.
    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }

    fn persist_error(&self, reason: impl ToString) -> ConfigError {
        ConfigError::PersistError {
            source_name: self.name(),
            reason: reason.to_string(),
        }
    }

    fn render(&self, settings: &Settings) -> Result<String> {
        match self.format()? {
            Format::Yaml => render_yaml(settings).map_err(|e| self.persist_error(e)),
            Format::Toml => render_toml(settings).map_err(|e| self.persist_error(e)),
            Format::Json => render_json(settings).map_err(|e| self.persist_error(e)),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        self.format()?;

        if !self.path.exists() {
            if self.required {
                return Err(ConfigError::LoadError(format!(
                    "Settings file not found: {}",
                    self.path.display()
                )));
            }
            return Ok(HashMap::new());
        }

        let config_builder = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to load file: {}", e)))?;

        let map = config_builder
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ConfigError::DeserializationError(format!("Failed to parse file: {}", e))
            })?;

        Ok(map)
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        if !self.writable {
            return Err(ConfigError::ReadOnlySource(self.name()));
        }

        let contents = self.render(settings)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so readers never see a partial file.
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Persisted settings");
        Ok(())
    }
}

#[cfg(feature = "yaml")]
fn render_yaml(settings: &Settings) -> std::result::Result<String, String> {
    serde_yaml::to_string(settings).map_err(|e| e.to_string())
}

#[cfg(not(feature = "yaml"))]
fn render_yaml(_settings: &Settings) -> std::result::Result<String, String> {
    Err(ConfigError::FeatureNotEnabled("yaml").to_string())
}

#[cfg(feature = "toml")]
fn render_toml(settings: &Settings) -> std::result::Result<String, String> {
    toml::to_string_pretty(settings).map_err(|e| e.to_string())
}

#[cfg(not(feature = "toml"))]
fn render_toml(_settings: &Settings) -> std::result::Result<String, String> {
    Err(ConfigError::FeatureNotEnabled("toml").to_string())
}

#[cfg(feature = "json")]
fn render_json(settings: &Settings) -> std::result::Result<String, String> {
    serde_json::to_string_pretty(settings).map_err(|e| e.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(_settings: &Settings) -> std::result::Result<String, String> {
    Err(ConfigError::FeatureNotEnabled("json").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TriggerMode;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileSource::new("a.yaml").format().unwrap(), Format::Yaml);
        assert_eq!(FileSource::new("a.yml").format().unwrap(), Format::Yaml);
        assert_eq!(FileSource::new("a.toml").format().unwrap(), Format::Toml);
        assert_eq!(FileSource::new("a.json").format().unwrap(), Format::Json);
        assert!(FileSource::new("a.txt").format().is_err());
        assert!(FileSource::new("settings").format().is_err());
    }

    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pubindex.yaml");
        fs::write(
            &path,
            r#"
api_key: abc123
content_types: [post, page]
ping_options: both
"#,
        )
        .unwrap();

        let map = FileSource::new(&path).load().unwrap();
        assert!(map.contains_key("api_key"));
        assert!(map.contains_key("content_types"));
        assert!(map.contains_key("ping_options"));
    }

    #[test]
    fn test_missing_required_file() {
        let source = FileSource::new("/nonexistent/pubindex.yaml");
        assert!(source.load().is_err());
    }

    #[test]
    fn test_missing_optional_file_is_empty() {
        let source = FileSource::new("/nonexistent/pubindex.yaml").optional();
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn test_read_only_by_default() {
        let source = FileSource::new("pubindex.json");
        assert!(!source.is_writable());
        assert!(matches!(
            source.persist(&Settings::default()),
            Err(ConfigError::ReadOnlySource(_))
        ));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_persist_then_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");
        let source = FileSource::new(&path).optional().writable();

        let settings = Settings::with_api_key("abc123")
            .select(["post", "page"])
            .trigger_on(TriggerMode::Both);
        source.persist(&settings).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"ping_options\": \"both\""));
        assert!(!path.with_extension("json.tmp").exists());

        let map = source.load().unwrap();
        assert_eq!(
            map.get("api_key").cloned().unwrap().into_string().unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_with_priority() {
        let source = FileSource::new("pubindex.yaml").with_priority(200);
        assert_eq!(source.priority(), 200);
    }

    #[test]
    fn test_name() {
        let source = FileSource::new("pubindex.yaml");
        assert!(source.name().contains("pubindex.yaml"));
    }
}
