//! Settings model and the sanitizers applied to administrator input.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Content type that is selected when nothing valid was chosen.
pub const DEFAULT_CONTENT_TYPE: &str = "post";

/// When pings are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerMode {
    /// Only when content is first published (`"publish"`).
    #[default]
    Publish,
    /// On publish and on every update of published content (`"both"`).
    Both,
}

impl TriggerMode {
    /// The persisted form of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Both => "both",
        }
    }

    /// Parse a stored or submitted value, falling back to `Publish` for
    /// anything unrecognized.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "both" | "publish_and_update" => Self::Both,
            _ => Self::Publish,
        }
    }

    /// Whether updates to already-published content trigger a ping.
    pub fn includes_updates(&self) -> bool {
        matches!(self, Self::Both)
    }
}

impl From<String> for TriggerMode {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<TriggerMode> for String {
    fn from(mode: TriggerMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The administrator-managed notification settings.
///
/// Persisted under the keys `api_key`, `content_types` and `ping_options`.
/// `content_types` accepts either a list or a comma-separated string so that
/// it can be overridden from a single environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Key sent as the `api-key` query parameter. Empty disables pings.
    #[serde(default)]
    pub api_key: String,

    /// Content types whose saves trigger a ping.
    #[serde(
        default = "default_content_types",
        deserialize_with = "deserialize_content_types"
    )]
    pub content_types: BTreeSet<String>,

    /// Whether updates ping as well as first publication.
    #[serde(default, rename = "ping_options")]
    pub trigger_mode: TriggerMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            content_types: default_content_types(),
            trigger_mode: TriggerMode::default(),
        }
    }
}

impl Settings {
    /// Create settings with an API key and otherwise default values.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Replace the selected content types.
    pub fn select<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = content_types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the trigger mode.
    pub fn trigger_on(mut self, mode: TriggerMode) -> Self {
        self.trigger_mode = mode;
        self
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Whether saves of `content_type` are selected for pinging.
    ///
    /// `content_type` is compared in the same canonical form selections are
    /// stored in, so `"Page"` matches a selected `"page"`.
    pub fn is_selected(&self, content_type: &str) -> bool {
        self.content_types.contains(content_type)
            || self.content_types.contains(sanitize_key(content_type).as_str())
    }

    /// Run every field through the same sanitizers used for form input.
    pub fn sanitized(&self, registry: &ContentTypeRegistry) -> Self {
        Self {
            api_key: sanitize_text_field(&self.api_key),
            content_types: sanitize_content_types(&self.content_types, registry),
            trigger_mode: self.trigger_mode,
        }
    }

    /// Flatten into the key-value shape used by configuration sources.
    pub fn to_values(&self) -> HashMap<String, config::Value> {
        let content_types: Vec<String> = self.content_types.iter().cloned().collect();
        HashMap::from([
            ("api_key".to_string(), config::Value::from(self.api_key.clone())),
            ("content_types".to_string(), config::Value::from(content_types)),
            (
                "ping_options".to_string(),
                config::Value::from(self.trigger_mode.as_str()),
            ),
        ])
    }
}

fn default_content_types() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_CONTENT_TYPE.to_string()])
}

fn deserialize_content_types<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ContentTypesVisitor;

    impl<'de> Visitor<'de> for ContentTypesVisitor {
        type Value = BTreeSet<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of content types or a comma-separated string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            self.visit_str(&value)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeSet::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeSet::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut types = BTreeSet::new();
            while let Some(value) = seq.next_element::<String>()? {
                types.insert(value);
            }
            Ok(types)
        }
    }

    deserializer.deserialize_any(ContentTypesVisitor)
}

/// The content types known to the host, used to reject invalid selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeRegistry {
    default_type: String,
    registered: BTreeSet<String>,
}

impl ContentTypeRegistry {
    /// Create a registry whose default (and fallback) type is `default_type`.
    ///
    /// With no further types registered, any well-formed name is accepted.
    pub fn new(default_type: impl Into<String>) -> Self {
        Self {
            default_type: default_type.into(),
            registered: BTreeSet::new(),
        }
    }

    /// Register a public content type.
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.registered.insert(name.into());
        self
    }

    /// The host's default content type.
    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    /// Whether `name` may be selected.
    pub fn accepts(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.registered.is_empty() || name == self.default_type || self.registered.contains(name)
    }
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE)
    }
}

/// Raw input submitted through the settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsForm {
    /// Free-text API key.
    #[serde(default)]
    pub api_key: String,
    /// Checked content types.
    #[serde(default)]
    pub content_types: Vec<String>,
    /// `"publish"` or `"both"`.
    #[serde(default)]
    pub ping_options: String,
}

impl SettingsForm {
    /// Sanitize the submission into settings.
    pub fn sanitize(&self, registry: &ContentTypeRegistry) -> Settings {
        Settings {
            api_key: sanitize_text_field(&self.api_key),
            content_types: sanitize_content_types(&self.content_types, registry),
            trigger_mode: TriggerMode::parse_lenient(&self.ping_options),
        }
    }
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            content_types: settings.content_types.iter().cloned().collect(),
            ping_options: settings.trigger_mode.as_str().to_string(),
        }
    }
}

/// Normalize selected content types against the registry.
///
/// Falls back to the registry's default type when nothing valid remains.
pub fn sanitize_content_types<I, S>(types: I, registry: &ContentTypeRegistry) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let selected: BTreeSet<String> = types
        .into_iter()
        .map(|name| sanitize_key(name.as_ref()))
        .filter(|name| registry.accepts(name))
        .collect();

    if selected.is_empty() {
        BTreeSet::from([registry.default_type().to_string()])
    } else {
        selected
    }
}

/// Lowercase and keep only `[a-z0-9_-]`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Clean a single-line free-text field.
///
/// Strips markup, escapes stray `<`, collapses whitespace runs (including
/// tabs and line breaks) to one space, removes percent-encoded octets and
/// trims the result.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let collapsed = collapse_whitespace(&stripped);

    let mut without_octets = collapsed.clone();
    let mut found = false;
    while let Some(pos) = find_percent_octet(&without_octets) {
        without_octets.replace_range(pos..pos + 3, "");
        found = true;
    }

    if found {
        collapse_whitespace(&without_octets)
    } else {
        collapsed
    }
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        let opens_tag = chars
            .peek()
            .is_some_and(|(_, next)| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));
        let closes_at = input[idx..].find('>');

        match (opens_tag, closes_at) {
            (true, Some(offset)) => {
                let end = idx + offset;
                while chars.peek().is_some_and(|(i, _)| *i <= end) {
                    chars.next();
                }
            }
            _ => out.push_str("&lt;"),
        }
    }

    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_percent_octet(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    bytes.windows(3).position(|w| {
        w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit()
    })
}
