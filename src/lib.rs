//! # pubindex-notifier
//!
//! Pings the Publisher Indexing API whenever content is published or updated.
//!
//! ## Overview
//!
//! `pubindex-notifier` has two halves:
//! - A settings store holding the API key, the content types that trigger
//!   pings and whether updates ping as well as first publication. Reads are
//!   lock-free (`arc-swap`); writes are sanitized, validated and persisted
//!   before they take effect.
//! - A notifier that turns a save event into at most one best-effort
//!   `GET https://api.pubindex.dev/api/ping?feed=...&api-key=...` with a
//!   10 second timeout. Failures are never retried and never reach the
//!   code that saved the content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pubindex_notifier::prelude::*;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let events = HookRegistry::new();
//!
//! let store = SettingsStore::builder()
//!     .with_settings_file("data/pubindex-settings.json")
//!     .with_env_overrides("PUBINDEX", "__")
//!     .with_content_types(ContentTypeRegistry::default().with_type("page"))
//!     .build()?;
//!
//! let notifier = Notifier::builder(SiteProfile::new("https://example.com/feed/")).build()?;
//! let plugin = Plugin::init(store, notifier, &events);
//!
//! // Administrator saves the settings form.
//! plugin.save_settings(&SettingsForm {
//!     api_key: "abc123".to_string(),
//!     content_types: vec!["post".to_string(), "page".to_string()],
//!     ping_options: "both".to_string(),
//! })?;
//!
//! // Host reports a post going live; one ping is sent.
//! events.emit_transition(42, "post", "draft", "publish").await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `yaml`, `toml`, `json` (default): settings file formats for write-back
//! - `metrics`: OpenTelemetry ping counters and durations

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod hooks;
pub mod notify;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ContentTypeRegistry, Settings, SettingsForm, SettingsStore, SettingsStoreBuilder,
        TriggerMode, Validate,
    };
    pub use crate::error::{ConfigError, Result, ValidationError};
    pub use crate::hooks::{HookRegistry, Plugin, SaveEventHandler, SaveEventSource};
    pub use crate::notify::{
        EventKind, Notifier, PingError, PingOutcome, SaveEvent, SiteProfile, SkipReason,
    };
}
