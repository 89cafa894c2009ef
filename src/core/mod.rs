//! Settings storage: model, sanitization, layered loading and the store handle.

mod builder;
mod loader;
mod settings;
mod store;
mod validation;

pub use builder::SettingsStoreBuilder;
pub(crate) use loader::ConfigLoader;
pub use settings::{
    ContentTypeRegistry, DEFAULT_CONTENT_TYPE, Settings, SettingsForm, TriggerMode,
    sanitize_content_types, sanitize_key, sanitize_text_field,
};
pub use store::SettingsStore;
pub use validation::Validate;
