//! Explicit initialization of the ping integration.

use super::{HookHandle, SaveEventHandler, SaveEventSource};
use crate::core::{Settings, SettingsForm, SettingsStore};
use crate::error::Result;
use crate::notify::{Notifier, PingOutcome, SaveEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Save-event handler that pings with the settings current at the time of
/// the event.
#[derive(Clone)]
pub struct PingHook {
    store: SettingsStore,
    notifier: Notifier,
}

impl PingHook {
    /// Create a hook reading from `store` and sending through `notifier`.
    pub fn new(store: SettingsStore, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Handle `event` and report what happened.
    pub async fn handle(&self, event: &SaveEvent) -> PingOutcome {
        let settings = self.store.read();
        self.notifier.notify(event, &settings).await
    }
}

#[async_trait]
impl SaveEventHandler for PingHook {
    async fn on_save(&self, event: &SaveEvent) {
        // Outcome is logged by the notifier; the save itself must not fail.
        let _ = self.handle(event).await;
    }
}

/// The initialized integration: settings access for the admin side and a
/// registered ping hook for the content side.
///
/// Dropping the plugin unregisters the hook.
///
/// # Examples
///
/// ```rust,no_run
/// use pubindex_notifier::prelude::*;
///
/// # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let events = HookRegistry::new();
/// let store = SettingsStore::builder()
///     .with_settings_file("data/pubindex-settings.json")
///     .build()?;
/// let notifier = Notifier::builder(SiteProfile::new("https://example.com/feed/")).build()?;
///
/// let plugin = Plugin::init(store, notifier, &events);
///
/// // The host reports a post going live.
/// events.emit_transition(42, "post", "draft", "publish").await;
/// # drop(plugin);
/// # Ok(())
/// # }
/// ```
pub struct Plugin {
    hook: PingHook,
    _registration: HookHandle,
}

impl Plugin {
    /// Register a ping hook with `events`.
    pub fn init<E>(store: SettingsStore, notifier: Notifier, events: &E) -> Self
    where
        E: SaveEventSource + ?Sized,
    {
        let hook = PingHook::new(store, notifier);
        let registration = events.register(Arc::new(hook.clone()));

        tracing::debug!(
            feed_url = %hook.notifier.site().feed_url,
            endpoint = %hook.notifier.endpoint(),
            "Ping hook registered"
        );

        Self {
            hook,
            _registration: registration,
        }
    }

    /// Current settings, for rendering the settings form.
    pub fn settings(&self) -> Arc<Settings> {
        self.hook.store.read()
    }

    /// Save a settings form submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is rejected or cannot be persisted;
    /// the previous settings stay in effect.
    pub fn save_settings(&self, form: &SettingsForm) -> Result<Arc<Settings>> {
        self.hook.store.write(form)
    }

    /// Ping for `event` directly, bypassing the event source.
    pub async fn ping(&self, event: &SaveEvent) -> PingOutcome {
        self.hook.handle(event).await
    }

    /// The settings store.
    pub fn store(&self) -> &SettingsStore {
        &self.hook.store
    }

    /// The notifier.
    pub fn notifier(&self) -> &Notifier {
        &self.hook.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRegistry;
    use crate::notify::{PingError, PingRequest, PingResponse, PingTransport, SiteProfile};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PingTransport for Recorder {
        async fn send(&self, request: &PingRequest) -> std::result::Result<PingResponse, PingError> {
            self.urls.lock().push(request.url.clone());
            Ok(PingResponse { status: 200 })
        }
    }

    fn setup() -> (HookRegistry, Arc<Recorder>, Plugin) {
        let events = HookRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::with_transport(
            SiteProfile::new("https://example.com/feed/"),
            recorder.clone(),
        );
        let plugin = Plugin::init(SettingsStore::default(), notifier, &events);
        (events, recorder, plugin)
    }

    #[tokio::test]
    async fn test_init_registers_one_handler() {
        let (events, _recorder, plugin) = setup();
        assert_eq!(events.handler_count(), 1);

        drop(plugin);
        assert_eq!(events.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_settings_changes_apply_to_next_event() {
        let (events, recorder, plugin) = setup();

        events.emit(&SaveEvent::publish(1, "post")).await;
        assert!(recorder.urls.lock().is_empty());

        plugin
            .save_settings(&SettingsForm {
                api_key: "abc123".to_string(),
                content_types: vec!["post".to_string()],
                ping_options: "publish".to_string(),
            })
            .unwrap();
        assert_eq!(plugin.settings().api_key, "abc123");

        events.emit(&SaveEvent::publish(2, "post")).await;
        events.emit(&SaveEvent::update(2, "post")).await;
        assert_eq!(recorder.urls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_direct_ping() {
        let (_events, recorder, plugin) = setup();
        plugin.store().update(Settings::with_api_key("abc123")).unwrap();

        let outcome = plugin.ping(&SaveEvent::publish(1, "post")).await;
        assert!(outcome.is_delivered());
        assert_eq!(recorder.urls.lock().len(), 1);
        assert_eq!(plugin.notifier().site().feed_url, "https://example.com/feed/");
    }
}
