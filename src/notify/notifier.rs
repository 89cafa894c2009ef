//! The ping decision and dispatch.

use super::{
    DEFAULT_ENDPOINT, EventKind, HttpTransport, PingError, PingRequest, PingTransport, SaveEvent,
    SiteProfile, request_url,
};
use crate::core::Settings;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "metrics")]
use crate::metrics::PingMetrics;

/// How long a ping may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why no ping was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No API key is configured.
    MissingApiKey,
    /// The event's content type is not selected.
    ContentTypeNotSelected,
    /// The event is an update and only publishes trigger pings.
    UpdatesDisabled,
}

impl SkipReason {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_api_key",
            Self::ContentTypeNotSelected => "content_type_not_selected",
            Self::UpdatesDisabled => "updates_disabled",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handling one save event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// The API answered 200.
    Delivered,
    /// No request was made.
    Skipped(SkipReason),
    /// A request was attempted and did not succeed. Nothing is retried.
    Failed(PingError),
}

impl PingOutcome {
    /// Whether the API acknowledged the ping.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether a request was attempted.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Decide whether `event` should be pinged under `settings`.
///
/// A ping is due iff an API key is set, the content type is selected, and
/// the event is a publish or updates are enabled.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::core::Settings;
/// use pubindex_notifier::notify::{SaveEvent, SkipReason, should_notify};
///
/// let settings = Settings::with_api_key("abc123");
/// assert!(should_notify(&settings, &SaveEvent::publish(1, "post")).is_ok());
/// assert_eq!(
///     should_notify(&settings, &SaveEvent::update(1, "post")),
///     Err(SkipReason::UpdatesDisabled)
/// );
/// ```
pub fn should_notify(settings: &Settings, event: &SaveEvent) -> Result<(), SkipReason> {
    if !settings.has_api_key() {
        return Err(SkipReason::MissingApiKey);
    }
    if !settings.is_selected(&event.content_type) {
        return Err(SkipReason::ContentTypeNotSelected);
    }
    if event.kind == EventKind::Update && !settings.trigger_mode.includes_updates() {
        return Err(SkipReason::UpdatesDisabled);
    }
    Ok(())
}

/// Sends pings for save events.
///
/// Holds no per-call state; clones share the transport and may be used
/// concurrently.
///
/// # Examples
///
/// ```rust,no_run
/// use pubindex_notifier::core::Settings;
/// use pubindex_notifier::notify::{Notifier, SaveEvent, SiteProfile};
///
/// # async fn example() -> Result<(), pubindex_notifier::notify::PingError> {
/// let notifier = Notifier::builder(SiteProfile::new("https://example.com/feed/")).build()?;
///
/// let outcome = notifier
///     .notify(&SaveEvent::publish(42, "post"), &Settings::with_api_key("abc123"))
///     .await;
/// println!("delivered: {}", outcome.is_delivered());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Notifier {
    site: SiteProfile,
    endpoint: String,
    transport: Arc<dyn PingTransport>,
    #[cfg(feature = "metrics")]
    metrics: Option<PingMetrics>,
}

impl Notifier {
    /// Start building a notifier for `site`.
    pub fn builder(site: SiteProfile) -> NotifierBuilder {
        NotifierBuilder::new(site)
    }

    /// Create a notifier using the default endpoint and a custom transport.
    pub fn with_transport(site: SiteProfile, transport: Arc<dyn PingTransport>) -> Self {
        Self {
            site,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            transport,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// The site this notifier pings for.
    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    /// The ping endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request a ping for `event` would send, without checking
    /// whether one is due.
    ///
    /// # Errors
    ///
    /// Returns [`PingError::Encode`] if the URL cannot be encoded.
    pub fn request_for(&self, event: &SaveEvent, settings: &Settings) -> Result<PingRequest, PingError> {
        let feed = self.site.feed_for(&event.content_type)?;
        let url = request_url(&self.endpoint, &feed, &settings.api_key)?;
        Ok(PingRequest { url })
    }

    /// Handle one save event.
    ///
    /// Sends at most one request and never fails: skips and failures are
    /// reported through the returned outcome only.
    pub async fn notify(&self, event: &SaveEvent, settings: &Settings) -> PingOutcome {
        if let Err(reason) = should_notify(settings, event) {
            debug!(
                content_id = event.content_id,
                content_type = %event.content_type,
                event = %event.kind,
                reason = %reason,
                "Ping skipped"
            );
            #[cfg(feature = "metrics")]
            if let Some(metrics) = &self.metrics {
                metrics.record_skipped(reason);
            }
            return PingOutcome::Skipped(reason);
        }

        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(|m| m.start_ping());

        let outcome = match self.request_for(event, settings) {
            Ok(request) => match self.transport.send(&request).await {
                Ok(response) if response.status == 200 => PingOutcome::Delivered,
                Ok(response) => PingOutcome::Failed(PingError::UnexpectedStatus(response.status)),
                Err(err) => PingOutcome::Failed(err),
            },
            Err(err) => PingOutcome::Failed(err),
        };

        match &outcome {
            PingOutcome::Delivered => debug!(
                content_id = event.content_id,
                content_type = %event.content_type,
                event = %event.kind,
                "Ping delivered"
            ),
            PingOutcome::Failed(err) => warn!(
                content_id = event.content_id,
                content_type = %event.content_type,
                event = %event.kind,
                error = %err,
                "Ping failed; not retrying"
            ),
            PingOutcome::Skipped(_) => {}
        }

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            match &outcome {
                PingOutcome::Failed(err) => metrics.record_failed(timer, err),
                _ => metrics.record_delivered(timer),
            }
        }

        outcome
    }
}

/// Builder for a [`Notifier`].
pub struct NotifierBuilder {
    site: SiteProfile,
    endpoint: String,
    timeout: Duration,
    transport: Option<Arc<dyn PingTransport>>,
    #[cfg(feature = "metrics")]
    metrics: Option<PingMetrics>,
}

impl NotifierBuilder {
    /// Create a builder with the default endpoint and timeout.
    pub fn new(site: SiteProfile) -> Self {
        Self {
            site,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Send pings to a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 10 seconds. Ignored when a custom transport is supplied.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom transport instead of the default HTTP client.
    pub fn with_transport(mut self, transport: Arc<dyn PingTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Record ping metrics.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: PingMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the notifier.
    ///
    /// # Errors
    ///
    /// Returns [`PingError::Client`] if the default HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<Notifier, PingError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeout)?),
        };

        Ok(Notifier {
            site: self.site,
            endpoint: self.endpoint,
            transport,
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
        })
    }
}
