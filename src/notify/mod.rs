//! Ping notifications to the indexing API.
//!
//! [`Notifier::notify`] decides whether a save event warrants a ping, builds
//! the feed and request URLs, and issues a single best-effort GET. The outcome
//! is returned for observability and never propagated as an error.

mod error;
mod event;
mod feed;
mod notifier;
mod transport;

pub use error::PingError;
pub use event::{EventKind, SaveEvent};
pub use feed::{DEFAULT_ENDPOINT, SiteProfile, feed_url, request_url};
pub use notifier::{
    DEFAULT_TIMEOUT, Notifier, NotifierBuilder, PingOutcome, SkipReason, should_notify,
};
pub use transport::{HttpTransport, PingRequest, PingResponse, PingTransport};
