//! Built-in metrics for ping operations.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Ping attempts, deliveries and failures (by error kind)
//! - Skipped events (by reason)
//! - Ping duration
//!
//! # Examples
//!
//! ```rust,no_run
//! use pubindex_notifier::metrics::PingMetrics;
//! use pubindex_notifier::notify::{Notifier, SiteProfile};
//! use opentelemetry::global;
//!
//! # fn example() -> Result<(), pubindex_notifier::notify::PingError> {
//! let notifier = Notifier::builder(SiteProfile::new("https://example.com/feed/"))
//!     .with_metrics(PingMetrics::new(global::meter("my-site")))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod ping_metrics;

pub use ping_metrics::PingMetrics;
