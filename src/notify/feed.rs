//! Feed and request URL construction.

use super::PingError;
use crate::core::DEFAULT_CONTENT_TYPE;

/// The indexing API's ping endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.pubindex.dev/api/ping";

/// What the notifier needs to know about the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    /// Base syndication feed URL, e.g. `https://example.com/feed/`.
    pub feed_url: String,
    /// Content type served by the base feed without a `post_type` filter.
    pub default_content_type: String,
}

impl SiteProfile {
    /// Create a profile whose default content type is `post`.
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Override the default content type.
    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = content_type.into();
        self
    }

    /// Feed URL listing items of `content_type`.
    pub fn feed_for(&self, content_type: &str) -> Result<String, PingError> {
        feed_url(&self.feed_url, &self.default_content_type, content_type)
    }
}

/// Feed URL for `content_type`.
///
/// The default type uses the base feed unchanged; any other type adds a
/// `post_type` query parameter ahead of any fragment.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::notify::feed_url;
///
/// let base = "https://example.com/feed/";
/// assert_eq!(feed_url(base, "post", "post").unwrap(), base);
/// assert_eq!(
///     feed_url(base, "post", "page").unwrap(),
///     "https://example.com/feed/?post_type=page"
/// );
/// ```
pub fn feed_url(base: &str, default_type: &str, content_type: &str) -> Result<String, PingError> {
    if content_type == default_type {
        return Ok(base.to_string());
    }

    let query = serde_urlencoded::to_string([("post_type", content_type)])
        .map_err(|e| PingError::Encode(e.to_string()))?;
    let (head, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };
    let separator = if head.contains('?') { '&' } else { '?' };

    let mut url = format!("{}{}{}", head, separator, query);
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    Ok(url)
}

/// Full ping URL: `endpoint?feed=<feed>&api-key=<key>`, form-encoded.
///
/// # Examples
///
/// ```rust
/// use pubindex_notifier::notify::{DEFAULT_ENDPOINT, request_url};
///
/// assert_eq!(
///     request_url(DEFAULT_ENDPOINT, "https://example.com/feed/", "abc123").unwrap(),
///     "https://api.pubindex.dev/api/ping?feed=https%3A%2F%2Fexample.com%2Ffeed%2F&api-key=abc123"
/// );
/// ```
pub fn request_url(endpoint: &str, feed_url: &str, api_key: &str) -> Result<String, PingError> {
    let query = serde_urlencoded::to_string([("feed", feed_url), ("api-key", api_key)])
        .map_err(|e| PingError::Encode(e.to_string()))?;
    Ok(format!("{}?{}", endpoint, query))
}
