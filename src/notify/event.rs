//! Content save events.

use crate::core::sanitize_key;
use std::fmt;

/// Status a content item carries once it is publicly visible.
const PUBLISHED: &str = "publish";

/// What happened to a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// First transition into the published state.
    Publish,
    /// An already-published item was saved again.
    Update,
}

impl EventKind {
    /// Classify a status transition.
    ///
    /// Entering `publish` from any other status is a publish, saving a
    /// published item again is an update, and every other transition
    /// (drafts, trashing, unpublishing) produces no event.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pubindex_notifier::notify::EventKind;
    ///
    /// assert_eq!(EventKind::from_transition("draft", "publish"), Some(EventKind::Publish));
    /// assert_eq!(EventKind::from_transition("publish", "publish"), Some(EventKind::Update));
    /// assert_eq!(EventKind::from_transition("publish", "trash"), None);
    /// ```
    pub fn from_transition(old_status: &str, new_status: &str) -> Option<Self> {
        match (old_status == PUBLISHED, new_status == PUBLISHED) {
            (false, true) => Some(Self::Publish),
            (true, true) => Some(Self::Update),
            _ => None,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content item was published or updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    /// Host identifier of the content item.
    pub content_id: u64,
    /// Content type key, e.g. `post` or `page`.
    pub content_type: String,
    /// Publish or update.
    pub kind: EventKind,
}

impl SaveEvent {
    /// Create an event.
    ///
    /// The content type is reduced to its canonical key (lowercase
    /// `[a-z0-9_-]`), the form settings store their selections in.
    pub fn new(content_id: u64, content_type: impl Into<String>, kind: EventKind) -> Self {
        Self {
            content_id,
            content_type: sanitize_key(&content_type.into()),
            kind,
        }
    }

    /// Shorthand for a publish event.
    pub fn publish(content_id: u64, content_type: impl Into<String>) -> Self {
        Self::new(content_id, content_type, EventKind::Publish)
    }

    /// Shorthand for an update event.
    pub fn update(content_id: u64, content_type: impl Into<String>) -> Self {
        Self::new(content_id, content_type, EventKind::Update)
    }

    /// Build an event from a status transition, if the transition warrants one.
    pub fn from_transition(
        content_id: u64,
        content_type: impl Into<String>,
        old_status: &str,
        new_status: &str,
    ) -> Option<Self> {
        EventKind::from_transition(old_status, new_status)
            .map(|kind| Self::new(content_id, content_type, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert_eq!(
            EventKind::from_transition("new", "publish"),
            Some(EventKind::Publish)
        );
        assert_eq!(
            EventKind::from_transition("future", "publish"),
            Some(EventKind::Publish)
        );
        assert_eq!(
            EventKind::from_transition("publish", "publish"),
            Some(EventKind::Update)
        );
        assert_eq!(EventKind::from_transition("draft", "draft"), None);
        assert_eq!(EventKind::from_transition("draft", "pending"), None);
        assert_eq!(EventKind::from_transition("publish", "draft"), None);
    }

    #[test]
    fn test_event_from_transition() {
        let event = SaveEvent::from_transition(7, "page", "draft", "publish").unwrap();
        assert_eq!(event, SaveEvent::publish(7, "page"));
        assert!(SaveEvent::from_transition(7, "page", "draft", "private").is_none());
    }

    #[test]
    fn test_content_type_is_canonical_key() {
        assert_eq!(SaveEvent::publish(1, "Page").content_type, "page");
        assert_eq!(SaveEvent::update(1, " Product ").content_type, "product");
        assert_eq!(SaveEvent::publish(1, "case_study").content_type, "case_study");
    }
}
