//! Save-event handler registration and dispatch.

use crate::notify::SaveEvent;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Reacts to content being published or updated.
#[async_trait]
pub trait SaveEventHandler: Send + Sync {
    /// Handle one event. Must not fail the save that produced it.
    async fn on_save(&self, event: &SaveEvent);
}

/// Something that emits save events and accepts handlers for them.
///
/// Hosts with their own hook system implement this; [`HookRegistry`] is the
/// in-process implementation.
pub trait SaveEventSource {
    /// Register `handler`. Dropping the returned handle unregisters it.
    fn register(&self, handler: Arc<dyn SaveEventHandler>) -> HookHandle;
}

/// Handle for a registered handler.
///
/// When the handle is dropped, the handler is removed.
pub struct HookHandle {
    id: usize,
    registry: Weak<Mutex<HookRegistryInner>>,
}

impl HookHandle {
    /// A handle that is not attached to any registry.
    ///
    /// For [`SaveEventSource`] implementations that manage handler lifetimes
    /// themselves.
    pub fn detached() -> Self {
        Self {
            id: usize::MAX,
            registry: Weak::new(),
        }
    }
}

impl Drop for HookHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let id = self.id;
            registry.lock().handlers.retain(|(handler_id, _)| *handler_id != id);
        }
    }
}

struct HookRegistryInner {
    handlers: Vec<(usize, Arc<dyn SaveEventHandler>)>,
    next_id: usize,
}

/// In-process registry of save-event handlers.
///
/// Handlers run in registration order, each awaited before the next, so
/// [`emit`](Self::emit) returns only after every handler has finished.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use pubindex_notifier::hooks::{HookRegistry, SaveEventHandler, SaveEventSource};
/// use pubindex_notifier::notify::SaveEvent;
/// use std::sync::Arc;
///
/// struct Log;
///
/// #[async_trait]
/// impl SaveEventHandler for Log {
///     async fn on_save(&self, event: &SaveEvent) {
///         println!("saved {}", event.content_id);
///     }
/// }
///
/// # async fn example() {
/// let registry = HookRegistry::new();
/// let handle = registry.register(Arc::new(Log));
///
/// registry.emit(&SaveEvent::publish(1, "post")).await;
///
/// // Unregister by dropping the handle
/// drop(handle);
/// # }
/// ```
pub struct HookRegistry {
    inner: Arc<Mutex<HookRegistryInner>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HookRegistryInner {
                handlers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Deliver `event` to every registered handler.
    ///
    /// Returns the number of handlers invoked.
    pub async fn emit(&self, event: &SaveEvent) -> usize {
        // Snapshot so handlers can register or unregister while running.
        let handlers: Vec<Arc<dyn SaveEventHandler>> = self
            .inner
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &handlers {
            handler.on_save(event).await;
        }

        handlers.len()
    }

    /// Emit the event implied by a status transition, if any.
    ///
    /// Returns the number of handlers invoked; zero when the transition is
    /// neither a publish nor an update.
    pub async fn emit_transition(
        &self,
        content_id: u64,
        content_type: &str,
        old_status: &str,
        new_status: &str,
    ) -> usize {
        match SaveEvent::from_transition(content_id, content_type, old_status, new_status) {
            Some(event) => self.emit(&event).await,
            None => 0,
        }
    }

    /// Get the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }
}

impl SaveEventSource for HookRegistry {
    fn register(&self, handler: Arc<dyn SaveEventHandler>) -> HookHandle {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, handler));

        HookHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HookRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        calls: AtomicUsize,
        seen: Mutex<Vec<SaveEvent>>,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SaveEventHandler for Counter {
        async fn on_save(&self, event: &SaveEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().push(event.clone());
        }
    }

    #[tokio::test]
    async fn test_register_and_emit() {
        let registry = HookRegistry::new();
        let counter = Counter::new();
        let _handle = registry.register(counter.clone());

        assert_eq!(registry.emit(&SaveEvent::publish(1, "post")).await, 1);
        assert_eq!(counter.calls(), 1);

        registry.emit(&SaveEvent::update(1, "post")).await;
        assert_eq!(counter.calls(), 2);
    }

    #[tokio::test]
    async fn test_multiple_handlers() {
        let registry = HookRegistry::new();
        let counter1 = Counter::new();
        let counter2 = Counter::new();
        let _handle1 = registry.register(counter1.clone());
        let _handle2 = registry.register(counter2.clone());

        assert_eq!(registry.emit(&SaveEvent::publish(1, "post")).await, 2);
        assert_eq!(counter1.calls(), 1);
        assert_eq!(counter2.calls(), 1);
    }

    #[tokio::test]
    async fn test_unregister_on_drop() {
        let registry = HookRegistry::new();
        let counter = Counter::new();
        let handle = registry.register(counter.clone());

        registry.emit(&SaveEvent::publish(1, "post")).await;
        drop(handle);
        registry.emit(&SaveEvent::publish(2, "post")).await;

        assert_eq!(counter.calls(), 1);
        assert_eq!(registry.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_outliving_registry() {
        let registry = HookRegistry::new();
        let handle = registry.register(Counter::new());
        drop(registry);
        drop(handle);
    }

    #[tokio::test]
    async fn test_emit_transition() {
        let registry = HookRegistry::new();
        let counter = Counter::new();
        let _handle = registry.register(counter.clone());

        assert_eq!(registry.emit_transition(5, "page", "draft", "draft").await, 0);
        assert_eq!(registry.emit_transition(5, "page", "draft", "publish").await, 1);
        assert_eq!(registry.emit_transition(5, "page", "publish", "publish").await, 1);

        let kinds: Vec<EventKind> = counter.seen.lock().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Publish, EventKind::Update]);
    }

    /// Host-side source that keeps its handlers for the process lifetime.
    struct PinnedSource {
        handlers: Mutex<Vec<Arc<dyn SaveEventHandler>>>,
    }

    impl SaveEventSource for PinnedSource {
        fn register(&self, handler: Arc<dyn SaveEventHandler>) -> HookHandle {
            self.handlers.lock().push(handler);
            HookHandle::detached()
        }
    }

    #[tokio::test]
    async fn test_detached_handle_leaves_registration_alone() {
        let source = PinnedSource {
            handlers: Mutex::new(Vec::new()),
        };
        let counter = Counter::new();

        let handle = source.register(counter.clone());
        drop(handle);
        assert_eq!(source.handlers.lock().len(), 1);

        let handlers: Vec<_> = source.handlers.lock().clone();
        for handler in &handlers {
            handler.on_save(&SaveEvent::publish(1, "post")).await;
        }
        assert_eq!(counter.calls(), 1);

        // Dropping a detached handle next to a live registry touches nothing.
        let registry = HookRegistry::new();
        let _kept = registry.register(Counter::new());
        drop(HookHandle::detached());
        assert_eq!(registry.handler_count(), 1);
    }

    #[tokio::test]
    async fn test_clone_registry() {
        let registry = HookRegistry::new();
        let registry2 = registry.clone();
        let counter = Counter::new();
        let _handle = registry.register(counter.clone());

        registry2.emit(&SaveEvent::publish(1, "post")).await;
        assert_eq!(counter.calls(), 1);
        assert_eq!(registry2.handler_count(), 1);
    }
}
