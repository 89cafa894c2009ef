//! Wiring the notifier into a host's save events.
//!
//! Nothing registers itself: the host calls [`Plugin::init`] with its
//! settings store, a notifier and an event source.

mod plugin;
mod registry;

pub use plugin::{PingHook, Plugin};
pub use registry::{HookHandle, HookRegistry, SaveEventHandler, SaveEventSource};
