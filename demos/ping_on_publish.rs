//! Example wiring the ping hook into a host's save events.
//!
//! This example shows how to:
//! - Load settings from a writable settings file
//! - Save the settings form as an administrator would
//! - Report status transitions and see which ones ping
//!
//! Requests are printed instead of sent. Set `RUST_LOG=pubindex_notifier=debug`
//! to see skip and delivery logs.
//!
//! Run with: cargo run --example ping_on_publish

use async_trait::async_trait;
use pubindex_notifier::notify::{PingRequest, PingResponse, PingTransport};
use pubindex_notifier::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Prints each request and answers 200.
struct DryRun;

#[async_trait]
impl PingTransport for DryRun {
    async fn send(&self, request: &PingRequest) -> std::result::Result<PingResponse, PingError> {
        println!("  -> GET {}", request.url);
        Ok(PingResponse { status: 200 })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Ping on Publish Example ===\n");

    let dir = std::env::temp_dir().join("pubindex-demo");
    let settings_path = dir.join("pubindex-settings.json");

    let store = SettingsStore::builder()
        .with_settings_file(&settings_path)
        .with_content_types(ContentTypeRegistry::default().with_type("page"))
        .build()?;

    let events = HookRegistry::new();
    let notifier = Notifier::with_transport(
        SiteProfile::new("https://example.com/feed/"),
        Arc::new(DryRun),
    );
    let plugin = Plugin::init(store, notifier, &events);

    println!("Initial settings: {:?}\n", plugin.settings());

    println!("Publishing before an API key is set (no ping):");
    events.emit_transition(1, "post", "draft", "publish").await;

    println!("\nSaving settings form...");
    let saved = plugin.save_settings(&SettingsForm {
        api_key: "abc123".to_string(),
        content_types: vec!["post".to_string(), "page".to_string()],
        ping_options: "publish".to_string(),
    })?;
    println!("Saved to {}: {:?}\n", settings_path.display(), saved);

    println!("Publishing a post:");
    events.emit_transition(2, "post", "draft", "publish").await;

    println!("\nPublishing a page:");
    events.emit_transition(3, "page", "pending", "publish").await;

    println!("\nUpdating a published post (publish-only mode, no ping):");
    events.emit_transition(2, "post", "publish", "publish").await;

    println!("\nSwitching to publish-and-update...");
    plugin.save_settings(&SettingsForm {
        api_key: "abc123".to_string(),
        content_types: vec!["post".to_string(), "page".to_string()],
        ping_options: "both".to_string(),
    })?;

    println!("Updating a published post:");
    events.emit_transition(2, "post", "publish", "publish").await;

    println!("\nTrashing a post (no ping):");
    events.emit_transition(2, "post", "publish", "trash").await;

    println!("\n=== Example Complete ===");
    Ok(())
}
