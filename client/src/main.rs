//! Demo binary: runs the chat client against the in-memory backend.
//!
//! Logs in anonymously, posts a message, posts a second one with the
//! auto-reply bot enabled, and prints the rendered rows once the feed
//! has caught up.

use client::app::{ChatApp, RowAuthor, AUTO_REPLY_DELAY};
use client::services::memory::{MemoryIdentityProvider, MemoryMessageStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("client=info")),
        )
        .init();

    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryMessageStore::new());
    let mut app = ChatApp::new(provider, store);

    let me = app.login_anonymous().await.expect("anonymous login");
    info!(user = %me.label(), "signed in");

    app.composer.set_draft_text("hello");
    app.submit().await.expect("submit hello");

    app.toggle_auto_reply();
    app.composer.set_draft_text("ping");
    app.submit().await.expect("submit ping");

    // Give the feed and the delayed auto-reply time to arrive.
    tokio::time::sleep(AUTO_REPLY_DELAY + Duration::from_millis(100)).await;
    app.on_tick();

    for row in app.rows() {
        let who = match row.author {
            RowAuthor::SelfUser => "me",
            RowAuthor::Other => "other",
        };
        println!("[{who}] {}", row.text);
    }

    app.logout().await.expect("logout");
}
