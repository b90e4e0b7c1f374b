//! # Application Events
//!
//! Push updates and task results delivered to the orchestrator's single
//! consumer loop. Both long-lived backend streams and the send path feed
//! this one channel, so event bodies are applied atomically with respect
//! to each other; ordering *between* the two streams is not guaranteed.

use shared::{Identity, Message};

/// Events drained by [`crate::app::ChatApp::on_tick`].
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Provider-pushed identity change; `None` means the session was
    /// invalidated externally.
    IdentityChanged(Option<Identity>),
    /// Full replacement feed snapshot, already in presentation order.
    FeedSnapshot(Vec<Message>),
    /// A successful send requested a scroll to the latest row.
    ScrollToLatest,
}
