//! # View State
//!
//! State derived from backend pushes. The snapshot is always replaced
//! wholesale, never patched in place, so a reader can never observe a
//! torn feed.

use shared::Message;

/// State fed by the event loop and read by the presentation layer.
#[derive(Debug, Default)]
pub struct AppState {
    /// Most recent feed snapshot, in presentation order.
    pub messages: Vec<Message>,
    /// One-shot flag raised after a successful send.
    pub scroll_to_latest: bool,
}
