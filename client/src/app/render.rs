//! # Message List Renderer
//!
//! Pure projection from the current feed snapshot to visual rows. No
//! state, no side effects; re-derived on every snapshot or identity
//! change.

use shared::{Identity, Message};

/// Who a rendered row is attributed to; drives avatar placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAuthor {
    /// Sent by the active identity; rendered trailing (avatar after the
    /// text, row aligned to the end).
    SelfUser,
    /// Anyone else, the bot included; rendered leading.
    Other,
}

/// A single visual row derived from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub avatar_uri: Option<String>,
    pub author: RowAuthor,
}

/// Project a snapshot into rows for the given active identity.
///
/// A message classifies as [`RowAuthor::SelfUser`] iff its `author_id`
/// equals the active identity's id. With no active identity every row
/// classifies as [`RowAuthor::Other`]. The underlying messages are never
/// mutated; a later identity change simply reclassifies on the next
/// projection.
pub fn project(messages: &[Message], identity: Option<&Identity>) -> Vec<MessageRow> {
    messages
        .iter()
        .map(|message| MessageRow {
            id: message.id.clone(),
            text: message.text.clone(),
            avatar_uri: message.avatar_uri.clone(),
            author: classify(message, identity),
        })
        .collect()
}

fn classify(message: &Message, identity: Option<&Identity>) -> RowAuthor {
    match identity {
        Some(identity) if message.author_id == identity.id => RowAuthor::SelfUser,
        _ => RowAuthor::Other,
    }
}
