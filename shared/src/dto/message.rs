//! # Messages and Feed Ordering
//!
//! Chat messages as stored by the backend, the payload used to append new
//! ones, the automated-sender constants, and the ordering rule applied to
//! every feed snapshot before it is presented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Reserved author id for synthetic, non-human messages.
pub const BOT_AUTHOR_ID: &str = "bot";

/// Fixed built-in avatar for the automated sender (1x1 PNG data URI).
pub const BOT_AVATAR_URI: &str = "data:image/png;base64,\
iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Canned reply text, echoing the submitted message verbatim.
pub fn auto_reply_text(original: &str) -> String {
    format!(
        "Hello, I am a bot with no intellect yet so I don't know how to answer \"{original}\""
    )
}

/// A chat message as held by the store.
///
/// The client never updates or deletes messages; it holds a read-only
/// projection of what the store last delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier, unique and stable.
    pub id: String,
    /// Sender-supplied display text.
    pub text: String,
    /// Sending identity's id, or [`BOT_AUTHOR_ID`] for automated senders.
    pub author_id: String,
    /// Avatar copied from the sender's identity at send time, never
    /// re-resolved later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
    /// Server-assigned monotonic timestamp, the sole ordering key.
    /// `None` while the write is still pending store confirmation.
    pub created_at: Option<DateTime<Utc>>,
    /// Store-assigned insertion order; breaks timestamp ties only.
    pub seq: u64,
}

impl Message {
    /// Whether this message came from the automated sender.
    pub fn is_from_bot(&self) -> bool {
        self.author_id == BOT_AUTHOR_ID
    }
}

/// Payload for appending a new message.
///
/// `created_at` is always resolved server-side, so the draft carries no
/// timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
}

impl MessageDraft {
    pub fn new(
        text: impl Into<String>,
        author_id: impl Into<String>,
        avatar_uri: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            author_id: author_id.into(),
            avatar_uri,
        }
    }

    /// The automated reply to a just-submitted message.
    pub fn bot_reply(original: &str) -> Self {
        Self {
            text: auto_reply_text(original),
            author_id: BOT_AUTHOR_ID.to_string(),
            avatar_uri: Some(BOT_AVATAR_URI.to_string()),
        }
    }
}

/// Sort a snapshot into presentation order.
///
/// Ascending by `created_at`; equal timestamps break ties by store
/// insertion order; entries whose timestamp is still pending sort last,
/// stable in arrival order.
pub fn sort_snapshot(messages: &mut [Message]) {
    messages.sort_by(compare_feed_order);
}

fn compare_feed_order(a: &Message, b: &Message) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.seq.cmp(&b.seq)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        // `sort_by` is stable, so pending entries keep arrival order.
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn msg(id: &str, seq: u64, at: Option<i64>) -> Message {
        Message {
            id: id.to_string(),
            text: format!("text-{id}"),
            author_id: "u-1".to_string(),
            avatar_uri: None,
            created_at: at.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
            seq,
        }
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn sorts_ascending_by_created_at() {
        let mut snapshot = vec![msg("c", 2, Some(30)), msg("a", 0, Some(10)), msg("b", 1, Some(20))];
        sort_snapshot(&mut snapshot);
        assert_eq!(ids(&snapshot), ["a", "b", "c"]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_insertion_order() {
        let mut snapshot = vec![msg("second", 5, Some(10)), msg("first", 3, Some(10))];
        sort_snapshot(&mut snapshot);
        assert_eq!(ids(&snapshot), ["first", "second"]);
    }

    #[test]
    fn pending_timestamps_sort_last_in_arrival_order() {
        let mut snapshot = vec![
            msg("pending-1", 10, None),
            msg("resolved", 0, Some(99)),
            msg("pending-2", 11, None),
        ];
        sort_snapshot(&mut snapshot);
        assert_eq!(ids(&snapshot), ["resolved", "pending-1", "pending-2"]);
    }

    #[test]
    fn fully_pending_snapshot_keeps_arrival_order() {
        let mut snapshot = vec![msg("x", 7, None), msg("y", 8, None), msg("z", 9, None)];
        sort_snapshot(&mut snapshot);
        assert_eq!(ids(&snapshot), ["x", "y", "z"]);
    }

    #[test]
    fn auto_reply_quotes_the_original_verbatim() {
        let text = auto_reply_text("ping");
        assert!(text.contains("\"ping\""));

        let draft = MessageDraft::bot_reply("ping");
        assert_eq!(draft.author_id, BOT_AUTHOR_ID);
        assert_eq!(draft.avatar_uri.as_deref(), Some(BOT_AVATAR_URI));
        assert!(draft.text.contains("\"ping\""));
    }

    #[test]
    fn pending_created_at_serializes_as_null() {
        let message = msg("m-1", 0, None);
        let json = serde_json::to_value(&message).unwrap();
        assert!(json["created_at"].is_null());

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, None);
    }
}
