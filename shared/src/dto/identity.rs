//! # Identity
//!
//! The principal associated with the current client session. Exactly one
//! or zero identities are active at a time; the value lives only in
//! process memory and is never persisted locally.

use serde::{Deserialize, Serialize};

/// The authenticated (or anonymous) principal for the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Opaque stable identifier assigned by the auth provider.
    pub id: String,
    /// Human-readable name; absent for anonymous identities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional avatar image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
}

impl Identity {
    /// An anonymous identity: an id and nothing else.
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            avatar_uri: None,
        }
    }

    /// Display label for greetings and headers.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous User")
    }
}
