//! # Composer
//!
//! The in-progress outgoing message and the auto-reply toggle. Pure
//! local UI state; nothing here is validated or persisted - the send
//! coordinator enforces its own preconditions at submit time.

/// Draft text plus the auto-reply flag.
#[derive(Debug, Default)]
pub struct Composer {
    draft_text: String,
    auto_reply_enabled: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    /// Replace the draft wholesale.
    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft_text.clear();
    }

    pub fn auto_reply_enabled(&self) -> bool {
        self.auto_reply_enabled
    }

    /// Flip the auto-reply flag and return the new value.
    pub fn toggle_auto_reply(&mut self) -> bool {
        self.auto_reply_enabled = !self.auto_reply_enabled;
        self.auto_reply_enabled
    }
}
