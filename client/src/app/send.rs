//! # Send Coordinator
//!
//! Persists outgoing messages and schedules the optional delayed
//! auto-reply. A successful write clears the draft immediately and
//! requests a scroll to the latest row; the new message itself reaches
//! the view only once the feed re-observes it from the store. There is
//! no optimistic local insertion.

use crate::app::composer::Composer;
use crate::app::events::AppEvent;
use crate::core::error::{AppError, Result};
use crate::core::service::MessageStore;
use async_channel::Sender;
use parking_lot::Mutex;
use shared::{Identity, MessageDraft};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay between a submission and its automated reply.
pub const AUTO_REPLY_DELAY: Duration = Duration::from_millis(800);

/// Outcome of a [`SendCoordinator::submit`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was appended and the draft cleared.
    Sent,
    /// No active identity; nothing was written and the draft is intact.
    NotSignedIn,
    /// The draft was empty; nothing was written.
    EmptyDraft,
}

/// Coordinates message writes against the external store.
pub struct SendCoordinator {
    store: Arc<dyn MessageStore>,
    event_tx: Sender<AppEvent>,
    // Scheduled replies stay owned here so shutdown or a feature toggle
    // can cancel them before they fire.
    pending_replies: Mutex<Vec<JoinHandle<()>>>,
}

impl SendCoordinator {
    pub fn new(store: Arc<dyn MessageStore>, event_tx: Sender<AppEvent>) -> Self {
        Self {
            store,
            event_tx,
            pending_replies: Mutex::new(Vec::new()),
        }
    }

    /// Submit the composer's draft as the given identity.
    ///
    /// On success the draft clears immediately, before the feed reflects
    /// the write. On failure the draft is left untouched for retry and
    /// the error is returned so the UI layer can decide what to show.
    pub async fn submit(
        &self,
        identity: Option<&Identity>,
        composer: &mut Composer,
    ) -> Result<SubmitOutcome> {
        let Some(identity) = identity else {
            debug!("submit ignored: not signed in");
            return Ok(SubmitOutcome::NotSignedIn);
        };
        if composer.draft_text().is_empty() {
            debug!("submit ignored: empty draft");
            return Ok(SubmitOutcome::EmptyDraft);
        }

        let text = composer.draft_text().to_string();
        let auto_reply = composer.auto_reply_enabled();
        let draft = MessageDraft::new(&text, &identity.id, identity.avatar_uri.clone());

        let id = self.store.append(draft).await.map_err(|e| {
            warn!(error = %e, "message append failed, draft preserved");
            AppError::Write(e)
        })?;
        info!(message_id = %id, auto_reply, "message appended");

        composer.clear_draft();
        let _ = self.event_tx.send(AppEvent::ScrollToLatest).await;

        if auto_reply {
            self.schedule_auto_reply(text);
        }
        Ok(SubmitOutcome::Sent)
    }

    /// Schedule the canned reply [`AUTO_REPLY_DELAY`] after submission,
    /// independent of when the feed reflects the human message. A failed
    /// reply append is logged and dropped; it never crashes the client.
    fn schedule_auto_reply(&self, original: String) {
        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(AUTO_REPLY_DELAY).await;
            if let Err(e) = store.append(MessageDraft::bot_reply(&original)).await {
                warn!(error = %e, "auto-reply append failed");
            }
        });

        let mut pending = self.pending_replies.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Cancel every scheduled reply that has not fired yet.
    pub fn cancel_pending_replies(&self) {
        let mut pending = self.pending_replies.lock();
        for handle in pending.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for SendCoordinator {
    fn drop(&mut self) {
        self.cancel_pending_replies();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryMessageStore;
    use shared::BOT_AUTHOR_ID;

    fn coordinator_with_store() -> (SendCoordinator, Arc<MemoryMessageStore>) {
        let store = Arc::new(MemoryMessageStore::new());
        let (event_tx, _event_rx) = async_channel::unbounded();
        let coordinator =
            SendCoordinator::new(Arc::clone(&store) as Arc<dyn MessageStore>, event_tx);
        (coordinator, store)
    }

    fn signed_in() -> Identity {
        Identity::anonymous("me")
    }

    #[tokio::test]
    async fn submit_without_identity_writes_nothing() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.set_draft_text("hello");

        let outcome = coordinator.submit(None, &mut composer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::NotSignedIn);
        assert_eq!(store.message_count(), 0);
        assert_eq!(composer.draft_text(), "hello");
    }

    #[tokio::test]
    async fn empty_draft_is_a_no_op() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();

        let outcome = coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::EmptyDraft);
        assert_eq!(store.message_count(), 0);
    }

    #[tokio::test]
    async fn successful_submit_clears_draft_immediately() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.set_draft_text("hello");

        let outcome = coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Sent);
        // Cleared before any feed delivery could possibly confirm it.
        assert_eq!(composer.draft_text(), "");
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test]
    async fn failed_submit_preserves_the_draft() {
        let (coordinator, store) = coordinator_with_store();
        store.fail_next_append();
        let mut composer = Composer::new();
        composer.set_draft_text("keep me");

        let result = coordinator.submit(Some(&signed_in()), &mut composer).await;
        assert!(matches!(result, Err(AppError::Write(_))));
        assert_eq!(composer.draft_text(), "keep me");
        assert_eq!(store.message_count(), 0);

        // Retry with the preserved draft succeeds.
        let outcome = coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_reply_fires_after_the_delay_and_not_before() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.toggle_auto_reply();
        composer.set_draft_text("ping");

        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        assert_eq!(store.message_count(), 1);

        // Just shy of the delay: still only the human message.
        tokio::time::sleep(AUTO_REPLY_DELAY - Duration::from_millis(1)).await;
        assert_eq!(store.message_count(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(store.message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_reply_quotes_the_submitted_text() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.toggle_auto_reply();
        composer.set_draft_text("ping");

        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        tokio::time::sleep(AUTO_REPLY_DELAY + Duration::from_millis(10)).await;

        let (rx, _sub) = store.subscribe_ordered();
        let snapshot = rx.recv().await.unwrap();
        let bot = snapshot.iter().find(|m| m.is_from_bot()).unwrap();
        assert_eq!(bot.author_id, BOT_AUTHOR_ID);
        assert!(bot.text.contains("\"ping\""));
    }

    #[tokio::test(start_paused = true)]
    async fn no_auto_reply_when_disabled() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.set_draft_text("hello");

        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_a_scheduled_reply_from_firing() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.toggle_auto_reply();
        composer.set_draft_text("ping");

        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        coordinator.cancel_pending_replies();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_coordinator_cancels_scheduled_replies() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.toggle_auto_reply();
        composer.set_draft_text("ping");

        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        drop(coordinator);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_reply_uses_the_flag_captured_at_submit_time() {
        let (coordinator, store) = coordinator_with_store();
        let mut composer = Composer::new();
        composer.set_draft_text("no reply expected");

        // Toggle only after the submit has been issued.
        coordinator
            .submit(Some(&signed_in()), &mut composer)
            .await
            .unwrap();
        composer.toggle_auto_reply();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.message_count(), 1);
    }
}
