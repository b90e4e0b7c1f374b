//! # In-Memory Backend
//!
//! In-process reference implementation of [`IdentityProvider`] and
//! [`MessageStore`], standing in for the external managed service. Used
//! by the demo binary and throughout the test suite.
//!
//! The store mirrors the contract the client is written against:
//! server-assigned monotonic timestamps, an insertion sequence for tie
//! breaking, and full-snapshot notifications to every live subscriber on
//! each change. Failure and pending-timestamp injection switches exist
//! for exercising the error paths.

use crate::core::service::{IdentityProvider, MessageStore, Subscription};
use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use shared::{Identity, Message, MessageDraft};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

/// In-process identity provider.
///
/// Anonymous sign-in mints a fresh ephemeral identity. Federated sign-in
/// hands out the configured identity, or fails as an abandoned consent
/// flow when none was configured.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    federated: Option<Identity>,
    current: Mutex<Option<Identity>>,
    subscribers: Mutex<Vec<Sender<Option<Identity>>>>,
    fail_next_sign_in: AtomicBool,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose federated consent flow completes with `identity`.
    pub fn with_federated(identity: Identity) -> Self {
        Self {
            federated: Some(identity),
            ..Self::default()
        }
    }

    /// Make the next sign-in attempt fail, simulating a rejected login.
    pub fn fail_next_sign_in(&self) {
        self.fail_next_sign_in.store(true, Ordering::SeqCst);
    }

    /// Invalidate the current session from the provider side, as an
    /// expired session would be.
    pub fn expire_session(&self) {
        if self.current.lock().take().is_some() {
            self.broadcast(None);
        }
    }

    fn take_injected_failure(&self) -> bool {
        self.fail_next_sign_in.swap(false, Ordering::SeqCst)
    }

    fn broadcast(&self, update: Option<Identity>) {
        self.subscribers
            .lock()
            .retain(|tx| tx.try_send(update.clone()).is_ok());
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in_anonymous(&self) -> Result<Identity, String> {
        if self.take_injected_failure() {
            return Err("sign-in rejected".to_string());
        }
        let identity = Identity::anonymous(Uuid::new_v4().to_string());
        *self.current.lock() = Some(identity.clone());
        self.broadcast(Some(identity.clone()));
        debug!(user_id = %identity.id, "anonymous identity issued");
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<Identity, String> {
        if self.take_injected_failure() {
            return Err("sign-in rejected".to_string());
        }
        match &self.federated {
            Some(identity) => {
                *self.current.lock() = Some(identity.clone());
                self.broadcast(Some(identity.clone()));
                debug!(user_id = %identity.id, "federated identity issued");
                Ok(identity.clone())
            }
            None => Err("consent flow abandoned".to_string()),
        }
    }

    async fn sign_out(&self) -> Result<(), String> {
        if self.current.lock().take().is_some() {
            self.broadcast(None);
        }
        Ok(())
    }

    fn subscribe_identity(&self) -> (Receiver<Option<Identity>>, Subscription) {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.lock().push(tx.clone());
        let subscription = Subscription::new(move || {
            tx.close();
        });
        (rx, subscription)
    }
}

/// In-process message store with monotonic server timestamps and
/// full-snapshot change notifications.
#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<Vec<Message>>,
    subscribers: Mutex<Vec<Sender<Vec<Message>>>>,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
    next_seq: AtomicU64,
    fail_next_append: AtomicBool,
    hold_timestamps: AtomicBool,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next append fail, simulating a store or network error.
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    /// Leave `created_at` pending on subsequent appends until
    /// [`resolve_pending`](Self::resolve_pending) is called. Mimics the
    /// window between a write and the store confirming its server
    /// timestamp.
    pub fn hold_timestamps(&self) {
        self.hold_timestamps.store(true, Ordering::SeqCst);
    }

    /// Resolve every pending timestamp in insertion order and notify
    /// subscribers of the change.
    pub fn resolve_pending(&self) {
        self.hold_timestamps.store(false, Ordering::SeqCst);
        {
            let mut messages = self.messages.lock();
            for message in messages.iter_mut().filter(|m| m.created_at.is_none()) {
                message.created_at = Some(self.next_timestamp());
            }
        }
        self.notify();
    }

    /// Number of messages currently held.
    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Number of live feed subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    /// Strictly monotonic server clock: never hands out a timestamp at
    /// or before the previous one.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last_timestamp.lock();
        let mut ts = Utc::now();
        if let Some(prev) = *last {
            if ts <= prev {
                ts = prev + Duration::milliseconds(1);
            }
        }
        *last = Some(ts);
        ts
    }

    fn notify(&self) {
        let snapshot = self.messages.lock().clone();
        self.subscribers
            .lock()
            .retain(|tx| tx.try_send(snapshot.clone()).is_ok());
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, draft: MessageDraft) -> Result<String, String> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err("append rejected".to_string());
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let created_at = if self.hold_timestamps.load(Ordering::SeqCst) {
            None
        } else {
            Some(self.next_timestamp())
        };
        let message = Message {
            id: Uuid::new_v4().to_string(),
            text: draft.text,
            author_id: draft.author_id,
            avatar_uri: draft.avatar_uri,
            created_at,
            seq,
        };
        let id = message.id.clone();
        self.messages.lock().push(message);
        debug!(message_id = %id, seq, "message appended");
        self.notify();
        Ok(id)
    }

    fn subscribe_ordered(&self) -> (Receiver<Vec<Message>>, Subscription) {
        let (tx, rx) = async_channel::unbounded();
        // New subscribers see the existing history immediately.
        let _ = tx.try_send(self.messages.lock().clone());
        self.subscribers.lock().push(tx.clone());
        let subscription = Subscription::new(move || {
            tx.close();
        });
        (rx, subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str) -> MessageDraft {
        MessageDraft::new(text, "u-1", None)
    }

    #[tokio::test]
    async fn timestamps_are_strictly_monotonic() {
        let store = MemoryMessageStore::new();
        for i in 0..20 {
            store.append(draft(&format!("m{i}"))).await.unwrap();
        }

        let messages = store.messages.lock().clone();
        for pair in messages.windows(2) {
            assert!(pair[0].created_at.unwrap() < pair[1].created_at.unwrap());
        }
    }

    #[tokio::test]
    async fn held_timestamps_stay_pending_until_resolved() {
        let store = MemoryMessageStore::new();
        store.hold_timestamps();
        store.append(draft("pending")).await.unwrap();
        assert_eq!(store.messages.lock()[0].created_at, None);

        store.resolve_pending();
        assert!(store.messages.lock()[0].created_at.is_some());
    }

    #[tokio::test]
    async fn injected_append_failure_fires_once() {
        let store = MemoryMessageStore::new();
        store.fail_next_append();
        assert!(store.append(draft("lost")).await.is_err());
        assert!(store.append(draft("kept")).await.is_ok());
        assert_eq!(store.message_count(), 1);
    }

    #[tokio::test]
    async fn released_subscriptions_are_pruned() {
        let store = MemoryMessageStore::new();
        let (_rx_a, sub_a) = store.subscribe_ordered();
        let (_rx_b, _sub_b) = store.subscribe_ordered();
        assert_eq!(store.subscriber_count(), 2);

        sub_a.release();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn expired_session_pushes_none_to_subscribers() {
        let provider = MemoryIdentityProvider::new();
        let (rx, _sub) = provider.subscribe_identity();

        provider.sign_in_anonymous().await.unwrap();
        assert!(rx.recv().await.unwrap().is_some());

        provider.expire_session();
        assert!(rx.recv().await.unwrap().is_none());
    }
}
