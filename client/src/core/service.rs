//! # Service Traits
//!
//! Interface contracts for the external managed identity and
//! document-store service. The client consumes the backend exclusively
//! through these traits, taken as `Arc<dyn ...>` at construction; that
//! keeps the vendor swappable and lets tests substitute the in-memory
//! backend in [`crate::services::memory`].

use async_channel::Receiver;
use async_trait::async_trait;
use shared::{Identity, Message, MessageDraft};

/// Handle to a live push subscription.
///
/// Releasing the handle, explicitly or by dropping it, stops delivery
/// and frees the provider-side resources. Both long-lived streams (the
/// identity feed and the message feed) must be released on shutdown, and
/// the message feed additionally whenever it is re-established.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a provider-side release action.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Stop delivery and release provider-side resources.
    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// External identity provider: anonymous and federated login plus
/// provider-pushed identity-change notifications.
///
/// Transport-level failures surface as `Err(String)` at this seam and
/// are mapped into [`crate::core::error::AppError`] by the components.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Request an ephemeral anonymous identity.
    async fn sign_in_anonymous(&self) -> std::result::Result<Identity, String>;

    /// Request an identity through an interactive third-party consent
    /// flow. A flow abandoned by the user surfaces as an `Err`, not a
    /// crash.
    async fn sign_in_federated(&self) -> std::result::Result<Identity, String>;

    /// Clear the provider-side session. Idempotent.
    async fn sign_out(&self) -> std::result::Result<(), String>;

    /// Subscribe to identity changes pushed by the provider. Delivers
    /// the new active identity, or `None` when the session has been
    /// invalidated externally (e.g. expired).
    fn subscribe_identity(&self) -> (Receiver<Option<Identity>>, Subscription);
}

/// External message store: atomic appends plus an ordered change feed.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message as a single atomic write; no partial state is
    /// ever observable. The store resolves `created_at` to a monotonic
    /// server timestamp and returns the new document id.
    async fn append(&self, draft: MessageDraft) -> std::result::Result<String, String>;

    /// Subscribe to the message collection. Every change to the backing
    /// collection delivers a full snapshot of all current messages (not
    /// a diff) in store arrival order; very recent entries may still
    /// carry a pending `created_at`.
    fn subscribe_ordered(&self) -> (Receiver<Vec<Message>>, Subscription);
}
