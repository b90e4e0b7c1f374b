//! # Message Feed Subscriber
//!
//! Maintains the live, ordered view of the message collection. Exactly
//! one store subscription exists at a time; every delivery is a full
//! snapshot which is sorted and republished wholesale, never patched.

use crate::app::events::AppEvent;
use crate::core::service::{MessageStore, Subscription};
use async_channel::Sender;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Live subscription plus the task forwarding its snapshots into the
/// app event channel. Dropping it releases both.
struct ActiveFeed {
    _subscription: Subscription,
    forward_task: JoinHandle<()>,
}

impl Drop for ActiveFeed {
    fn drop(&mut self) {
        self.forward_task.abort();
    }
}

/// Subscribes to the store's ordered collection and republishes each
/// snapshot as an [`AppEvent::FeedSnapshot`].
pub struct FeedSubscriber {
    store: Arc<dyn MessageStore>,
    event_tx: Sender<AppEvent>,
    active: Option<ActiveFeed>,
}

impl FeedSubscriber {
    pub fn new(store: Arc<dyn MessageStore>, event_tx: Sender<AppEvent>) -> Self {
        Self {
            store,
            event_tx,
            active: None,
        }
    }

    /// Establish the live subscription. Any previous subscription is
    /// released first, so re-activation after logout/login never leaks.
    pub fn activate(&mut self) {
        self.deactivate();

        let (rx, subscription) = self.store.subscribe_ordered();
        let event_tx = self.event_tx.clone();
        let forward_task = tokio::spawn(async move {
            while let Ok(mut snapshot) = rx.recv().await {
                shared::sort_snapshot(&mut snapshot);
                debug!(message_count = snapshot.len(), "feed snapshot received");
                if event_tx.send(AppEvent::FeedSnapshot(snapshot)).await.is_err() {
                    break;
                }
            }
            // A closed delivery channel is a transient drop: the feed
            // freezes at its last snapshot until reactivated. Nothing is
            // surfaced to the user.
            debug!("feed delivery channel closed");
        });

        self.active = Some(ActiveFeed {
            _subscription: subscription,
            forward_task,
        });
        info!("feed subscription established");
    }

    /// Release the subscription. The last published snapshot stays
    /// current until a new activation.
    pub fn deactivate(&mut self) {
        if self.active.take().is_some() {
            info!("feed subscription released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
