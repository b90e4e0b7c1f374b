//! # Application Orchestrator
//!
//! [`ChatApp`] wires the components together and owns the single
//! consumer loop for backend pushes.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  ChatApp (single consumer)                           │
//! │  - on_tick() drains AppEvents without blocking       │
//! │  - login/logout/submit are user intents              │
//! │  - rows() projects the snapshot for presentation     │
//! └───────────────▲──────────────────────▲───────────────┘
//!                 │ async_channel        │
//!       SessionState forward      FeedSubscriber forward
//!       (identity pushes)         (sorted feed snapshots)
//! ```
//!
//! Both streams deliver into one channel, so their event bodies apply
//! atomically with respect to each other; ordering between the streams
//! is not guaranteed. The feed snapshot is the only state mutated by an
//! external push source and it is always replaced wholesale.

pub mod composer;
pub mod events;
pub mod feed;
pub mod render;
pub mod send;
pub mod session;
pub mod state;

pub use composer::Composer;
pub use events::AppEvent;
pub use feed::FeedSubscriber;
pub use render::{MessageRow, RowAuthor};
pub use send::{SendCoordinator, SubmitOutcome, AUTO_REPLY_DELAY};
pub use session::SessionState;
pub use state::AppState;

use crate::core::error::Result;
use crate::core::service::{IdentityProvider, MessageStore};
use async_channel::Receiver;
use shared::{Identity, Message};
use std::sync::Arc;

/// The chat client: session, live feed, composer, and send coordination
/// over injected backend handles.
pub struct ChatApp {
    pub session: SessionState,
    pub feed: FeedSubscriber,
    pub composer: Composer,
    coordinator: SendCoordinator,
    state: AppState,
    event_rx: Receiver<AppEvent>,
}

impl ChatApp {
    /// Wire the client against the given backend handles. The identity
    /// subscription is attached here, once, for the client's lifetime.
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn MessageStore>) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        let session = SessionState::new(provider, event_tx.clone());
        let feed = FeedSubscriber::new(Arc::clone(&store), event_tx.clone());
        let coordinator = SendCoordinator::new(store, event_tx);
        Self {
            session,
            feed,
            composer: Composer::new(),
            coordinator,
            state: AppState::default(),
            event_rx,
        }
    }

    /// Log in anonymously and activate the live feed.
    pub async fn login_anonymous(&mut self) -> Result<Identity> {
        let identity = self.session.login_anonymous().await?;
        self.feed.activate();
        Ok(identity)
    }

    /// Log in through the federated consent flow and activate the feed.
    pub async fn login_federated(&mut self) -> Result<Identity> {
        let identity = self.session.login_federated().await?;
        self.feed.activate();
        Ok(identity)
    }

    /// Release the feed subscription, then clear the session.
    pub async fn logout(&mut self) -> Result<()> {
        self.feed.deactivate();
        self.session.logout().await
    }

    /// Submit the current draft as the active identity. See
    /// [`SendCoordinator::submit`] for the success/failure contract.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let identity = self.session.identity().cloned();
        self.coordinator
            .submit(identity.as_ref(), &mut self.composer)
            .await
    }

    /// Flip the auto-reply toggle. Disabling it cancels any scheduled
    /// reply that has not fired yet.
    pub fn toggle_auto_reply(&mut self) -> bool {
        let enabled = self.composer.toggle_auto_reply();
        if !enabled {
            self.coordinator.cancel_pending_replies();
        }
        enabled
    }

    /// Drain pending events without blocking. Call once per UI tick.
    pub fn on_tick(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::IdentityChanged(update) => {
                // An externally invalidated session releases the feed
                // just like an explicit logout would.
                if update.is_none() && self.session.is_authenticated() {
                    self.feed.deactivate();
                }
                self.session.apply_external_change(update);
            }
            AppEvent::FeedSnapshot(snapshot) => {
                // Snapshots racing a logout are discarded, not applied;
                // the view stays frozen at the last pre-logout snapshot.
                if self.feed.is_active() {
                    self.state.messages = snapshot;
                }
            }
            AppEvent::ScrollToLatest => {
                self.state.scroll_to_latest = true;
            }
        }
    }

    /// Current feed snapshot in presentation order.
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Take the one-shot scroll-to-latest request, if any.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.state.scroll_to_latest)
    }

    /// Project the current snapshot into visual rows for the active
    /// identity.
    pub fn rows(&self) -> Vec<MessageRow> {
        render::project(&self.state.messages, self.session.identity())
    }
}
