//! # Session State
//!
//! Holds the currently active identity and the login/logout intents.
//! Only two states exist: unauthenticated (initial) and authenticated;
//! logout and external invalidation both return to unauthenticated.

use crate::app::events::AppEvent;
use crate::core::error::{AppError, Result};
use crate::core::service::{IdentityProvider, Subscription};
use async_channel::Sender;
use shared::Identity;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Authentication state plus the lifetime identity-change subscription.
pub struct SessionState {
    provider: Arc<dyn IdentityProvider>,
    identity: Option<Identity>,
    // Held for the life of the client; released on drop.
    _identity_subscription: Subscription,
    forward_task: JoinHandle<()>,
}

impl SessionState {
    /// Create an unauthenticated session and attach the identity-change
    /// subscription, forwarding provider pushes into the app event
    /// channel. The subscription is established exactly once per client
    /// lifetime.
    pub fn new(provider: Arc<dyn IdentityProvider>, event_tx: Sender<AppEvent>) -> Self {
        let (rx, subscription) = provider.subscribe_identity();
        let forward_task = tokio::spawn(async move {
            while let Ok(update) = rx.recv().await {
                if event_tx.send(AppEvent::IdentityChanged(update)).await.is_err() {
                    break;
                }
            }
        });
        Self {
            provider,
            identity: None,
            _identity_subscription: subscription,
            forward_task,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Request an ephemeral identity. On failure the session stays
    /// unauthenticated and the error is surfaced for retry.
    pub async fn login_anonymous(&mut self) -> Result<Identity> {
        let identity = self.provider.sign_in_anonymous().await.map_err(|e| {
            warn!(error = %e, "anonymous login failed");
            AppError::Auth(e)
        })?;
        info!(user_id = %identity.id, "anonymous login succeeded");
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Request an identity through the interactive consent flow. A flow
    /// abandoned by the user is a failure, not a crash; same retry
    /// contract as anonymous login.
    pub async fn login_federated(&mut self) -> Result<Identity> {
        let identity = self.provider.sign_in_federated().await.map_err(|e| {
            warn!(error = %e, "federated login failed");
            AppError::Auth(e)
        })?;
        info!(user_id = %identity.id, "federated login succeeded");
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Clear the active identity. Idempotent when already logged out.
    pub async fn logout(&mut self) -> Result<()> {
        if self.identity.take().is_some() {
            self.provider.sign_out().await.map_err(AppError::Auth)?;
            info!("logged out");
        }
        Ok(())
    }

    /// Apply a provider-pushed identity change, e.g. an externally
    /// expired session arriving without any local intent.
    pub fn apply_external_change(&mut self, update: Option<Identity>) {
        if self.identity.is_some() && update.is_none() {
            info!("session invalidated externally");
        }
        self.identity = update;
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        self.forward_task.abort();
    }
}
