//! # Common Error Types
//!
//! Consolidated error handling for the chat client. No error here is
//! fatal to the process: the worst outcome anywhere in the client is a
//! stale or incomplete view.

use thiserror::Error;

/// Application-wide error type covering every failure the client can
/// observe.
///
/// Each variant carries a descriptive `String` with context from the
/// failing layer. Write and auth failures are returned to the caller so
/// the UI layer can decide whether to show a retry affordance instead of
/// the error being swallowed at the point of failure.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login rejected or abandoned by the user. Recoverable; the session
    /// stays unauthenticated and the user may retry.
    #[error("auth error: {0}")]
    Auth(String),

    /// Message append rejected by the store. Recoverable; the draft is
    /// preserved so the user may retry.
    #[error("write error: {0}")]
    Write(String),

    /// Feed or identity stream interrupted. The feed freezes at its last
    /// snapshot until a new subscription is established.
    #[error("subscription error: {0}")]
    Subscription(String),

    /// Invalid client state transition.
    #[error("state error: {0}")]
    State(String),
}

/// Convenience alias used throughout the client crate.
pub type Result<T> = std::result::Result<T, AppError>;
