//! # Realtime Chat Client - Library Root
//!
//! Client-side synchronization and presentation logic for a minimal
//! realtime chat. Durable state (messages, auth sessions) lives behind
//! the service traits in [`core::service`]; this crate holds only a
//! read-only projection of what the backend last delivered.
//!
//! ## Event Flow
//!
//! ```text
//! user intents                     backend pushes
//! ------------                     --------------
//! login/logout  -> SessionState    identity changes -> AppEvent::IdentityChanged
//! submit()      -> SendCoordinator feed snapshots   -> AppEvent::FeedSnapshot
//!                      |
//!                      v
//!               MessageStore::append
//! ```
//!
//! A send never inserts the new message locally. The write goes to the
//! store, the store notifies its feed subscribers, and the client picks
//! the message up like any other - self and others are rendered through
//! the exact same path, so the feed stays the single source of truth.
//!
//! ## Modules
//!
//! - **[`core`]**: error type and the injected service traits
//! - **[`app`]**: orchestrator, session, feed, composer, send
//!   coordinator, and the row renderer
//! - **[`services`]**: in-process reference backend used by the demo
//!   binary and the test suite

pub mod app;
pub mod core;
pub mod services;
