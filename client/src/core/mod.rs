//! # Core Abstractions
//!
//! Centralized error handling (see [`error`]) and the service traits the
//! external managed backend is consumed through (see [`service`]).
//! Implementations are injected at construction rather than reached
//! through process-wide singletons, so every component can be exercised
//! against the in-memory backend in tests.

pub mod error;
pub mod service;

pub use error::{AppError, Result};
pub use service::{IdentityProvider, MessageStore, Subscription};
