//! # Shared Chat Domain Types
//!
//! This library defines the contract between the chat client and whatever
//! backend serves it: identities, messages, append payloads, and the feed
//! ordering rule. All types use JSON serialization via `serde`.
//!
//! ## Wire Format
//!
//! - Field names use **snake_case** in Rust and in JSON (default `serde`
//!   behavior).
//! - Optional fields are omitted from JSON when `None`.
//! - A message whose server timestamp has not been confirmed yet carries
//!   `"created_at": null` on the wire; see [`dto::message`] for how such
//!   entries sort.

pub mod dto;

// Re-export commonly used types for convenience; shared is a small
// domain-type library where everything is public API.
pub use dto::*;
