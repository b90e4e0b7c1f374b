//! # Chat Domain Objects
//!
//! - [`identity`] - the authenticated (or anonymous) principal
//! - [`message`] - messages, append payloads, and the feed ordering rule

pub mod identity;
pub mod message;

pub use identity::*;
pub use message::*;
