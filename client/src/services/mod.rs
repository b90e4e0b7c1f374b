//! # Backend Service Implementations
//!
//! Concrete implementations of the service traits in
//! [`crate::core::service`]. Only the in-process reference backend lives
//! here; a production deployment would add a vendor-backed
//! implementation next to it.

pub mod memory;
