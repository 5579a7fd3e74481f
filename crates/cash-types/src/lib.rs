//! Foundation types for cash.
//!
//! This crate contains the pieces shared by every other cash crate: the
//! error taxonomy, the key-value persistence contract the filesystem is
//! stored through, and the TOML configuration.

pub mod config;
pub mod error;
pub mod store;
