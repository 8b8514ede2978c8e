// src/lib.rs
//! Normalizes challenge listings from third-party CTF platforms into one
//! canonical [`ChallengeRecord`].
//!
//! The caller picks the platform (see [`ingest::config::FeedConfig`]); the
//! matching adapter validates the envelope, resolves fields through its alias
//! chains and hands every candidate to the shared sanitizer.

pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::ingest::error::FeedError;
pub use crate::ingest::registry::{AdapterRegistry, Platform};
pub use crate::ingest::types::{ChallengeAdapter, ChallengeId, ChallengeRecord};
pub use crate::ingest::{parse_feed, parse_feed_str};
