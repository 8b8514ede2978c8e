// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::ingest::error::FeedError;
use crate::ingest::registry::Platform;

/// Platform-native challenge identifier. Used as a lookup key only;
/// two platforms may well hand out the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChallengeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeId::Int(n) => write!(f, "{n}"),
            ChallengeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ChallengeId {
    fn from(n: i64) -> Self {
        ChallengeId::Int(n)
    }
}

impl From<&str> for ChallengeId {
    fn from(s: &str) -> Self {
        ChallengeId::Text(s.to_string())
    }
}

/// Canonical challenge record. Only the sanitizer builds these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub name: String,     // trimmed, never a placeholder
    pub category: String, // lowercased, "misc" when unknown
    pub points: u64,
    pub solves: u64,
    pub solved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Loosely typed adapter output, still carrying raw JSON values.
/// Every field is coerced by [`crate::ingest::sanitize::sanitize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeCandidate {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub category: Option<Value>,
    pub points: Option<Value>,
    pub solves: Option<Value>,
    pub solved: Option<Value>,
    pub description: Option<String>,
    pub tags: Vec<Value>,
}

/// One adapter per platform. Implementations are stateless, so the same
/// instance may serve any number of feeds concurrently.
pub trait ChallengeAdapter: Send + Sync {
    /// Structural checks only; never touches field contents beyond shallow probing.
    fn validate(&self, raw: &Value) -> Result<(), FeedError>;

    /// Re-validates, then maps every challenge into a sanitized record in source order.
    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError>;

    fn platform(&self) -> Platform;
}
