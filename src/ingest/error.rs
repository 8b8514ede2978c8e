//! Typed failures for feed validation and parsing.
//!
//! The rendered messages are stable: callers and tests match on them.

use thiserror::Error;

use crate::ingest::registry::Platform;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Envelope matches none of the adapter's known shapes.
    #[error("{platform} format error: {detail}")]
    FormatMismatch { platform: Platform, detail: String },

    /// A required field is present but has the wrong primitive type.
    #[error("{platform} format error: {detail}")]
    FieldType { platform: Platform, detail: String },

    /// Body still failed to parse once the anti-hijacking prefix was removed.
    #[error("{platform} format error: Failed to parse JSON after removing security prefix")]
    SecurityPrefix {
        platform: Platform,
        #[source]
        source: serde_json::Error,
    },

    /// Response body is not JSON at all. The platform is right but the
    /// payload is corrupt or truncated.
    #[error("{platform} format error: Response body is not valid JSON")]
    InvalidJson {
        platform: Platform,
        #[source]
        source: serde_json::Error,
    },

    /// No alias produced a usable challenge name.
    #[error("Challenge at index {index} has no valid name")]
    MissingName { index: usize },
}

impl FeedError {
    pub fn mismatch(platform: Platform, detail: impl Into<String>) -> Self {
        FeedError::FormatMismatch {
            platform,
            detail: detail.into(),
        }
    }

    pub fn field_type(platform: Platform, detail: impl Into<String>) -> Self {
        FeedError::FieldType {
            platform,
            detail: detail.into(),
        }
    }

    /// Platform that raised the error; `None` for sanitizer failures.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            FeedError::FormatMismatch { platform, .. }
            | FeedError::FieldType { platform, .. }
            | FeedError::SecurityPrefix { platform, .. }
            | FeedError::InvalidJson { platform, .. } => Some(*platform),
            FeedError::MissingName { .. } => None,
        }
    }

    /// True when the payload simply is not this platform's envelope,
    /// as opposed to a recognised but corrupt payload.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, FeedError::FormatMismatch { .. })
    }

    /// Short machine-friendly label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::FormatMismatch { .. } => "format_mismatch",
            FeedError::FieldType { .. } => "field_type",
            FeedError::SecurityPrefix { .. } => "security_prefix",
            FeedError::InvalidJson { .. } => "invalid_json",
            FeedError::MissingName { .. } => "missing_name",
        }
    }
}
