// src/ingest/mod.rs
pub mod coerce;
pub mod config;
pub mod error;
pub mod fields;
pub mod providers;
pub mod registry;
pub mod sanitize;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::{Lazy, OnceCell};
use serde_json::Value;

use crate::ingest::error::FeedError;
use crate::ingest::registry::{AdapterRegistry, Platform};
use crate::ingest::types::ChallengeRecord;

/// Describe metrics once, so whichever recorder is installed sees help text.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_challenges_total",
            "Canonical challenge records produced, per platform."
        );
        describe_counter!(
            "ingest_feed_errors_total",
            "Feeds rejected by validation or sanitizing, per platform and kind."
        );
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
    });
}

static DEFAULT_REGISTRY: Lazy<AdapterRegistry> = Lazy::new(AdapterRegistry::with_defaults);

/// Built-in adapters, shared. Adapters are stateless so concurrent use is fine.
pub fn default_registry() -> &'static AdapterRegistry {
    &DEFAULT_REGISTRY
}

/// Parse one already-decoded feed with the adapter for `platform`.
/// Either every challenge parses or the call fails as a whole.
pub fn parse_feed(platform: Platform, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
    parse_with(default_registry(), platform, raw)
}

/// Like [`parse_feed`] but starting from the response body. Pointer Overflow
/// bodies that are not valid JSON are handed over as a JSON string so its
/// adapter can strip the security prefix. For every other platform such a
/// body is a corrupt payload and fails with [`FeedError::InvalidJson`].
pub fn parse_feed_str(platform: Platform, body: &str) -> Result<Vec<ChallengeRecord>, FeedError> {
    match serde_json::from_str::<Value>(body) {
        Ok(raw) => parse_feed(platform, &raw),
        Err(_) if platform == Platform::PointerOverflow => {
            parse_feed(platform, &Value::String(body.to_string()))
        }
        Err(source) => {
            ensure_metrics_described();
            record(platform, 0.0, Err(FeedError::InvalidJson { platform, source }))
        }
    }
}

/// Parse through an explicit registry, recording telemetry.
pub fn parse_with(
    registry: &AdapterRegistry,
    platform: Platform,
    raw: &Value,
) -> Result<Vec<ChallengeRecord>, FeedError> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let result = registry.parse(platform, raw);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    record(platform, ms, result)
}

fn record(
    platform: Platform,
    ms: f64,
    result: Result<Vec<ChallengeRecord>, FeedError>,
) -> Result<Vec<ChallengeRecord>, FeedError> {
    histogram!("ingest_parse_ms", "platform" => platform.id()).record(ms);

    match &result {
        Ok(records) => {
            tracing::debug!(platform = platform.id(), count = records.len(), "feed parsed");
            counter!("ingest_challenges_total", "platform" => platform.id())
                .increment(records.len() as u64);
        }
        Err(e) => {
            tracing::warn!(platform = platform.id(), kind = e.kind(), error = %e, "feed rejected");
            counter!(
                "ingest_feed_errors_total",
                "platform" => platform.id(),
                "kind" => e.kind()
            )
            .increment(1);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_is_idempotent_and_validate_agrees() {
        let raw = json!({"data": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]});
        let first = parse_feed(Platform::Ctfd, &raw).unwrap();
        let second = parse_feed(Platform::Ctfd, &raw).unwrap();
        assert_eq!(first, second);
        assert!(default_registry()
            .get(Platform::Ctfd)
            .unwrap()
            .validate(&raw)
            .is_ok());
    }

    #[test]
    fn invalid_json_body_reaches_prefix_aware_adapter() {
        let body = r#")]}'{"challenges":[{"cid":1,"name":"Web 100 Cookies"}]}"#;
        let out = parse_feed_str(Platform::PointerOverflow, body).unwrap();
        assert_eq!(out[0].category, "web");

        let err = parse_feed_str(Platform::Ctfd, body).unwrap_err();
        assert!(matches!(err, FeedError::InvalidJson { .. }));
        assert!(!err.is_shape_mismatch());
    }

    #[test]
    fn truncated_body_is_corrupt_not_wrong_platform() {
        let body = r#"{"success":true,"data":[{"id":1,"#;
        for platform in [Platform::Ctfd, Platform::Rctf, Platform::Generic] {
            let err = parse_feed_str(platform, body).unwrap_err();
            assert!(!err.is_shape_mismatch(), "{platform}");
            assert_eq!(err.kind(), "invalid_json");
            assert_eq!(err.platform(), Some(platform));
            assert_eq!(
                err.to_string(),
                format!("{platform} format error: Response body is not valid JSON")
            );
        }

        let err = parse_feed_str(Platform::PointerOverflow, body).unwrap_err();
        assert!(matches!(err, FeedError::SecurityPrefix { .. }));
    }
}
