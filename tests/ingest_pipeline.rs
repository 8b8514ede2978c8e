// tests/ingest_pipeline.rs
use ctf_feed_ingest::ingest::parse_with;
use ctf_feed_ingest::ingest::sanitize::sanitize_all;
use ctf_feed_ingest::ingest::types::ChallengeCandidate;
use ctf_feed_ingest::{AdapterRegistry, ChallengeAdapter, ChallengeRecord, FeedError, Platform};
use serde_json::{json, Value};

/// Stand-in adapter that treats every string in an array as a challenge name.
struct NamesOnly;

impl ChallengeAdapter for NamesOnly {
    fn validate(&self, raw: &Value) -> Result<(), FeedError> {
        match raw {
            Value::Array(_) => Ok(()),
            _ => Err(FeedError::mismatch(Platform::Generic, "expected array")),
        }
    }

    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        self.validate(raw)?;
        let items = raw.as_array().map(Vec::as_slice).unwrap_or_default();
        sanitize_all(items.iter().map(|v| ChallengeCandidate {
            name: Some(v.clone()),
            ..Default::default()
        }))
    }

    fn platform(&self) -> Platform {
        Platform::Generic
    }
}

#[test]
fn registered_adapter_replaces_builtin() {
    let mut registry = AdapterRegistry::with_defaults();
    registry.register(Box::new(NamesOnly));

    let out = parse_with(&registry, Platform::Generic, &json!(["alpha", "beta"])).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].name, "beta");
    assert_eq!(out[1].id.to_string(), "2");
    assert_eq!(out[1].category, "misc");
}

#[test]
fn same_payload_can_fit_several_adapters() {
    // Structurally ambiguous: rCTF, picoCTF and Generic all accept this shape,
    // which is why the platform is always chosen by configuration.
    let raw = json!({"data": [{"id": 1, "name": "x", "points": 10}]});
    let registry = AdapterRegistry::with_defaults();
    for p in [Platform::Rctf, Platform::PicoCtf, Platform::Generic] {
        let out = parse_with(&registry, p, &raw).unwrap();
        assert_eq!(out[0].points, 10);
    }
}

#[test]
fn records_serialize_with_untagged_ids() {
    let raw = json!({"data": [{"id": 5, "name": "x"}]});
    let out = ctf_feed_ingest::parse_feed(Platform::Ctfd, &raw).unwrap();
    let v = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(v["id"], json!(5));
    assert_eq!(v["category"], json!("misc"));
    assert!(v.get("description").is_none());
}
