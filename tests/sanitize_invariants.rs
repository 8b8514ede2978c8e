// tests/sanitize_invariants.rs
//
// Invariants every adapter must uphold once output has been sanitized:
// counts are clamped integers, categories are lowercase/trimmed/defaulted,
// and repeated calls give identical results.

use ctf_feed_ingest::ingest::default_registry;
use ctf_feed_ingest::{parse_feed, Platform};
use serde_json::{json, Value};

/// One messy feed per platform: first item has a negative score, a float-ish
/// string solve count and a padded uppercase category; second item has a
/// float score, negative solves and no category.
fn messy_feeds() -> Vec<(Platform, Value, [u64; 2])> {
    vec![
        (
            Platform::Ctfd,
            json!({"success": true, "data": [
                {"id": 1, "name": "A", "category": " CRYPTO ", "value": -5, "solves": "3.9"},
                {"id": 2, "name": "B", "value": 12.9, "solves": -1}
            ]}),
            [0, 12],
        ),
        (
            Platform::Gzctf,
            json!([
                {"id": 1, "title": "A", "category": " CRYPTO ", "score": -5, "solves": "3.9"},
                {"id": 2, "title": "B", "score": 12.9, "solves": -1}
            ]),
            [0, 12],
        ),
        (
            Platform::Rctf,
            json!({"kind": "goodChallenges", "data": [
                {"id": "a", "name": "A", "category": " CRYPTO ", "points": -5, "solves": "3.9"},
                {"id": "b", "name": "B", "points": 12.9, "solves": -1}
            ]}),
            [0, 12],
        ),
        (
            Platform::PicoCtf,
            json!({"results": [
                {"id": 1, "name": "A", "category": " CRYPTO ", "points": -5, "solves": "3.9"},
                {"id": 2, "name": "B", "points": 12.9, "solves": -1}
            ]}),
            [0, 12],
        ),
        (
            // Points derive from solve_count: 500 - 10*3, and 500 for clamped -1.
            Platform::Zero7Ctf,
            json!([
                {"title": "A", "category": " CRYPTO ", "solve_count": "3.9"},
                {"title": "B", "solve_count": -1}
            ]),
            [470, 500],
        ),
        (
            Platform::PointerOverflow,
            json!({"challenges": [
                {"cid": 1, "name": "CRYPTO 200 A", "points": -5, "solves": "3.9"},
                {"cid": 2, "name": "B", "points": 12.9, "solves": -1}
            ]}),
            [0, 12],
        ),
        (
            Platform::Generic,
            json!({"items": [
                {"id": 1, "name": "A", "section": " CRYPTO ", "score": -5, "solves": "3.9"},
                {"id": 2, "name": "B", "score": 12.9, "solves": -1}
            ]}),
            [0, 12],
        ),
    ]
}

#[test]
fn every_adapter_clamps_counts_and_normalizes_category() {
    for (platform, raw, points) in messy_feeds() {
        let out = parse_feed(platform, &raw).unwrap_or_else(|e| panic!("{platform}: {e}"));
        assert_eq!(out.len(), 2, "{platform}");

        assert_eq!([out[0].points, out[1].points], points, "{platform} points");
        assert_eq!([out[0].solves, out[1].solves], [3, 0], "{platform} solves");

        assert_eq!(out[0].category, "crypto", "{platform} category");
        assert_eq!(out[1].category, "misc", "{platform} default category");
    }
}

#[test]
fn validate_then_parse_matches_parse_alone() {
    for (platform, raw, _) in messy_feeds() {
        let adapter = default_registry().get(platform).expect("registered");
        adapter.validate(&raw).expect("valid feed");
        assert_eq!(adapter.parse(&raw).unwrap(), adapter.parse(&raw).unwrap());
    }
}

#[test]
fn failures_repeat_with_the_same_error() {
    let bogus = json!({"unexpected": true});
    for platform in Platform::ALL {
        let adapter = default_registry().get(platform).expect("registered");
        let v = adapter.validate(&bogus).unwrap_err();
        let p = adapter.parse(&bogus).unwrap_err();
        assert_eq!(v.to_string(), p.to_string(), "{platform}");
        assert_eq!(v.kind(), p.kind(), "{platform}");
        assert_eq!(v.platform(), Some(platform));
        assert!(v.to_string().starts_with(&format!("{platform} format error: ")));
    }
}

#[test]
fn unnamed_challenge_fails_whole_feed() {
    let raw = json!({"data": [{"id": 1, "name": "ok"}, {"id": 2}]});
    let err = parse_feed(Platform::Ctfd, &raw).unwrap_err();
    assert_eq!(err.to_string(), "Challenge at index 1 has no valid name");
}
