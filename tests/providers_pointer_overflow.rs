// tests/providers_pointer_overflow.rs
use ctf_feed_ingest::ingest::providers::pointer_overflow::strip_security_prefix;
use ctf_feed_ingest::{parse_feed, parse_feed_str, FeedError, Platform};
use serde_json::Value;

const PO_BODY: &str = include_str!("fixtures/pointer_overflow.txt");

#[test]
fn guarded_body_parses_like_plain_json() {
    let guarded = parse_feed_str(Platform::PointerOverflow, PO_BODY).expect("guarded body ok");

    let plain: Value = serde_json::from_str(strip_security_prefix(PO_BODY)).expect("plain json");
    let bare = parse_feed(Platform::PointerOverflow, &plain).expect("bare object ok");

    assert_eq!(guarded, bare);
    assert_eq!(guarded.len(), 3);
}

#[test]
fn fixture_records_are_enriched() {
    let out = parse_feed_str(Platform::PointerOverflow, PO_BODY).unwrap();

    assert_eq!(out[0].category, "crypto");
    assert_eq!(out[0].points, 90);
    assert!(out[0].solved);
    assert_eq!(out[0].tags, vec!["classical"]);

    // current_points null -> points
    assert_eq!(out[1].category, "osint");
    assert_eq!(out[1].points, 400);
    assert!(!out[1].solved);
    assert_eq!(out[1].tags, vec!["geoint", "locked", "teaser"]);
    assert_eq!(
        out[1].description.as_deref(),
        Some("Find the lighthouse.\n\nAttachment: coast.png (/uploads/coast.png)")
    );

    assert_eq!(out[2].category, "misc");
    assert_eq!(out[2].points, 10);
}

#[test]
fn corrupt_guarded_body_reports_prefix_error() {
    let err = parse_feed(
        Platform::PointerOverflow,
        &Value::String(")]}',{malformed".to_string()),
    )
    .unwrap_err();
    assert!(matches!(err, FeedError::SecurityPrefix { .. }));
    assert!(err
        .to_string()
        .ends_with("Failed to parse JSON after removing security prefix"));
    assert!(!err.is_shape_mismatch());
}
