// src/ingest/providers/rctf.rs
//! rCTF `/api/v1/challs`: `{"kind": "goodChallenges", "data": [...]}`.

use serde_json::Value;

use crate::ingest::coerce::flatten_tags;
use crate::ingest::error::FeedError;
use crate::ingest::fields::{FieldChain, Probe::*};
use crate::ingest::providers::{find_array, objects, probe_first, quoted_list, FieldTable};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeRecord};

const PLATFORM: Platform = Platform::Rctf;

const WRAPPER_KEYS: &[&str] = &["data", "challenges", "challs"];

const FIELDS: FieldTable = FieldTable {
    id: FieldChain(&[Key("id"), Key("_id"), Key("chall_id")]),
    name: FieldChain(&[Key("name"), Key("title"), Key("chall_name")]),
    category: FieldChain(&[Key("category"), Key("genre"), Key("type")]),
    points: FieldChain(&[Key("points"), Key("value"), Key("score"), Key("weight")]),
    solves: FieldChain(&[Key("solves"), Key("solve_count"), Key("num_solves")]),
    solved: FieldChain(&[Key("solved"), Key("is_solved"), Key("solved_by_me")]),
    description: FieldChain(&[Key("description")]),
};

const TAG_KEYS: &[&str] = &["tags", "hints"];

pub struct RctfAdapter;

impl RctfAdapter {
    fn challenges<'a>(&self, raw: &'a Value) -> Result<&'a Vec<Value>, FeedError> {
        if let Value::Object(m) = raw {
            // rCTF reports errors as `kind: "badToken"`, `"badNotStarted"`, ...
            if let Some(kind) = m.get("kind").and_then(Value::as_str) {
                if kind.starts_with("bad") {
                    return Err(FeedError::mismatch(
                        PLATFORM,
                        format!("API response indicates failure (kind: {kind})"),
                    ));
                }
            }
        } else if !raw.is_array() {
            return Err(FeedError::mismatch(
                PLATFORM,
                "Response must be a JSON object or array",
            ));
        }

        let items = find_array(raw, WRAPPER_KEYS).ok_or_else(|| {
            FeedError::mismatch(
                PLATFORM,
                format!(
                    "Missing challenge array (expected {})",
                    quoted_list(WRAPPER_KEYS)
                ),
            )
        })?;
        probe_first(PLATFORM, items)?;
        Ok(items)
    }
}

impl ChallengeAdapter for RctfAdapter {
    fn validate(&self, raw: &Value) -> Result<(), FeedError> {
        self.challenges(raw).map(|_| ())
    }

    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        let items = self.challenges(raw)?;
        let candidates = objects(PLATFORM, items)?.into_iter().map(|item| {
            let mut c = FIELDS.candidate(item);
            // Passed through as-is; rCTF has no tag objects. A slot that does
            // not flatten (e.g. a bare string) yields to the next one.
            c.tags = TAG_KEYS
                .iter()
                .find_map(|k| item.get(*k).and_then(|t| flatten_tags(t, &[], false)))
                .unwrap_or_default();
            c
        });
        sanitize_all(candidates)
    }

    fn platform(&self) -> Platform {
        PLATFORM
    }
}
