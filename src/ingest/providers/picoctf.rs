// src/ingest/providers/picoctf.rs
//! picoCTF problem listings, bare or paginated (`{"count": n, "results": [...]}`).

use serde_json::{Map, Value};

use crate::ingest::coerce::flatten_tags;
use crate::ingest::error::FeedError;
use crate::ingest::fields::{FieldChain, Probe::*};
use crate::ingest::providers::{find_array, objects, probe_first, quoted_list, FieldTable};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::PicoCtf;

const WRAPPER_KEYS: &[&str] = &["results", "problems", "challenges", "data"];

const FIELDS: FieldTable = FieldTable {
    id: FieldChain(&[Key("id"), Key("pid"), Key("problem_id")]),
    name: FieldChain(&[Key("name"), Key("title"), Key("problem_name")]),
    category: FieldChain(&[Key("category"), Key("genre"), Key("type")]),
    points: FieldChain(&[Key("points"), Key("value"), Key("score"), Key("worth")]),
    solves: FieldChain(&[
        Key("solves"),
        Key("solve_count"),
        Key("num_solves"),
        Key("solved_by"),
    ]),
    solved: FieldChain(&[
        Key("solved"),
        Key("solved_by_me"),
        Key("is_solved"),
        Equals("status", &["solved"]),
    ]),
    description: FieldChain(&[Key("description")]),
};

pub struct PicoCtfAdapter;

impl PicoCtfAdapter {
    fn challenges<'a>(&self, raw: &'a Value) -> Result<&'a Vec<Value>, FeedError> {
        if !raw.is_object() && !raw.is_array() {
            return Err(FeedError::mismatch(
                PLATFORM,
                "Response must be a JSON object or array",
            ));
        }
        let items = find_array(raw, WRAPPER_KEYS).ok_or_else(|| {
            FeedError::mismatch(
                PLATFORM,
                format!(
                    "Missing problem array (expected {})",
                    quoted_list(WRAPPER_KEYS)
                ),
            )
        })?;
        probe_first(PLATFORM, items)?;
        Ok(items)
    }

    fn candidate(item: &Map<String, Value>) -> ChallengeCandidate {
        let mut c = FIELDS.candidate(item);
        // Hints double as tags on picoCTF; explicit tags only when there are none.
        c.tags = item
            .get("hints")
            .and_then(|h| flatten_tags(h, &[], false))
            .filter(|h| !h.is_empty())
            .or_else(|| {
                item.get("tags")
                    .and_then(|t| flatten_tags(t, &["name"], false))
            })
            .unwrap_or_default();
        c
    }
}

impl ChallengeAdapter for PicoCtfAdapter {
    fn validate(&self, raw: &Value) -> Result<(), FeedError> {
        self.challenges(raw).map(|_| ())
    }

    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        let items = self.challenges(raw)?;
        let candidates = objects(PLATFORM, items)?.into_iter().map(Self::candidate);
        sanitize_all(candidates)
    }

    fn platform(&self) -> Platform {
        PLATFORM
    }
}
