// src/ingest/providers/generic.rs
//! Fallback for platforms without a dedicated adapter. Accepts the widest
//! range of envelopes and field aliases seen across smaller CTF frameworks.

use serde_json::{Map, Value};

use crate::ingest::coerce::flatten_tags;
use crate::ingest::error::FeedError;
use crate::ingest::fields::{FieldChain, Probe::*};
use crate::ingest::providers::{find_array, objects, probe_first, quoted_list, FieldTable};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::Generic;

const WRAPPER_KEYS: &[&str] = &[
    "challenges",
    "challs",
    "data",
    "problems",
    "tasks",
    "items",
    "results",
];

const FIELDS: FieldTable = FieldTable {
    id: FieldChain(&[
        Key("id"),
        Key("_id"),
        Key("challengeId"),
        Key("problem_id"),
        Key("task_id"),
    ]),
    name: FieldChain(&[
        Key("name"),
        Key("title"),
        Key("problem_name"),
        Key("task_name"),
        Key("challenge_name"),
    ]),
    category: FieldChain(&[
        Key("category"),
        Key("type"),
        Key("genre"),
        Key("topic"),
        Key("section"),
    ]),
    points: FieldChain(&[
        Key("points"),
        Key("value"),
        Key("score"),
        Key("weight"),
        Key("difficulty"),
        Key("worth"),
    ]),
    solves: FieldChain(&[
        Key("solves"),
        Key("solve_count"),
        Key("solved_count"),
        Key("submissions"),
        Key("completions"),
        Key("num_solves"),
    ]),
    solved: FieldChain(&[
        Key("solved"),
        Key("solved_by_me"),
        Key("is_solved"),
        Key("completed"),
        Equals("status", &["solved", "complete"]),
    ]),
    description: FieldChain(&[
        Key("description"),
        Key("desc"),
        Key("details"),
        Key("content"),
    ]),
};

const TAG_SOURCES: &[&str] = &["tags", "hints", "keywords"];

pub struct GenericAdapter;

impl GenericAdapter {
    fn challenges<'a>(&self, raw: &'a Value) -> Result<&'a Vec<Value>, FeedError> {
        let missing = || {
            FeedError::mismatch(
                PLATFORM,
                format!(
                    "No challenge array found (expected {})",
                    quoted_list(WRAPPER_KEYS)
                ),
            )
        };

        let items = match raw {
            Value::Array(items) => items,
            Value::Object(m) => find_array(raw, WRAPPER_KEYS)
                // One level of nesting, e.g. `{"data": {"challenges": [...]}}`.
                .or_else(|| {
                    WRAPPER_KEYS
                        .iter()
                        .filter_map(|k| m.get(*k).filter(|v| v.is_object()))
                        .find_map(|inner| find_array(inner, WRAPPER_KEYS))
                })
                .ok_or_else(missing)?,
            _ => {
                return Err(FeedError::mismatch(
                    PLATFORM,
                    "Response must be a JSON object or array",
                ))
            }
        };
        probe_first(PLATFORM, items)?;
        Ok(items)
    }

    fn candidate(item: &Map<String, Value>) -> ChallengeCandidate {
        let mut c = FIELDS.candidate(item);
        c.tags = TAG_SOURCES
            .iter()
            .filter_map(|k| item.get(*k))
            .filter_map(|v| flatten_tags(v, &["name", "value", "tag"], true))
            .find(|tags| !tags.is_empty())
            .unwrap_or_default();
        c
    }
}

impl ChallengeAdapter for GenericAdapter {
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
