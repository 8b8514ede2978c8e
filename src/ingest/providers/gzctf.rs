// src/ingest/providers/gzctf.rs
//! GzCTF game details. Challenges arrive either as a flat array or grouped
//! by category (`{"challenges": {"Web": [...], "Pwn": [...]}}`).

use serde_json::{Map, Value};

use crate::ingest::coerce::flatten_tags;
use crate::ingest::error::FeedError;
use crate::ingest::fields::{FieldChain, Probe::*};
use crate::ingest::providers::{quoted_list, FieldTable};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::Gzctf;

const WRAPPER_KEYS: &[&str] = &["challenges", "data", "items"];

const FIELDS: FieldTable = FieldTable {
    id: FieldChain(&[Key("id"), Key("challengeId"), Key("Id")]),
    name: FieldChain(&[Key("title"), Key("name"), Key("challengeName")]),
    category: FieldChain(&[Key("category"), Key("type"), Key("categoryName")]),
    // Dynamic-scoring games may publish placeholders such as "dynamic".
    points: FieldChain(&[
        Num("originalScore"),
        Num("minScore"),
        Num("points"),
        Num("score"),
        Num("value"),
        Num("baseScore"),
    ]),
    solves: FieldChain(&[
        Key("acceptedCount"),
        Key("solvedCount"),
        Key("solved"),
        Key("solves"),
        Key("submissionCount"),
    ]),
    solved: FieldChain(&[
        Key("isSolved"),
        Key("solved_by_me"),
        Key("solved"),
        Equals("status", &["solved"]),
        Key("isAccepted"),
    ]),
    description: FieldChain(&[Key("content"), Key("description")]),
};

/// One challenge entry plus the category group it was listed under.
type Entry<'a> = (Option<&'a str>, &'a Value);

pub struct GzctfAdapter;

impl GzctfAdapter {
    fn entries<'a>(&self, raw: &'a Value) -> Result<Vec<Entry<'a>>, FeedError> {
        let container = match raw {
            Value::Array(_) => raw,
            Value::Object(m) => WRAPPER_KEYS
                .iter()
                .find_map(|k| m.get(*k).filter(|v| v.is_array() || v.is_object()))
                .ok_or_else(|| {
                    FeedError::mismatch(
                        PLATFORM,
                        format!(
                            "Missing challenge list (expected {})",
                            quoted_list(WRAPPER_KEYS)
                        ),
                    )
                })?,
            _ => {
                return Err(FeedError::mismatch(
                    PLATFORM,
                    "Response must be a JSON object or array",
                ))
            }
        };

        let entries: Vec<Entry<'a>> = match container {
            Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
            Value::Object(groups) => {
                let mut out = Vec::new();
                for (category, list) in groups {
                    let items = list.as_array().ok_or_else(|| {
                        FeedError::mismatch(
                            PLATFORM,
                            format!("Category group \"{category}\" must be an array"),
                        )
                    })?;
                    out.extend(items.iter().map(|v| (Some(category.as_str()), v)));
                }
                out
            }
            _ => {
                return Err(FeedError::mismatch(
                    PLATFORM,
                    "Challenge list must be an array or category map",
                ))
            }
        };

        if let Some((_, first)) = entries.first() {
            if !first.is_object() {
                return Err(FeedError::mismatch(
                    PLATFORM,
                    "Challenge entries must be objects",
                ));
            }
        }
        Ok(entries)
    }

    fn candidate(group: Option<&str>, item: &Map<String, Value>) -> ChallengeCandidate {
        let mut c = FIELDS.candidate(item);
        if c.category.is_none() {
            c.category = group.map(|g| Value::String(g.to_string()));
        }
        c.tags = item
            .get("tags")
            .and_then(|t| flatten_tags(t, &["name", "value"], false))
            .filter(|t| !t.is_empty())
            .or_else(|| item.get("hints").and_then(|h| flatten_tags(h, &[], false)))
            .unwrap_or_default();
        c
    }
}

impl ChallengeAdapter for GzctfAdapter {
    fn validate(&self, raw: &Value) -> Result<(), FeedError> {
        self.entries(raw).map(|_| ())
    }

    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        let mut candidates = Vec::new();
        for (i, (group, v)) in self.entries(raw)?.into_iter().enumerate() {
            let item = v.as_object().ok_or_else(|| {
                FeedError::mismatch(PLATFORM, format!("Challenge at index {i} is not an object"))
            })?;
            candidates.push(Self::candidate(group, item));
        }
        sanitize_all(candidates)
    }

    fn platform(&self) -> Platform {
        PLATFORM
    }
}
