// src/ingest/providers/zero7ctf.rs
//! 07CTF challenge board. Points are not published; they decay with solves.

use serde_json::{Map, Value};

use crate::ingest::coerce::{merge_listing, stringify, to_count};
use crate::ingest::error::FeedError;
use crate::ingest::providers::{find_array, objects, probe_first, quoted_list};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::Zero7Ctf;

const WRAPPER_KEYS: &[&str] = &["challenges", "data"];

pub const MAX_POINTS: u64 = 500;
pub const MIN_POINTS: u64 = 100;
pub const DECAY_PER_SOLVE: u64 = 10;

/// `max(100, 500 - 10 * solves)`.
pub fn decayed_points(solves: u64) -> u64 {
    MAX_POINTS
        .saturating_sub(DECAY_PER_SOLVE.saturating_mul(solves))
        .max(MIN_POINTS)
}

pub struct Zero7CtfAdapter;

impl Zero7CtfAdapter {
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
                    "Missing challenge array (expected {})",
                    quoted_list(WRAPPER_KEYS)
                ),
            )
        })?;
        probe_first(PLATFORM, items)?;
        Ok(items)
    }

    fn candidate(item: &Map<String, Value>) -> ChallengeCandidate {
        let solves = item.get("solve_count").map(to_count).unwrap_or(0);

        let tags = item
            .get("difficulty")
            .and_then(stringify)
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .map(|d| vec![Value::String(d)])
            .unwrap_or_default();

        let files: Vec<String> = item
            .get("files")
            .and_then(Value::as_array)
            .map(|files| files.iter().filter_map(file_line).collect())
            .unwrap_or_default();

        ChallengeCandidate {
            // Missing ids fall back to the ordinal in the sanitizer.
            id: item.get("id").cloned(),
            name: item.get("title").cloned(),
            category: item.get("category").cloned(),
            points: Some(Value::from(decayed_points(solves))),
            solves: Some(Value::from(solves)),
            solved: item.get("solved").cloned(),
            description: merge_listing(item.get("description").and_then(stringify), files),
            tags,
        }
    }
}

fn file_line(f: &Value) -> Option<String> {
    let target = match f {
        Value::Object(m) => ["url", "location", "name"]
            .iter()
            .find_map(|k| m.get(*k).and_then(stringify))?,
        other => stringify(other)?,
    };
    let target = target.trim();
    (!target.is_empty()).then(|| format!("File: {target}"))
}

impl ChallengeAdapter for Zero7CtfAdapter {
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
