// src/ingest/providers/ctfd.rs
//! CTFd `/api/v1/challenges`: `{"success": true, "data": [...]}`.

use serde_json::{Map, Value};

use crate::ingest::coerce::{flatten_tags, merge_listing, stringify};
use crate::ingest::error::FeedError;
use crate::ingest::providers::{objects, probe_first};
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::Ctfd;

pub struct CtfdAdapter;

impl CtfdAdapter {
    fn challenges<'a>(&self, raw: &'a Value) -> Result<&'a Vec<Value>, FeedError> {
        let root = raw
            .as_object()
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "Response must be a JSON object"))?;

        if root.get("success") == Some(&Value::Bool(false)) {
            return Err(FeedError::mismatch(
                PLATFORM,
                "API response indicates failure (success: false)",
            ));
        }

        let data = root
            .get("data")
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "Missing required \"data\" field"))?;
        let items = data
            .as_array()
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "\"data\" field must be an array"))?;

        probe_first(PLATFORM, items)?;
        Ok(items)
    }

    fn candidate(item: &Map<String, Value>) -> ChallengeCandidate {
        let tags = item
            .get("tags")
            .and_then(|t| flatten_tags(t, &["value"], false))
            .unwrap_or_default();

        let description = item.get("description").and_then(stringify);
        let files = item
            .get("files")
            .and_then(Value::as_array)
            .map(|files| file_lines(files))
            .unwrap_or_default();

        ChallengeCandidate {
            id: item.get("id").cloned(),
            name: item.get("name").cloned(),
            category: item.get("category").cloned(),
            points: item.get("value").cloned(),
            solves: item.get("solves").cloned(),
            solved: item.get("solved_by_me").cloned(),
            description: merge_listing(description, files),
            tags,
        }
    }
}

/// `File {id}: {location}` per entry. Plain string entries (older CTFd
/// versions list bare URLs) are numbered by position.
fn file_lines(files: &[Value]) -> Vec<String> {
    files
        .iter()
        .enumerate()
        .filter_map(|(i, f)| match f {
            Value::Object(m) => {
                let location = m.get("location").and_then(stringify)?;
                let id = m
                    .get("id")
                    .and_then(stringify)
                    .unwrap_or_else(|| (i + 1).to_string());
                Some(format!("File {id}: {location}"))
            }
            Value::String(s) if !s.trim().is_empty() => Some(format!("File {}: {}", i + 1, s.trim())),
            _ => None,
        })
        .collect()
}

impl ChallengeAdapter for CtfdAdapter {
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
