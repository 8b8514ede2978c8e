//! Single choke point between adapters and callers: every candidate is
//! coerced into a [`ChallengeRecord`] here.
//!
//! Policy is asymmetric. Scores, counts and categories degrade to safe
//! defaults, but a name is never invented: the only failure is
//! [`FeedError::MissingName`].

use serde_json::Value;

use crate::ingest::coerce::{stringify, to_count, truthy};
use crate::ingest::error::FeedError;
use crate::ingest::types::{ChallengeCandidate, ChallengeId, ChallengeRecord};

pub const DEFAULT_CATEGORY: &str = "misc";

/// Name that would be synthesized for the challenge at `index`.
/// Never accepted as a genuine name.
pub fn placeholder_name(index: usize) -> String {
    format!("Challenge {}", index + 1)
}

/// Coerce one candidate. `index` is the position in the extracted array and
/// only feeds the fallback id and error message.
pub fn sanitize(candidate: ChallengeCandidate, index: usize) -> Result<ChallengeRecord, FeedError> {
    let name = candidate
        .name
        .as_ref()
        .and_then(stringify)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && *s != placeholder_name(index))
        .ok_or(FeedError::MissingName { index })?;

    let id = candidate
        .id
        .as_ref()
        .and_then(to_id)
        .unwrap_or(ChallengeId::Int(index as i64 + 1));

    let category = candidate
        .category
        .as_ref()
        .and_then(stringify)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let description = candidate
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let tags = candidate
        .tags
        .iter()
        .filter_map(stringify)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(ChallengeRecord {
        id,
        name,
        category,
        points: candidate.points.as_ref().map(to_count).unwrap_or(0),
        solves: candidate.solves.as_ref().map(to_count).unwrap_or(0),
        solved: candidate.solved.as_ref().is_some_and(truthy),
        description,
        tags,
    })
}

/// Sanitize a whole batch; the first missing name aborts it.
pub fn sanitize_all(
    candidates: impl IntoIterator<Item = ChallengeCandidate>,
) -> Result<Vec<ChallengeRecord>, FeedError> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| sanitize(c, i))
        .collect()
}

fn to_id(v: &Value) -> Option<ChallengeId> {
    match v {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => ChallengeId::Int(i),
            None => ChallengeId::Text(n.to_string()),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(ChallengeId::Text(s.trim().to_string())),
        _ => None,
    }
}
