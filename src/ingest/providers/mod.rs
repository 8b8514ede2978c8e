//! Per-platform adapters plus the envelope helpers they share.

pub mod ctfd;
pub mod generic;
pub mod gzctf;
pub mod picoctf;
pub mod pointer_overflow;
pub mod rctf;
pub mod zero7ctf;

use serde_json::{Map, Value};

use crate::ingest::error::FeedError;
use crate::ingest::fields::FieldChain;
use crate::ingest::registry::Platform;
use crate::ingest::types::ChallengeCandidate;

/// Challenge array from a bare array or the first wrapper key holding one.
pub(crate) fn find_array<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items),
        Value::Object(m) => keys.iter().find_map(|k| m.get(*k)?.as_array()),
        _ => None,
    }
}

/// `"a"`, `"a" or "b"`, `"a", "b" or "c"` for error messages.
pub(crate) fn quoted_list(keys: &[&str]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("\"{k}\"")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Shallow probe: the first entry, if any, must be an object.
pub(crate) fn probe_first(platform: Platform, items: &[Value]) -> Result<(), FeedError> {
    match items.first() {
        Some(v) if !v.is_object() => Err(FeedError::mismatch(
            platform,
            "Challenge entries must be objects",
        )),
        _ => Ok(()),
    }
}

/// Every entry as an object; the first non-object fails the whole feed.
pub(crate) fn objects(
    platform: Platform,
    items: &[Value],
) -> Result<Vec<&Map<String, Value>>, FeedError> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_object().ok_or_else(|| {
                FeedError::mismatch(platform, format!("Challenge at index {i} is not an object"))
            })
        })
        .collect()
}

/// Alias chains for the scalar fields of a table-driven adapter.
pub(crate) struct FieldTable {
    pub id: FieldChain,
    pub name: FieldChain,
    pub category: FieldChain,
    pub points: FieldChain,
    pub solves: FieldChain,
    pub solved: FieldChain,
    pub description: FieldChain,
}

impl FieldTable {
    /// Candidate with every scalar resolved; tags are left to the adapter.
    pub fn candidate(&self, item: &Map<String, Value>) -> ChallengeCandidate {
        ChallengeCandidate {
            id: self.id.resolve(item),
            name: self.name.resolve(item),
            category: self.category.resolve(item),
            points: self.points.resolve(item),
            solves: self.solves.resolve(item),
            solved: self.solved.resolve(item),
            description: self
                .description
                .resolve(item)
                .as_ref()
                .and_then(crate::ingest::coerce::stringify),
            tags: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_arrays_are_found() {
        let bare = json!([{"a": 1}]);
        assert_eq!(find_array(&bare, &["data"]).map(Vec::len), Some(1));

        let wrapped = json!({"data": "nope", "challenges": [1, 2]});
        assert_eq!(find_array(&wrapped, &["data", "challenges"]).map(Vec::len), Some(2));
        assert!(find_array(&json!("x"), &["data"]).is_none());
    }

    #[test]
    fn quoted_list_reads_naturally() {
        assert_eq!(quoted_list(&["data"]), "\"data\"");
        assert_eq!(quoted_list(&["a", "b", "c"]), "\"a\", \"b\" or \"c\"");
    }
}
