// src/ingest/providers/pointer_overflow.rs
//! Pointer Overflow CTF. The API may answer with raw text guarded by a
//! JSON-hijacking prefix (`)]}'` or `)]}',`), so string input is unwrapped
//! and re-parsed before any shape checks run.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::ingest::coerce::{merge_listing, stringify};
use crate::ingest::error::FeedError;
use crate::ingest::registry::Platform;
use crate::ingest::sanitize::sanitize_all;
use crate::ingest::types::{ChallengeAdapter, ChallengeCandidate, ChallengeRecord};

const PLATFORM: Platform = Platform::PointerOverflow;

fn security_prefix() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^\s*\)\]\}'\s*,?").expect("security prefix regex"))
}

fn category_prefix() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    // "OSINT 400-1 Behave, Ye Strangers" -> "OSINT"
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+)\s+\d+").expect("category regex"))
}

/// Body with any leading security prefix removed.
pub fn strip_security_prefix(body: &str) -> &str {
    match security_prefix().find(body) {
        Some(m) => &body[m.end()..],
        None => body,
    }
}

/// Category encoded as the leading word of a numbered challenge name.
pub fn category_from_name(name: &str) -> Option<String> {
    category_prefix()
        .captures(name.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

pub struct PointerOverflowAdapter;

impl PointerOverflowAdapter {
    fn unwrap_body(raw: &Value) -> Result<Cow<'_, Value>, FeedError> {
        match raw {
            Value::String(body) => serde_json::from_str(strip_security_prefix(body))
                .map(Cow::Owned)
                .map_err(|source| FeedError::SecurityPrefix {
                    platform: PLATFORM,
                    source,
                }),
            other => Ok(Cow::Borrowed(other)),
        }
    }

    fn check(root: &Value) -> Result<(), FeedError> {
        let obj = root
            .as_object()
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "Response must be a JSON object"))?;
        let items = obj
            .get("challenges")
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "Missing required \"challenges\" field"))?
            .as_array()
            .ok_or_else(|| FeedError::mismatch(PLATFORM, "\"challenges\" field must be an array"))?;

        for (i, item) in items.iter().enumerate() {
            let item = item.as_object().ok_or_else(|| {
                FeedError::mismatch(PLATFORM, format!("Challenge at index {i} is not an object"))
            })?;
            if !item.get("cid").is_some_and(Value::is_number) {
                return Err(FeedError::field_type(
                    PLATFORM,
                    "Challenge \"cid\" must be a number",
                ));
            }
            if !item.get("name").is_some_and(Value::is_string) {
                return Err(FeedError::field_type(
                    PLATFORM,
                    "Challenge \"name\" must be a string",
                ));
            }
        }
        Ok(())
    }

    fn candidate(item: &Map<String, Value>) -> ChallengeCandidate {
        let name = item.get("name").and_then(Value::as_str).unwrap_or_default();

        let points = match item.get("current_points") {
            Some(v) if v.is_number() => Some(v.clone()),
            _ => item.get("points").cloned(),
        };

        let mut tags: Vec<Value> = item
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(tag_label).collect())
            .unwrap_or_default();
        if item.get("unlocked") == Some(&Value::Bool(false)) {
            tags.push(Value::from("locked"));
        }
        if item.get("teaser") == Some(&Value::Bool(true)) {
            tags.push(Value::from("teaser"));
        }

        let attachments: Vec<String> = item
            .get("attachments")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(attachment_line).collect())
            .unwrap_or_default();

        ChallengeCandidate {
            id: item.get("cid").cloned(),
            name: item.get("name").cloned(),
            category: category_from_name(name).map(Value::String),
            points,
            solves: item.get("solves").cloned(),
            solved: Some(Value::Bool(
                item.get("answered") == Some(&Value::Bool(true)),
            )),
            description: merge_listing(
                item.get("description").and_then(stringify),
                attachments,
            ),
            tags,
        }
    }
}

fn tag_label(tag: &Value) -> Option<Value> {
    match tag {
        Value::Object(m) => ["name", "tagslug"]
            .iter()
            .find_map(|k| m.get(*k).filter(|v| v.is_string()))
            .cloned(),
        Value::String(_) => Some(tag.clone()),
        _ => None,
    }
}

fn attachment_line(a: &Value) -> Option<String> {
    let (label, target) = match a {
        Value::Object(m) => (
            first_text(m, &["filename", "name", "original_name"]),
            first_text(m, &["url", "path", "location"]),
        ),
        Value::String(s) if !s.trim().is_empty() => (None, Some(s.trim().to_string())),
        _ => (None, None),
    };
    match (label, target) {
        (Some(l), Some(t)) => Some(format!("Attachment: {l} ({t})")),
        (Some(only), None) | (None, Some(only)) => Some(format!("Attachment: {only}")),
        (None, None) => None,
    }
}

fn first_text(m: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| m.get(*k).and_then(stringify))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ChallengeAdapter for PointerOverflowAdapter {
    fn validate(&self, raw: &Value) -> Result<(), FeedError> {
        let root = Self::unwrap_body(raw)?;
        Self::check(&root)
    }

    fn parse(&self, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        let root = Self::unwrap_body(raw)?;
        Self::check(&root)?;
        let items = root
            .get("challenges")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let candidates = items
            .iter()
            .filter_map(Value::as_object)
            .map(Self::candidate);
        sanitize_all(candidates)
    }

    fn platform(&self) -> Platform {
        PLATFORM
    }
}
