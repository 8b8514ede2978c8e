//! Ordered alias lookup for loosely specified feed fields.
//!
//! Platforms rename fields between API versions without notice. Each logical
//! field is therefore described by a [`FieldChain`]: an ordered list of probes
//! where the first one yielding a present value wins. Adding a newly observed
//! alias is a one-line edit in the adapter's chain table.

use serde_json::{Map, Value};

use crate::ingest::coerce::leading_int;

/// A single lookup step within a chain.
#[derive(Debug, Clone, Copy)]
pub enum Probe {
    /// Plain key lookup.
    Key(&'static str),
    /// Key lookup that only yields numbers or strings with a leading integer.
    Num(&'static str),
    /// Yields `true` when `key` holds one of `expected` (case-insensitive, trimmed).
    /// A non-matching value is treated as absent so later probes still run.
    Equals(&'static str, &'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldChain(pub &'static [Probe]);

impl FieldChain {
    /// First present value along the chain. Absent keys, `null` and
    /// blank strings are skipped; `0` and `false` count as present.
    pub fn resolve(&self, item: &Map<String, Value>) -> Option<Value> {
        self.0.iter().find_map(|probe| match *probe {
            Probe::Key(key) => item.get(key).filter(|v| is_present(v)).cloned(),
            Probe::Num(key) => item.get(key).filter(|v| is_numeric(v)).cloned(),
            Probe::Equals(key, expected) => {
                let actual = item.get(key)?.as_str()?.trim();
                expected
                    .iter()
                    .any(|e| actual.eq_ignore_ascii_case(e))
                    .then_some(Value::Bool(true))
            }
        })
    }
}

fn is_numeric(v: &Value) -> bool {
    match v {
        Value::Number(_) => true,
        Value::String(s) => leading_int(s).is_some(),
        _ => false,
    }
}

pub fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::Probe::{Equals, Key, Num};
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn first_present_alias_wins() {
        let c = FieldChain(&[Key("title"), Key("name"), Key("challengeName")]);
        let item = obj(json!({"name": "second", "challengeName": "third"}));
        assert_eq!(c.resolve(&item), Some(json!("second")));
    }

    #[test]
    fn null_and_blank_are_skipped_but_zero_is_kept() {
        let c = FieldChain(&[Key("a"), Key("b"), Key("c"), Key("d")]);
        let item = obj(json!({"a": null, "b": "   ", "c": 0, "d": 5}));
        assert_eq!(c.resolve(&item), Some(json!(0)));
    }

    #[test]
    fn equals_probe_only_yields_on_match() {
        let c = FieldChain(&[
            Key("isSolved"),
            Equals("status", &["solved"]),
            Key("isAccepted"),
        ]);
        let solved = obj(json!({"status": " Solved "}));
        assert_eq!(c.resolve(&solved), Some(Value::Bool(true)));

        let fallthrough = obj(json!({"status": "open", "isAccepted": false}));
        assert_eq!(c.resolve(&fallthrough), Some(Value::Bool(false)));

        assert_eq!(c.resolve(&obj(json!({}))), None);
    }

    #[test]
    fn numeric_probe_skips_unusable_scores() {
        let c = FieldChain(&[Num("originalScore"), Num("minScore"), Key("points")]);
        let item = obj(json!({"originalScore": "dynamic", "minScore": "250", "points": 1}));
        assert_eq!(c.resolve(&item), Some(json!("250")));

        let item = obj(json!({"originalScore": {"v": 1}, "minScore": true, "points": "n/a"}));
        assert_eq!(c.resolve(&item), Some(json!("n/a")));
    }
}
