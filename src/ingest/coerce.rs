//! Lenient coercion of raw JSON values into the primitive shapes the
//! canonical record needs. Nothing here fails: unusable input degrades
//! to `None`, `0` or `false`.

use serde_json::Value;

/// Textual form of a scalar. Objects, arrays and `null` have none.
pub fn stringify(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer-parse a count or score. Floats truncate toward zero, numeric
/// strings are read up to the first non-digit, and anything negative or
/// unparsable becomes `0`.
pub fn to_count(v: &Value) -> u64 {
    let parsed = match v {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => match n.as_u64() {
                Some(u) => return u,
                None => n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64),
            },
        },
        Value::String(s) => leading_int(s),
        _ => None,
    };
    parsed.map(|i| i.max(0) as u64).unwrap_or(0)
}

/// Leading optional sign plus digits, after leading whitespace.
/// `"12abc"` reads as 12, `"abc"` as nothing.
pub fn leading_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (neg, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate rather than overflow on absurdly long digit runs.
    let n = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if neg { -n } else { n })
}

/// Loose boolean interpretation: empty strings, zero, NaN and `null` are false.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Flatten a tag-like slot into scalar values.
///
/// Arrays keep string/number entries as-is and resolve object entries through
/// `object_keys` (first present wins). A bare string is split on commas only
/// when `split_commas` is set. Returns `None` when the slot has no usable shape.
pub fn flatten_tags(v: &Value, object_keys: &[&str], split_commas: bool) -> Option<Vec<Value>> {
    match v {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|it| match it {
                    Value::Object(m) => object_keys
                        .iter()
                        .find_map(|k| m.get(*k).filter(|x| stringify(x).is_some()))
                        .cloned(),
                    Value::String(_) | Value::Number(_) => Some(it.clone()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) if split_commas => Some(
            s.split(',')
                .map(|part| Value::String(part.trim().to_string()))
                .collect(),
        ),
        _ => None,
    }
}

/// Append a listing (files, attachments) below an optional description.
pub fn merge_listing(description: Option<String>, lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        return description;
    }
    let listing = lines.join("\n");
    match description.filter(|d| !d.trim().is_empty()) {
        Some(d) => Some(format!("{}\n\n{}", d.trim_end(), listing)),
        None => Some(listing),
    }
}
