//! Ordered-candidate field lookup over raw backend JSON.
//!
//! Backends disagree on field names for the same concept, so each normalized field
//! is described by a list of [`FieldPath`]s tried in order. Coercion helpers never
//! invent values: anything that does not parse is `None` or skipped.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    Key(&'static str),
    Nested(&'static str, &'static str),
}

impl FieldPath {
    pub fn get<'a>(&self, raw: &'a Value) -> Option<&'a Value> {
        let found = match self {
            FieldPath::Key(key) => raw.get(key),
            FieldPath::Nested(outer, inner) => raw.get(outer).and_then(|v| v.get(inner)),
        };
        found.filter(|v| !v.is_null())
    }
}

/// Shorthand for a list of top-level keys.
pub const fn key(name: &'static str) -> FieldPath {
    FieldPath::Key(name)
}

/// First candidate that is present and not null.
pub fn first_present<'a>(raw: &'a Value, candidates: &[FieldPath]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| path.get(raw))
}

/// First candidate holding a non-blank string (numbers are stringified).
pub fn first_string(raw: &Value, candidates: &[FieldPath]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| path.get(raw))
        .find_map(scalar_to_string)
}

/// First candidate that coerces to a finite number.
pub fn first_number(raw: &Value, candidates: &[FieldPath]) -> Option<f64> {
    candidates
        .iter()
        .filter_map(|path| path.get(raw))
        .find_map(to_finite_number)
}

/// First candidate that coerces to an integral id.
pub fn first_id(raw: &Value, candidates: &[FieldPath]) -> Option<i64> {
    candidates
        .iter()
        .filter_map(|path| path.get(raw))
        .find_map(to_id)
}

/// Parse, then verify finite. Numeric strings are accepted.
pub fn to_finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

pub fn to_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let n = to_finite_number(value)?;
    (n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

/// A fraction in `[0, 1]` from `0.93`, `"0.93"` or `"93.21%"`.
pub fn to_fraction(value: &Value) -> Option<f64> {
    if let Value::String(s) = value {
        if let Some(percent) = s.trim().strip_suffix('%') {
            let n: f64 = percent.trim().parse().ok()?;
            return n.is_finite().then_some(n / 100.0);
        }
    }
    to_finite_number(value)
}

/// Non-negative integral count; strings must be all digits.
pub fn to_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
        }),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

/// `"yes"`/`"true"`/`true`/`1` and their negatives; anything else is unknown.
pub fn to_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "y" | "1" => Some(true),
            "no" | "false" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Array, single scalar, or absent: always a list of non-blank strings.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    }
}

/// Like [`string_list`] but also splits comma-separated strings.
pub fn split_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => string_list(other),
    }
}

/// First candidate resolved as a list (see [`string_list`]).
pub fn first_list(raw: &Value, candidates: &[FieldPath]) -> Vec<String> {
    string_list(first_present(raw, candidates))
}

/// Array items, or nothing when the field is missing or not an array.
pub fn array_items<'a>(raw: &'a Value, candidates: &[FieldPath]) -> &'a [Value] {
    candidates
        .iter()
        .filter_map(|path| path.get(raw))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Record list of a response: a bare array, or the first array-valued candidate.
pub fn record_list(raw: &Value, candidates: &[FieldPath]) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        other => array_items(other, candidates).to_vec(),
    }
}
