use lazy_static::lazy_static;
use regex::Regex;
use shared::{IdQuery, PlantKind};

use crate::batch::unique_ids;

lazy_static! {
    static ref THREATENED_QUERY: Regex =
        Regex::new(r"(?i)^(?:t#|t:\s*|threat(?:ened)?\s*:\s*)(.+)$").unwrap();
    static ref GENERAL_QUERY: Regex = Regex::new(r"(?i)^(?:#|ids:\s*)(.+)$").unwrap();
    static ref ID_SEPARATORS: Regex = Regex::new(r"[\s,，;；]+").unwrap();
}

/// Recognizes `t#1,2` / `threatened: 3` (threatened ids) and `#1 2` / `ids: 3` (general ids).
pub fn parse_id_query(raw: &str) -> IdQuery {
    let q = raw.trim();
    if q.is_empty() {
        return IdQuery::default();
    }
    if let Some(caps) = THREATENED_QUERY.captures(q) {
        return IdQuery {
            kind: Some(PlantKind::Threatened),
            ids: split_ids(&caps[1]),
        };
    }
    if let Some(caps) = GENERAL_QUERY.captures(q) {
        return IdQuery {
            kind: Some(PlantKind::General),
            ids: split_ids(&caps[1]),
        };
    }
    IdQuery::default()
}

/// Unique positive integer ids, in input order. Anything else is skipped.
pub fn split_ids(s: &str) -> Vec<i64> {
    unique_ids(
        ID_SEPARATORS
            .split(s)
            .filter_map(leading_integer)
            .filter(|n| *n > 0),
    )
}

// Leading digits only, so "12a" reads as 12.
fn leading_integer(part: &str) -> Option<i64> {
    let part = part.trim();
    let (sign, digits) = match part.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, part.strip_prefix('+').unwrap_or(part)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
