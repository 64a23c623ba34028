// parse.rs — Lenient numeric parsing for form input and stored records.
//
// Values typed into a form arrive as raw strings. A string counts as a
// number when its leading numeric prefix is a finite float, so "72.5kg"
// parses as 72.5 while "abc", "" and "Infinity" do not parse at all.
//
// Stored blobs written by older clients may carry `null` or numeric strings
// where a number belongs, or lose a timestamp entirely. The `lenient_*`
// deserializers accept those and fall back to zero (or the Unix epoch)
// instead of failing the whole blob. Lists are decoded one record at a
// time, so a single record that still doesn't fit is dropped on its own.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading-number pattern is valid")
    })
}

/// Parse the leading numeric prefix of `raw` as a finite `f64`.
///
/// Surrounding whitespace is ignored. Returns `None` when no prefix exists
/// or the value overflows to infinity.
pub fn parse_number(raw: &str) -> Option<f64> {
    let m = leading_number().find(raw.trim())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an optional raw input, treating `None` the same as garbage.
pub fn parse_optional(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_number)
}

/// Parse the leading integer part of `raw` (e.g. "45 min" → 45, "7.9" → 7).
pub fn parse_integer(raw: &str) -> Option<i64> {
    parse_number(raw).map(|v| v.trunc() as i64)
}

/// A number as it may appear in a stored blob.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Null(()),
}

impl LooseNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            LooseNumber::Number(v) => Some(v).filter(|v| v.is_finite()),
            LooseNumber::Text(s) => parse_number(&s),
            LooseNumber::Null(()) => None,
        }
    }
}

/// Deserialize an `f64`, mapping `null` and unparsable strings to 0.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?
        .into_f64()
        .unwrap_or(0.0))
}

/// Deserialize an optional `f64`; `null` and garbage become `None`.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.into_f64())
}

/// Deserialize an integer count, truncating fractions and mapping garbage to 0.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?
        .into_f64()
        .map(|v| v.trunc() as i64)
        .unwrap_or(0))
}

/// Deserialize an optional integer count.
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?
        .into_f64()
        .map(|v| v.trunc() as i64))
}

/// Deserialize a timestamp: RFC 3339 text, a bare `YYYY-MM-DD` date, or Unix
/// milliseconds. Anything else is the Unix epoch.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                date_prefix(&s)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|t| t.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// Deserialize a calendar date from `YYYY-MM-DD` or any text starting with
/// one (`"2025-03-02T10:00:00Z"`). Anything else is 1970-01-01.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) => date_prefix(&s),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

fn date_prefix(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Decode every element of a JSON array on its own, skipping the ones that
/// don't fit `T`. A value that isn't an array decodes to nothing.
pub fn decode_records<T: DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => {
            tracing::warn!(what, "expected a list of records, found {}", kind_of(&other));
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(what, index, "skipping unreadable record: {}", e);
                None
            }
        })
        .collect()
}

/// Deserialize a list field through [`decode_records`].
pub fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_records(Value::deserialize(deserializer)?, "goals"))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
