//! Critic verdict parsing.
//!
//! The critic is asked for `{"approved": bool, "feedback": string}` but models
//! wrap it in code fences, add prose, or change key casing. Anything that still
//! cannot be read becomes an approval so a confused critic never blocks an answer.

use serde_json::{Map, Value};

use petworld_core::domain::critique::CriticVerdict;

/// Interpret critic output, failing open to `approved = true, feedback = ""`.
pub fn parse_verdict(raw: &str) -> CriticVerdict {
    parse_verdict_strict(raw).unwrap_or_else(CriticVerdict::fail_open)
}

/// Interpret critic output, returning `None` when it is not a usable verdict.
pub fn parse_verdict_strict(raw: &str) -> Option<CriticVerdict> {
    let body = strip_code_fences(raw);
    let value = serde_json::from_str::<Value>(body).ok().or_else(|| embedded_object(body))?;
    verdict_from_value(&value)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the language tag (`json`, `JSON`, ...) that follows the opening fence
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn embedded_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn verdict_from_value(value: &Value) -> Option<CriticVerdict> {
    let object = value.as_object()?;
    let approved = field(object, "approved")?.as_bool()?;
    let feedback = field(object, "feedback").and_then(Value::as_str).unwrap_or_default();

    Some(CriticVerdict { approved, feedback: feedback.to_string() })
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
    })
}
