//! Normalization of adapter output into the canonical draft shape

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::analysis::AnalysisDraft;

use super::ports::AdapterOutput;

/// Wrapper objects (`{"result": {...}}`) are unwrapped at most this deep
const MAX_UNWRAP_DEPTH: usize = 2;

/// The adapter output had neither a summary nor next actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an object with 'summary' and/or 'next_actions', got {found}")]
pub struct UnrecognizedOutput {
    pub found: &'static str,
}

/// Turn whatever the adapter returned into an [`AnalysisDraft`].
///
/// Accepted, in order of preference:
/// - a typed draft
/// - a JSON object with `summary` / `next_actions` keys; a missing field
///   defaults to empty
/// - a loosely shaped value: keys in another case or spelling
///   (`nextActions`, `Next Actions`), a JSON document inside a string
///   (optionally fenced), a single wrapper object, next actions given as one
///   bulleted or numbered string
///
/// Anything with neither field extractable is rejected. Every accepted result
/// goes through [`AnalysisDraft::canonical`], so both variants agree.
pub fn normalize(output: AdapterOutput) -> Result<AnalysisDraft, UnrecognizedOutput> {
    match output {
        AdapterOutput::Structured(draft) => Ok(draft.canonical()),
        AdapterOutput::Json(value) => normalize_value(&value, 0)
            .map(AnalysisDraft::canonical)
            .ok_or(UnrecognizedOutput {
                found: kind_of(&value),
            }),
    }
}

fn normalize_value(value: &Value, depth: usize) -> Option<AnalysisDraft> {
    match value {
        Value::Object(map) => normalize_object(map, depth),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(strip_code_fence(text)).ok()?;
            match parsed {
                Value::Object(map) => normalize_object(&map, depth),
                _ => None,
            }
        }
        _ => None,
    }
}

fn normalize_object(map: &Map<String, Value>, depth: usize) -> Option<AnalysisDraft> {
    let summary = find_field(map, "summary").and_then(summary_text);
    let next_actions = find_field(map, "next_actions").and_then(action_items);

    if summary.is_none() && next_actions.is_none() {
        // {"analysis": {...}} style wrappers
        if depth < MAX_UNWRAP_DEPTH && map.len() == 1 {
            return map
                .values()
                .next()
                .and_then(|inner| normalize_value(inner, depth + 1));
        }
        return None;
    }

    Some(AnalysisDraft {
        summary: summary.unwrap_or_default(),
        next_actions: next_actions.unwrap_or_default(),
    })
}

/// Exact key first, then a key that differs only in case or separators
fn find_field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(name) {
        return Some(value);
    }
    let wanted = fold_key(name);
    map.iter()
        .find(|(key, _)| fold_key(key) == wanted)
        .map(|(_, value)| value)
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn summary_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            Some(parts.join(" "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn action_items(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Value::String(s) => Some(
            s.lines()
                .map(strip_list_marker)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Number(_) | Value::Bool(_) => scalar_text(value).map(|s| vec![s]),
        Value::Null | Value::Object(_) => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `- item`, `* item`, `• item`, `1. item`, `2) item` -> `item`
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim();
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return item.trim();
        }
    }
    line
}

/// Remove a surrounding ```json ... ``` fence if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    // Drop the info string (e.g. "json") on the opening line
    match body.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with('{') => rest.trim(),
        _ => body.trim(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without recognizable fields",
    }
}
