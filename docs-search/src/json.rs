//! Tolerant extraction of JSON from model output.

use crate::error::Result;
use log::warn;
use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Remove a surrounding Markdown code fence (with optional language tag).
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// Parse a JSON array, skipping elements that do not deserialize into `T`.
/// Anything that is not an array yields an empty vector.
pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Vec<T> {
    let value: serde_json::Value = match serde_json::from_str(strip_code_fence(text)) {
        Ok(value) => value,
        Err(err) => {
            warn!("Model response is not valid JSON: {err}");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = value else {
        warn!("Model response is JSON but not an array");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("Skipping array element: {err}");
                None
            }
        })
        .collect()
}

pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}
