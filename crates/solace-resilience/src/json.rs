// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-mode response cleanup: code-fence stripping and lenient parsing.

use tracing::debug;

/// Strips a Markdown code-fence wrapper from a model response, if present.
///
/// Handles both ```json and bare ``` fences. Text outside the fence is
/// discarded; text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        let inner = rest.trim_start_matches(['\r', '\n']);
        if let Some(end) = inner.find("```") {
            return inner[..end].trim();
        }
        return inner.trim();
    }

    trimmed
}

/// Parses a model response into a JSON object.
///
/// Strips code fences first, then falls back to the first `{`..last `}` span
/// for responses with surrounding prose. Returns `None` for anything that is
/// not a JSON object; the orchestrator treats that exactly like a provider
/// failure.
pub fn parse_json_object(text: &str) -> Option<serde_json::Value> {
    let cleaned = strip_code_fences(text);

    let candidate = match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(value) => Some(value),
        Err(_) => {
            let start = cleaned.find('{')?;
            let end = cleaned.rfind('}')?;
            if end <= start {
                return None;
            }
            serde_json::from_str(&cleaned[start..=end]).ok()
        }
    };

    match candidate {
        Some(value) if value.is_object() => Some(value),
        Some(other) => {
            debug!(kind = %json_kind(&other), "JSON response was not an object");
            None
        }
        None => None,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
