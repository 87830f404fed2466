//! Helpers for pulling JSON out of free-form language-model output.

use serde_json::Value as JsonValue;

/// Removes a surrounding markdown code fence (```` ``` ```` or ```` ```json ````), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Returns the span from the first `{` to the last `}` inclusive.
pub fn object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parses the first-`{`-to-last-`}` span as a JSON object.
pub fn parse_object_span(raw: &str) -> Option<serde_json::Map<String, JsonValue>> {
    let span = object_span(raw)?;
    match serde_json::from_str::<JsonValue>(span) {
        Ok(JsonValue::Object(map)) => Some(map),
        _ => None,
    }
}

/// Reads a numeric field that may arrive as a number or a numeric string.
pub fn number_field(map: &serde_json::Map<String, JsonValue>, key: &str) -> Option<f64> {
    match map.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn string_field(map: &serde_json::Map<String, JsonValue>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the non-empty string items of an array field; anything else yields an empty list.
pub fn string_list_field(map: &serde_json::Map<String, JsonValue>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_code_fences(raw), "[\"a\", \"b\"]");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn finds_object_inside_prose() {
        let raw = "Here is my evaluation:\n{\"score\": 7}\nThanks!";
        let map = parse_object_span(raw).expect("object");
        assert_eq!(number_field(&map, "score"), Some(7.0));
    }

    #[test]
    fn no_object_when_braces_reversed() {
        assert!(object_span("} nothing {").is_none());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let map = parse_object_span(r#"{"score": "8.5", "bad": "x"}"#).unwrap();
        assert_eq!(number_field(&map, "score"), Some(8.5));
        assert_eq!(number_field(&map, "bad"), None);
        assert_eq!(number_field(&map, "missing"), None);
    }

    #[test]
    fn string_lists_skip_non_strings() {
        let map = parse_object_span(r#"{"items": ["a", 1, "", " b "]}"#).unwrap();
        assert_eq!(string_list_field(&map, "items"), vec!["a", "b"]);
        assert!(string_list_field(&map, "other").is_empty());
    }
}
