// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pull the JSON document out of a model reply

use crate::errors::GenerationError;
use serde_json::Value;

/// Models wrap JSON in prose or code fences. Try, in order: the whole reply,
/// a ```json fenced block, then the outermost `{ ... }` or `[ ... ]` span,
/// whichever opens first. Only objects and arrays are accepted.
pub fn extract_json(reply: &str) -> Result<Value, GenerationError> {
    let trimmed = reply.trim();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Some(value) = parse_document(trimmed) {
            return Ok(value);
        }
    }

    if let Some(value) = fenced_block(trimmed).and_then(parse_document) {
        return Ok(value);
    }

    let mut spans: Vec<(usize, usize)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| Some((trimmed.find(open)?, trimmed.rfind(close)?)))
        .filter(|(start, end)| start < end)
        .collect();
    spans.sort_unstable();

    for (start, end) in spans {
        if let Some(value) = parse_document(&trimmed[start..=end]) {
            return Ok(value);
        }
    }

    Err(GenerationError::MalformedBackendResponse(format!(
        "no JSON object or array in {} character reply",
        reply.len()
    )))
}

fn parse_document(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json").map(|i| i + 7).or_else(|| text.find("```").map(|i| i + 3))?;
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let value = extract_json(r#" {"daily_workout": {"day_date": "2025-06-29"}} "#).unwrap();
        assert_eq!(value["daily_workout"]["day_date"], "2025-06-29");
    }

    #[test]
    fn test_fenced_block() {
        let reply = "Here is your plan:\n```json\n{\"workouts\": []}\n```\nEnjoy!";
        assert_eq!(extract_json(reply).unwrap()["workouts"], serde_json::json!([]));
    }

    #[test]
    fn test_embedded_span() {
        let reply = "Sure! {\"daily_workout\": {\"markdown_content\": \"# Plan\"}} Let me know.";
        assert!(extract_json(reply).unwrap().get("daily_workout").is_some());
    }

    #[test]
    fn test_top_level_array() {
        let value = extract_json(r#"[{"day_date": "2025-06-29"}, {"day_date": "2025-06-30"}]"#).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));

        let fenced = "Your week:\n```json\n[{\"day_date\": \"2025-06-29\"}]\n```";
        assert_eq!(extract_json(fenced).unwrap()[0]["day_date"], "2025-06-29");

        let embedded = "Plan follows: [{\"day_date\": \"2025-06-29\"}] Good luck.";
        assert!(extract_json(embedded).unwrap().is_array());
    }

    #[test]
    fn test_no_document_is_malformed() {
        for reply in ["I cannot help with that.", "42", "\"just a string\"", "{ not json }", ""] {
            let err = extract_json(reply).unwrap_err();
            assert!(matches!(err, GenerationError::MalformedBackendResponse(_)));
        }
    }
}
