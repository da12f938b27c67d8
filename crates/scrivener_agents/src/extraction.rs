//! Utilities for pulling JSON out of generated text.
//!
//! Generators often wrap JSON in markdown fences or surround it with
//! commentary. These helpers find the structure so the extractors can decode
//! it into records.

use scrivener_error::{ParseError, ParseErrorKind};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Fenced code block (```json ... ``` or a bare fence)
/// 2. The first balanced array or object, whichever opens first
///
/// # Errors
///
/// Returns [`ParseErrorKind::NoJson`] when no candidate structure is found.
///
/// # Examples
///
/// ```
/// use scrivener_agents::extract_json;
///
/// let response = "Here are the characters:\n```json\n[{\"name\": \"Mara\"}]\n```";
/// assert_eq!(extract_json(response).unwrap(), "[{\"name\": \"Mara\"}]");
///
/// let inline = "Found: [{\"name\": \"Ilse\"}] and nothing else.";
/// assert_eq!(extract_json(inline).unwrap(), "[{\"name\": \"Ilse\"}]");
/// ```
pub fn extract_json(response: &str) -> Result<String, ParseError> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let (first, second) = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => (('[', ']'), ('{', '}')),
        (Some(_), None) => (('[', ']'), ('[', ']')),
        _ => (('{', '}'), ('[', ']')),
    };

    if let Some(json) = extract_balanced(response, first.0, first.1)
        .or_else(|| extract_balanced(response, second.0, second.1))
    {
        return Ok(json);
    }

    tracing::debug!(response_length = response.len(), "No JSON found in response");
    Err(ParseError::new(ParseErrorKind::NoJson(response.len())))
}

/// Decode a JSON string into `T`.
///
/// # Errors
///
/// Returns [`ParseErrorKind::InvalidJson`] with a short preview of the input.
pub fn parse_json<T>(json: &str) -> Result<T, ParseError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json).map_err(|e| {
        let preview: String = json.chars().take(100).collect();
        ParseError::new(ParseErrorKind::InvalidJson(format!("{} (JSON: {}...)", e, preview)))
    })
}

fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        return Some(fenced_body(response, content_start));
    }

    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip an unknown language tag
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);
    Some(fenced_body(response, skip_to))
}

/// Body up to the closing fence, or to the end when the response was truncated.
fn fenced_body(response: &str, from: usize) -> String {
    match response[from..].find("```") {
        Some(end) => response[from..from + end].trim().to_string(),
        None => response[from..].trim().to_string(),
    }
}

/// First `open` ... matching `close` span, ignoring delimiters inside strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_fence_with_unknown_tag() {
        let response = "```javascript\n{\"a\": 1}\n```";
        assert_eq!(extract_json(response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_truncated_fence_returns_remainder() {
        let response = "```json\n[{\"name\": \"Mara\"}";
        assert_eq!(extract_json(response).unwrap(), "[{\"name\": \"Mara\"}");
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let response = r#"Result: [{"name": "The ] Gate", "details": "a \"quoted\" [x]"}] trailing"#;
        let json = extract_json(response).unwrap();
        assert!(json.ends_with("}]"));
        let value: serde_json::Value = parse_json(&json).unwrap();
        assert_eq!(value[0]["name"], "The ] Gate");
    }

    #[test]
    fn test_object_before_array() {
        let response = r#"{"characters": [{"name": "Ilse"}]}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_no_json() {
        let err = extract_json("Nobody appears in this chapter.").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoJson(31));
    }

    #[test]
    fn test_invalid_json_reports_preview() {
        let err = parse_json::<Vec<serde_json::Value>>("[{\"name\": }]").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidJson(ref m) if m.contains("[{\"name\"")));
    }
}
