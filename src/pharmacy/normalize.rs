//! Turns raw provider text into JSON.
//!
//! Models like to wrap JSON in markdown code fences even when asked not to,
//! so the fence markers are removed before parsing.

use serde_json::Value;
use tracing::debug;

use crate::pharmacy::error::QueryError;

const FENCE: &str = "```";

/// Strips code fences and surrounding whitespace, then parses JSON.
///
/// Empty or whitespace-only input is an [`QueryError::EmptyResponse`];
/// anything that does not parse is a [`QueryError::MalformedResponse`].
pub fn normalize(raw: &str) -> Result<Value, QueryError> {
    if raw.trim().is_empty() {
        return Err(QueryError::EmptyResponse);
    }

    let core = strip_fences(raw);
    if core.is_empty() {
        debug!(raw = %raw, "provider returned an empty code fence");
        return Err(QueryError::malformed("code fence contains no JSON", raw));
    }

    serde_json::from_str(core).map_err(|err| {
        debug!(raw = %raw, error = %err, "failed to parse provider JSON");
        QueryError::malformed(err.to_string(), raw)
    })
}

/// Removes one leading fence (with its optional language tag) and one
/// trailing fence. Text without fences is only trimmed.
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = &rest[language_tag_len(rest)..];
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

// A word right after the opening fence is a tag only when whitespace
// follows it and it cannot be a JSON literal; otherwise only a literal
// `json` prefix is dropped.
fn language_tag_len(rest: &str) -> usize {
    let word_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let word = &rest[..word_len];
    let spaced = rest[word_len..].starts_with(char::is_whitespace);
    let literal = matches!(word, "true" | "false" | "null");

    if spaced && !literal && word.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return word_len;
    }
    match rest.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("json") => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{normalize, strip_fences};
    use crate::pharmacy::error::QueryError;

    #[test]
    fn json_fence_is_removed() {
        let value = normalize("```json\n{\"a\":1}\n```").expect("fenced JSON should parse");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn fences_without_tag_and_with_padding_are_removed() {
        let value = normalize("  \n```\n[1, 2, 3]\n```  \n").expect("fenced array should parse");
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn fenced_and_bare_inputs_agree() {
        let core = r#"{"name":"Paracetamol","warnings":["liver"]}"#;
        let wrapped = [
            core.to_string(),
            format!("```json\n{core}\n```"),
            format!("```JSON{core}```"),
            format!("\t```\n{core}\n```\n\n"),
        ];
        for scalar in ["42", "-1", "true", "null", "\"text\""] {
            let expected: serde_json::Value = serde_json::from_str(scalar).expect("valid scalar");
            assert_eq!(normalize(&format!("```json{scalar}```")).expect("parses"), expected);
            assert_eq!(normalize(&format!("```json\n{scalar}\n```")).expect("parses"), expected);
        }
        let expected: serde_json::Value = serde_json::from_str(core).expect("core is valid JSON");
        for input in wrapped {
            assert_eq!(normalize(&input).expect("input should parse"), expected);
        }
    }

    #[test]
    fn compact_fenced_scalars_keep_their_value() {
        let cases = [
            ("```json42```", json!(42)),
            ("```42```", json!(42)),
            ("```true```", json!(true)),
            ("```null```", json!(null)),
            ("```json-1```", json!(-1)),
            ("```JSONfalse```", json!(false)),
            ("```true\n```", json!(true)),
            ("```jsonc\n[1]\n```", json!([1])),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize(input).expect("fenced scalar should parse"), expected);
        }
    }

    #[test]
    fn empty_and_whitespace_inputs_are_empty_responses() {
        for input in ["", "   ", "\n\t  \n"] {
            assert!(matches!(normalize(input), Err(QueryError::EmptyResponse)));
        }
    }

    #[test]
    fn fence_without_body_is_malformed() {
        for input in ["```", "```json\n```", "``````"] {
            assert!(matches!(
                normalize(input),
                Err(QueryError::MalformedResponse { .. })
            ));
        }
    }

    #[test]
    fn invalid_json_is_malformed_and_keeps_raw_text() {
        for input in ["{a:1}", "{\"a\":1,}", "{\"a\":\"unterminated}", "not json at all"] {
            match normalize(input) {
                Err(QueryError::MalformedResponse { raw, reason }) => {
                    assert_eq!(raw, input);
                    assert!(!reason.is_empty());
                }
                other => panic!("expected malformed response for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn normalizing_reserialized_output_is_stable() {
        let first = normalize("```json\n{\"b\":[true,null],\"a\":\"x\"}\n```").expect("valid");
        let again = normalize(&first.to_string()).expect("re-serialized JSON is valid");
        let third = normalize(&again.to_string()).expect("re-serialized JSON is valid");
        assert_eq!(first, again);
        assert_eq!(again, third);
    }

    #[test]
    fn strip_fences_leaves_plain_text_alone() {
        assert_eq!(strip_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
    }
}
