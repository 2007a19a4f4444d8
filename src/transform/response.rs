//! Strict parser for `generateContent` responses.
//!
//! The only accepted shape is
//! `{"candidates":[{"content":{"parts":[{"text":"..."}]}}]}` (extra fields are
//! ignored).  Every missing key, wrong type or empty array is reported as
//! [`TransformError::MalformedResponse`] naming the step that failed.

use serde_json::Value;

use super::TransformError;

/// Extract `candidates[0].content.parts[0].text` from a response body.
pub fn parse_response(body: &str) -> Result<String, TransformError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TransformError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let root = json
        .as_object()
        .ok_or_else(|| malformed("response is not a JSON object"))?;

    let candidates = root
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("no candidates array"))?;
    let candidate = candidates
        .first()
        .ok_or_else(|| malformed("empty candidates array"))?;

    let content = candidate
        .get("content")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("no content in candidate"))?;

    let parts = content
        .get("parts")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("no parts in content"))?;
    let part = parts.first().ok_or_else(|| malformed("empty parts array"))?;

    part.get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed("no text in part"))
}

fn malformed(step: &str) -> TransformError {
    TransformError::MalformedResponse(step.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_of(body: &str) -> String {
        match parse_response(body) {
            Err(TransformError::MalformedResponse(step)) => step,
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_response_yields_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"X"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "X");
    }

    #[test]
    fn extra_fields_and_extra_elements_are_ignored() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}], "role": "model"},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "other"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;
        assert_eq!(parse_response(body).unwrap(), "first");
    }

    #[test]
    fn text_is_returned_untrimmed() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":" Bonjour\n"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), " Bonjour\n");
    }

    #[test]
    fn missing_candidates() {
        assert_eq!(step_of(r#"{"promptFeedback":{}}"#), "no candidates array");
    }

    #[test]
    fn empty_candidates() {
        assert_eq!(step_of(r#"{"candidates":[]}"#), "empty candidates array");
    }

    #[test]
    fn missing_content() {
        assert_eq!(
            step_of(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            "no content in candidate"
        );
    }

    #[test]
    fn missing_parts() {
        assert_eq!(
            step_of(r#"{"candidates":[{"content":{"role":"model"}}]}"#),
            "no parts in content"
        );
    }

    #[test]
    fn empty_parts() {
        assert_eq!(
            step_of(r#"{"candidates":[{"content":{"parts":[]}}]}"#),
            "empty parts array"
        );
    }

    #[test]
    fn missing_text() {
        assert_eq!(
            step_of(r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#),
            "no text in part"
        );
    }

    #[test]
    fn wrong_types_are_malformed() {
        assert_eq!(step_of(r#"{"candidates":{}}"#), "no candidates array");
        assert_eq!(
            step_of(r#"{"candidates":[{"content":"hi"}]}"#),
            "no content in candidate"
        );
        assert_eq!(
            step_of(r#"{"candidates":[{"content":{"parts":[{"text":42}]}}]}"#),
            "no text in part"
        );
    }

    #[test]
    fn non_object_root_is_malformed() {
        assert_eq!(step_of("[]"), "response is not a JSON object");
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(step_of("not json").starts_with("invalid JSON"));
        assert!(step_of("").starts_with("invalid JSON"));
    }
}
