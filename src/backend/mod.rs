// ABOUTME: Backend module — the remote reply service behind the chat.
// ABOUTME: Defines the request shape, the typed failure kinds, and reply-field extraction.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpBackend;

/// Body POSTed to the backend for each user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Why a backend call did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response was not valid JSON: {0}")]
    Malformed(String),
}

/// Outcome of a backend call: the reply text if the body carried one.
pub type ReplyResult = Result<Option<String>, BackendError>;

/// A remote service that answers chat messages.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> ReplyResult;
}

/// Parse a response body and pull out the reply text.
///
/// `reply` wins over `answer`. A body that is valid JSON but carries neither
/// field is not an error; a `null` body is.
pub fn parse_reply_body(body: &str) -> ReplyResult {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(e.to_string()))?;
    if value.is_null() {
        return Err(BackendError::Malformed("response body was null".to_string()));
    }
    Ok(extract_reply(&value))
}

/// Pick the reply text out of a decoded response body.
///
/// A field counts only when it is truthy: `null`, `false`, `0` and `""` are
/// skipped. Other scalars are shown as their JSON text.
pub fn extract_reply(value: &serde_json::Value) -> Option<String> {
    ["reply", "answer"]
        .iter()
        .find_map(|field| value.get(field).and_then(reply_text))
}

fn reply_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_session_key() {
        let req = ChatRequest {
            message: "Hello".to_string(),
            session_id: "sess_abc".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"message": "Hello", "sessionId": "sess_abc"})
        );
    }

    #[test]
    fn reply_is_preferred_over_answer() {
        let v = json!({"reply": "from reply", "answer": "from answer"});
        assert_eq!(extract_reply(&v).as_deref(), Some("from reply"));
    }

    #[test]
    fn answer_is_used_when_reply_missing_or_empty() {
        assert_eq!(
            extract_reply(&json!({"answer": "A"})).as_deref(),
            Some("A")
        );
        assert_eq!(
            extract_reply(&json!({"reply": "", "answer": "A"})).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn no_reply_fields_yields_none() {
        assert_eq!(extract_reply(&json!({"status": "ok"})), None);
        assert_eq!(extract_reply(&json!(["reply"])), None);
        assert_eq!(extract_reply(&json!("reply")), None);
    }

    #[test]
    fn truthy_scalars_are_shown_as_text() {
        assert_eq!(extract_reply(&json!({"reply": 42})).as_deref(), Some("42"));
        assert_eq!(extract_reply(&json!({"reply": 2.5})).as_deref(), Some("2.5"));
        assert_eq!(extract_reply(&json!({"answer": true})).as_deref(), Some("true"));
    }

    #[test]
    fn falsy_reply_falls_through_to_answer() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let body = json!({"reply": falsy.clone(), "answer": "A"});
            assert_eq!(extract_reply(&body).as_deref(), Some("A"), "reply {:?}", falsy);
        }
        assert_eq!(extract_reply(&json!({"reply": 0, "answer": false})), None);
    }

    #[test]
    fn null_body_is_malformed() {
        let err = parse_reply_body("null").unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[test]
    fn non_object_body_without_fields_is_placeholder() {
        assert_eq!(parse_reply_body("42").unwrap(), None);
        assert_eq!(parse_reply_body("[]").unwrap(), None);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_reply_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[test]
    fn valid_body_parses_reply() {
        assert_eq!(
            parse_reply_body(r#"{"reply":"Hi there!"}"#).unwrap().as_deref(),
            Some("Hi there!")
        );
    }
}
