//! Error payloads returned by the admin API.

use serde_json::Value;

/// Message fields pulled out of a non-2xx response body.
///
/// The backend is inconsistent about where it puts the human-readable reason:
/// `message`, `error` (a string or an object with its own `message`), or
/// `detail`. Plain-text bodies are accepted as the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Top-level `message` field.
    pub message: Option<String>,
    /// `error` field, or `error.message` when it is an object.
    pub error: Option<String>,
    /// `detail` field.
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// Parse a raw response body; unrecognized bodies yield an empty value.
    #[must_use]
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => {
                let text = String::from_utf8_lossy(body);
                let text = text.trim();
                let message = (!text.is_empty() && !text.starts_with('<'))
                    .then(|| text.chars().take(MAX_PLAIN_TEXT).collect());
                Self {
                    message,
                    ..Self::default()
                }
            }
        }
    }

    /// Extract message fields from a decoded JSON body.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            message: string_at(value, "message"),
            error: string_at(value, "error")
                .or_else(|| value.get("error").and_then(|inner| string_at(inner, "message"))),
            detail: string_at(value, "detail"),
        }
    }

    /// Most specific message available, in `message`, `error`, `detail` order.
    #[must_use]
    pub fn most_specific(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .or(self.detail.as_deref())
    }
}

const MAX_PLAIN_TEXT: usize = 200;

fn string_at(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_then_error_then_detail() {
        let body = ApiErrorBody::from_bytes(br#"{"error":"bad id","detail":"row 4"}"#);
        assert_eq!(body.most_specific(), Some("bad id"));
        let body = ApiErrorBody::from_bytes(br#"{"message":"Email taken","error":"conflict"}"#);
        assert_eq!(body.most_specific(), Some("Email taken"));
        let body = ApiErrorBody::from_bytes(br#"{"detail":"missing field"}"#);
        assert_eq!(body.most_specific(), Some("missing field"));
    }

    #[test]
    fn nested_error_objects_are_read() {
        let body = ApiErrorBody::from_bytes(br#"{"error":{"message":"token expired"}}"#);
        assert_eq!(body.most_specific(), Some("token expired"));
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        assert_eq!(
            ApiErrorBody::from_bytes(b"Service Unavailable").most_specific(),
            Some("Service Unavailable")
        );
        assert_eq!(ApiErrorBody::from_bytes(b"").most_specific(), None);
        assert_eq!(ApiErrorBody::from_bytes(b"<html>oops</html>").most_specific(), None);
        assert_eq!(ApiErrorBody::from_bytes(br#"{"message":"  "}"#).most_specific(), None);
    }
}
