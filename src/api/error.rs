//! Classification of HTTP failures.

use serde_json::Value;

use crate::error::MoveMindsError;

/// Map a reqwest failure that happened before a status line was read.
pub(super) fn from_transport(error: reqwest::Error) -> MoveMindsError {
    if error.is_builder() {
        return MoveMindsError::Config(format!("invalid request: {error}"));
    }
    if error.is_timeout() {
        return MoveMindsError::Network(format!("request timed out: {error}"));
    }
    MoveMindsError::Network(error.to_string())
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers with `{"message": ...}` for handled errors and
/// `{"error": ...}` for framework errors; anything else is used verbatim
/// when it is short plain text.
pub(super) fn extract_message(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(Value::as_str)
                && !text.trim().is_empty()
            {
                return Some(text.trim().to_string());
            }
        }
        return None;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.len() > 200 || text.starts_with('<') {
        return None;
    }
    Some(text.to_string())
}
