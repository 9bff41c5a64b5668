use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown error";
const UNPARSEABLE_ERROR: &str = "Failed to parse error response from Chronicle";

/// Human-readable reason from a Chronicle error body. Accepts both
/// `{"error": "..."}` and the Google API shape `{"error": {"message": ...}}`.
pub(crate) fn error_reason(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return UNPARSEABLE_ERROR.to_string();
    };

    match value.get("error") {
        Some(Value::String(reason)) => reason.clone(),
        Some(Value::Object(err)) => err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(err.clone()).to_string()),
        Some(other) => other.to_string(),
        None => UNKNOWN_ERROR.to_string(),
    }
}
