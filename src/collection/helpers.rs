use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SyncError;
use crate::transport::ApiResponse;

use super::RecordId;

/// Pulls `error` or `message` out of a JSON error body.
pub fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let obj = value.as_object()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

pub fn check_status(response: ApiResponse, fallback: &str) -> Result<ApiResponse, SyncError> {
    if response.status.is_success() {
        return Ok(response);
    }
    let message = server_message(&response.body).unwrap_or_else(|| fallback.to_string());
    Err(SyncError::server(message))
}

pub fn decode_records<R: DeserializeOwned>(
    body: &[u8],
    fallback: &str,
) -> Result<Vec<R>, SyncError> {
    serde_json::from_slice::<Vec<R>>(body).map_err(|e| {
        SyncError::malformed(format!("{fallback}: unexpected response from the server ({e})"))
    })
}

pub fn created_id(body: &[u8], field: &str) -> Option<RecordId> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncErrorCode;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn prefers_error_then_message_fields() {
        let body = br#"{"error": "User ID parameter is required"}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("User ID parameter is required")
        );
        let body = br#"{"message": "No pantry item found with that ID"}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("No pantry item found with that ID")
        );
        assert_eq!(server_message(b"<html>boom</html>"), None);
        assert_eq!(server_message(br#"{"error": "  "}"#), None);
    }

    #[test]
    fn non_success_status_uses_fallback_without_message() {
        let response = ApiResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: b"Internal Server Error".to_vec(),
        };
        let err = check_status(response, "Error fetching items").unwrap_err();
        assert_eq!(err.code, SyncErrorCode::Server);
        assert_eq!(err.message, "Error fetching items");
    }

    #[test]
    fn malformed_list_body_is_reported() {
        let err = decode_records::<serde_json::Value>(br#"{"id": 1}"#, "Error fetching items")
            .unwrap_err();
        assert_eq!(err.code, SyncErrorCode::MalformedResponse);
        assert!(err.message.starts_with("Error fetching items"));
    }

    #[test]
    fn reads_created_ids_from_numbers_or_strings() {
        let body = serde_json::to_vec(&json!({"message": "ok", "item_id": 42})).unwrap();
        assert_eq!(created_id(&body, "item_id"), Some(42));
        let body = serde_json::to_vec(&json!({"note_id": "7"})).unwrap();
        assert_eq!(created_id(&body, "note_id"), Some(7));
        assert_eq!(created_id(b"", "note_id"), None);
    }
}
