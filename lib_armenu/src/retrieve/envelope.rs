//! # Response Envelope Decoding
//!
//! The backend answers either with the bare payload (`GET /items` returns a
//! JSON array) or with the standard envelope `{ success, data, message }`.
//! Error bodies may carry `{ error: { code, message, details } }`, and a 422
//! carries the validation shape with a `details` list.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{ApiError, ErrorCode, FieldError, MenuError, MenuResult, ValidationApiError};

const MAX_RAW_MESSAGE: usize = 200;

/// Unwraps the envelope if present, then deserialises into `T`.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> MenuResult<T> {
    let payload = match value {
        Value::Object(mut map) if matches!(map.get("success"), Some(Value::Bool(_))) => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(false);
            if !success {
                return Err(envelope_failure(&Value::Object(map), None));
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value::<T>(payload).map_err(|e| {
        ApiError::new(ErrorCode::ParseError, format!("Response did not match the expected schema: {}", e)).into()
    })
}

/// Builds the error for a non-2xx response from its status and raw body.
pub fn decode_error_body(status: u16, body: &str) -> MenuError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(json) = &parsed {
        let wire_code = error_code_field(json);
        let is_validation = status == 422 || wire_code.as_deref() == Some(ErrorCode::ValidationError.as_str());
        if is_validation {
            if let Some(details) = validation_details(json) {
                let mut err = ValidationApiError::new(
                    message_field(json).unwrap_or_else(|| "Validation failed".to_string()),
                    details,
                );
                err.status = Some(status);
                return err.into();
            }
        }
        return envelope_failure(json, Some(status));
    }

    let message = if body.trim().is_empty() {
        format!("Request failed with status {}", status)
    } else {
        truncate(body.trim(), MAX_RAW_MESSAGE)
    };
    ApiError::new(ErrorCode::from_status(status), message).with_status(status).into()
}

fn envelope_failure(json: &Value, status: Option<u16>) -> MenuError {
    let code = error_code_field(json)
        .and_then(|c| ErrorCode::from_wire(&c))
        .or_else(|| status.map(ErrorCode::from_status))
        .unwrap_or(ErrorCode::HttpError);
    let message = message_field(json).unwrap_or_else(|| match status {
        Some(s) => format!("Request failed with status {}", s),
        None => "Request was not successful".to_string(),
    });

    let mut err = ApiError::new(code, message);
    err.status = status;
    if let Some(details) = json.get("error").and_then(|e| e.get("details")).cloned() {
        err = err.with_details(details);
    }
    err.into()
}

fn error_code_field(json: &Value) -> Option<String> {
    json.get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| json.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn message_field(json: &Value) -> Option<String> {
    json.get("message")
        .and_then(Value::as_str)
        .or_else(|| json.get("error").and_then(|e| e.get("message")).and_then(Value::as_str))
        .or_else(|| json.get("error").and_then(Value::as_str))
        .map(str::to_string)
}

fn validation_details(json: &Value) -> Option<Vec<FieldError>> {
    let list = json
        .get("error")
        .and_then(|e| e.get("details"))
        .or_else(|| json.get("details"))?
        .as_array()?;

    Some(
        list.iter()
            .map(|entry| FieldError {
                field: entry.get("field").and_then(Value::as_str).unwrap_or("").to_string(),
                message: entry
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("invalid value")
                    .to_string(),
                value: entry.get("value").cloned(),
            })
            .collect(),
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
