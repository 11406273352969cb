//! Shared API plumbing
//!
//! Contains:
//! - Application state handed to every handler
//! - The API error envelope and its HTTP mapping
//! - Conversion of `validator` errors into field-level details

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::config::UploadConfig;
use crate::services::ItemCatalog;

/// Application state containing shared, read-only data
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ItemCatalog>,
    pub upload_config: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(catalog: ItemCatalog, upload_config: UploadConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            upload_config: Arc::new(upload_config),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// One failing field: where it is, what went wrong, and the rule it broke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: Vec<serde_json::Value>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// A required field that was not supplied
    pub fn missing(source: &str, field: &str) -> Self {
        Self::new(
            vec![source.into(), field.into()],
            "Field required",
            "missing",
        )
    }
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new("PAYLOAD_TOO_LARGE", message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new("UNSUPPORTED_MEDIA_TYPE", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// Validation failure with field-level details
    pub fn invalid_fields(fields: Vec<FieldError>) -> Self {
        let message = match fields.as_slice() {
            [single] => format!("Invalid field {}: {}", render_loc(&single.loc), single.msg),
            _ => format!("{} fields failed validation", fields.len()),
        };
        let details = serde_json::to_value(&fields).unwrap_or(serde_json::Value::Null);
        Self::with_details("VALIDATION_ERROR", message, details)
    }

    /// Map `validator` errors found in the given parameter source
    pub fn from_validation(source: &str, errors: &ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(vec![source.into()], errors, &mut fields);
        fields.sort_by(|a, b| render_loc(&a.loc).cmp(&render_loc(&b.loc)));
        Self::invalid_fields(fields)
    }

    /// Error from a rejected extractor, keyed by HTTP status
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        match status {
            StatusCode::UNPROCESSABLE_ENTITY => Self::validation_error(message),
            StatusCode::PAYLOAD_TOO_LARGE => Self::payload_too_large(message),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::unsupported_media_type(message),
            s if s.is_client_error() => Self::bad_request(message),
            _ => Self::internal_error(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::UNPROCESSABLE_ENTITY,
            "PAYLOAD_TOO_LARGE" => StatusCode::PAYLOAD_TOO_LARGE,
            "UNSUPPORTED_MEDIA_TYPE" => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.error.code, "{}", self.error.message);
        } else {
            tracing::debug!(code = %self.error.code, "{}", self.error.message);
        }
        (status, Json(self)).into_response()
    }
}

/// Walk nested `validator` errors, flattening them into located field errors
fn collect_field_errors(
    loc: Vec<serde_json::Value>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        let mut field_loc = loc.clone();
        field_loc.push(serde_json::Value::from(field.to_string()));
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    out.push(FieldError::new(field_loc.clone(), describe(error), error.code.to_string()));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(field_loc, inner, out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    let mut entry_loc = field_loc.clone();
                    entry_loc.push(serde_json::Value::from(*index));
                    collect_field_errors(entry_loc, inner, out);
                }
            }
        }
    }
}

/// Human readable message for a single rule violation
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match &*error.code {
        "range" => match (
            param("min"),
            param("max"),
            param("exclusive_min"),
            param("exclusive_max"),
        ) {
            (Some(min), Some(max), _, _) => format!("Value must be between {} and {}", min, max),
            (Some(min), None, _, _) => format!("Value must be greater than or equal to {}", min),
            (None, Some(max), _, _) => format!("Value must be less than or equal to {}", max),
            (_, _, Some(min), _) => format!("Value must be greater than {}", min),
            (_, _, _, Some(max)) => format!("Value must be less than {}", max),
            _ => "Value out of range".to_string(),
        },
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Length must be between {} and {}", min, max),
            (Some(min), None) => format!("Length must be at least {}", min),
            (None, Some(max)) => format!("Length must be at most {}", max),
            _ => "Invalid length".to_string(),
        },
        "regex" => "Value does not match the required pattern".to_string(),
        "email" => "Value is not a valid email address".to_string(),
        "url" => "Value is not a valid URL".to_string(),
        code => format!("Failed validation rule '{}'", code),
    }
}

fn render_loc(loc: &[serde_json::Value]) -> String {
    loc.iter()
        .map(|part| match part {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Offer};
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::payload_too_large("x").status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::internal_error("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new("SOMETHING_ELSE", "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_status() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "bad");
        assert_eq!(err.error.code, "VALIDATION_ERROR");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "bad");
        assert_eq!(err.error.code, "BAD_REQUEST");

        let err = ApiError::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE, "bad");
        assert_eq!(err.error.code, "UNSUPPORTED_MEDIA_TYPE");
    }

    #[test]
    fn test_from_validation_flat_field() {
        let errors = Item::new("A", -1.0).validate().unwrap_err();
        let err = ApiError::from_validation("body", &errors);

        assert_eq!(err.error.code, "VALIDATION_ERROR");
        let details = err.error.details.unwrap();
        assert_eq!(details[0]["loc"], json!(["body", "price"]));
        assert_eq!(details[0]["type"], "range");
        assert!(details[0]["msg"].as_str().unwrap().contains("greater than"));
    }

    #[test]
    fn test_from_validation_nested_list() {
        let offer = Offer {
            name: "Bundle".to_string(),
            description: None,
            price: 1.0,
            items: vec![Item::new("ok", 1.0), Item::new("bad", 0.0)],
        };
        let errors = offer.validate().unwrap_err();
        let err = ApiError::from_validation("body", &errors);

        let details = err.error.details.unwrap();
        assert_eq!(details[0]["loc"], json!(["body", "items", 1, "price"]));
        assert!(err.error.message.contains("body.items.1.price"));
    }

    #[test]
    fn test_invalid_fields_message_counts() {
        let err = ApiError::invalid_fields(vec![
            FieldError::missing("form", "username"),
            FieldError::missing("form", "password"),
        ]);

        assert_eq!(err.error.message, "2 fields failed validation");
        assert_eq!(err.error.details.unwrap()[1]["type"], "missing");
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = ApiError::not_found("Item not found: qux");
        let value = serde_json::to_value(&err).unwrap();

        assert_eq!(value, json!({"error": {"code": "NOT_FOUND", "message": "Item not found: qux"}}));
    }
}
