//! Parameter binding
//!
//! Validating extractors for path, query, JSON and form input. Each one
//! deserializes with serde, then runs the `validator` rules declared on the
//! target type. Deserialization runs under `serde_path_to_error`, so a value
//! that cannot be coerced is reported with its location just like a broken
//! rule.

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, RawPathParams, Request,
    },
    http::{header, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use validator::Validate;

use crate::api::middleware::{ApiError, FieldError};

/// Path parameters, coerced and validated
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

/// Query parameters, coerced and validated
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

/// JSON body, validated recursively
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

/// URL-encoded form body, validated
#[derive(Debug, Clone)]
pub struct ValidForm<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => value,
            Err(rejection) => {
                // Enum and custom errors carry no key; fall back to the route's only parameter
                let keys: Vec<String> = RawPathParams::from_request_parts(parts, state)
                    .await
                    .map(|params| params.iter().map(|(key, _)| key.to_string()).collect())
                    .unwrap_or_default();
                return Err(path_error(rejection, &keys));
            }
        };
        value
            .validate()
            .map_err(|e| ApiError::from_validation("path", &e))?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = decode_urlencoded("query", query.as_bytes())?;
        value
            .validate()
            .map_err(|e| ApiError::from_validation("query", &e))?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Content type and syntax are checked by axum, field types here
        let Json(raw) = Json::<Value>::from_request(req, state).await?;
        let value: T = serde_path_to_error::deserialize(raw).map_err(|e| located("body", e))?;
        value
            .validate()
            .map_err(|e| ApiError::from_validation("body", &e))?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_form_content_type(req.headers()) {
            return Err(ApiError::unsupported_media_type(
                "Expected request with `Content-Type: application/x-www-form-urlencoded`",
            ));
        }
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::from_status(e.status(), e.body_text()))?;
        let value: T = decode_urlencoded("form", &body)?;
        value
            .validate()
            .map_err(|e| ApiError::from_validation("form", &e))?;
        Ok(Self(value))
    }
}

/// Deserialize `a=1&b=2` input, keeping the key that failed
fn decode_urlencoded<T: DeserializeOwned>(source: &str, input: &[u8]) -> Result<T, ApiError> {
    let deserializer = serde_urlencoded::Deserializer::new(form_urlencoded::parse(input));
    serde_path_to_error::deserialize(deserializer).map_err(|e| located(source, e))
}

fn has_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

/// Turn a serde error into a field error rooted at the parameter source
fn located<E: std::fmt::Display>(source: &str, error: serde_path_to_error::Error<E>) -> ApiError {
    let mut loc: Vec<Value> = vec![source.into()];
    for segment in error.path().iter() {
        match segment {
            Segment::Seq { index } => loc.push(Value::from(*index)),
            Segment::Map { key } => loc.push(Value::from(key.as_str())),
            Segment::Enum { variant } => loc.push(Value::from(variant.as_str())),
            _ => {}
        }
    }

    let message = error.inner().to_string();
    match missing_field(&message) {
        Some(field) => {
            loc.push(Value::from(field));
            ApiError::invalid_fields(vec![FieldError::new(loc, "Field required", "missing")])
        }
        None => ApiError::invalid_fields(vec![FieldError::new(loc, message, "type_error")]),
    }
}

/// Field name out of serde's "missing field `name`" message
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

fn path_error(rejection: PathRejection, keys: &[String]) -> ApiError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(e) => {
            let single_key = match keys {
                [key] => Some(key.clone()),
                _ => None,
            };
            let (key, message, kind) = match e.into_kind() {
                ErrorKind::ParseErrorAtKey { key, expected_type, .. } => (
                    Some(key),
                    format!("Input should be a valid {}", expected_type),
                    "parse",
                ),
                ErrorKind::ParseError { expected_type, .. } => (
                    single_key,
                    format!("Input should be a valid {}", expected_type),
                    "parse",
                ),
                ErrorKind::DeserializeError { key, message, .. } => {
                    (Some(key), message, "deserialize")
                }
                other => (single_key, other.to_string(), "deserialize"),
            };
            match key {
                Some(key) => ApiError::invalid_fields(vec![FieldError::new(
                    vec!["path".into(), key.into()],
                    message,
                    kind,
                )]),
                None => ApiError::validation_error(message),
            }
        }
        other => ApiError::from_status(other.status(), other.body_text()),
    }
}

// ============================================================================
// Rejection conversions
// ============================================================================

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::validation_error(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => ApiError::bad_request(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => {
                ApiError::unsupported_media_type(e.body_text())
            }
            other => ApiError::from_status(other.status(), other.body_text()),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::from_status(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::from_status(error.status(), error.body_text())
    }
}
