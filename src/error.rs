//! Request error types and their JSON rendering.
//!
//! Every error a client can trigger is converted at the handler boundary into
//! a response with a `{"detail": ...}` body. Nothing here is fatal to the server.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Machine-readable category of a single field failure.
///
/// Names and messages follow the pydantic vocabulary the service's clients
/// already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field or body absent
    Missing,
    /// Field is a string that does not hold an integer
    IntParsing,
    /// Field is a number with a fractional part
    IntFromFloat,
    /// Field is null, an array or an object
    IntType,
    /// Field is below the signed 64-bit range
    GreaterThanEqual,
    /// Field is above the signed 64-bit range
    LessThanEqual,
    /// Body is not valid JSON
    JsonInvalid,
    /// Body is valid JSON but not an object
    ModelType,
}

impl ErrorKind {
    /// Human-readable message for this kind of failure
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Missing => "Field required",
            ErrorKind::IntParsing => {
                "Input should be a valid integer, unable to parse string as an integer"
            }
            ErrorKind::IntFromFloat => {
                "Input should be a valid integer, got a number with a fractional part"
            }
            ErrorKind::IntType => "Input should be a valid integer",
            ErrorKind::GreaterThanEqual => {
                "Input should be greater than or equal to -9223372036854775808"
            }
            ErrorKind::LessThanEqual => "Input should be less than or equal to 9223372036854775807",
            ErrorKind::JsonInvalid => "JSON decode error",
            ErrorKind::ModelType => "Input should be a valid dictionary or object",
        }
    }
}

/// One entry of a validation error body.
///
/// `loc` is the path to the offending value, starting at `"body"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    /// Failure of the body as a whole
    pub fn body(kind: ErrorKind, input: Option<Value>) -> Self {
        Self {
            kind,
            loc: vec!["body".to_string()],
            msg: kind.message().to_string(),
            input,
        }
    }

    /// Failure of a named top-level field
    pub fn field(name: &str, kind: ErrorKind, input: Option<Value>) -> Self {
        Self {
            kind,
            loc: vec!["body".to_string(), name.to_string()],
            msg: kind.message().to_string(),
            input,
        }
    }

    /// Name of the offending field, if the failure is field-specific
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("Failed to read request body: {}", .0.body_text())]
    Body(#[from] BytesRejection),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!(errors = %describe(&errors), "Rejected request body");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": errors })),
                )
                    .into_response()
            }
            AppError::Body(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Failed to read request body");
                (
                    rejection.status(),
                    Json(json!({ "detail": rejection.body_text() })),
                )
                    .into_response()
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": self.to_string() })),
            )
                .into_response(),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "detail": self.to_string() })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_serialization() {
        let err = FieldError::field("a", ErrorKind::IntParsing, Some(json!("x")));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "int_parsing",
                "loc": ["body", "a"],
                "msg": "Input should be a valid integer, unable to parse string as an integer",
                "input": "x",
            })
        );
    }

    #[test]
    fn test_missing_field_omits_input() {
        let err = FieldError::field("b", ErrorKind::Missing, None);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["type"], "missing");
        assert!(value.get("input").is_none());
        assert_eq!(err.field_name(), Some("b"));
    }

    #[test]
    fn test_range_kinds_serialize_as_constraints() {
        let low = FieldError::field("a", ErrorKind::GreaterThanEqual, Some(json!(-1e30)));
        let high = FieldError::field("a", ErrorKind::LessThanEqual, Some(json!(u64::MAX)));
        assert_eq!(serde_json::to_value(&low).unwrap()["type"], "greater_than_equal");
        assert_eq!(serde_json::to_value(&high).unwrap()["type"], "less_than_equal");
        assert!(high.msg.ends_with(&i64::MAX.to_string()));
        assert!(low.msg.ends_with(&i64::MIN.to_string()));
    }

    #[test]
    fn test_body_error_has_no_field_name() {
        let err = FieldError::body(ErrorKind::JsonInvalid, None);
        assert_eq!(err.loc, vec!["body".to_string()]);
        assert_eq!(err.field_name(), None);
    }

    #[test]
    fn test_status_codes() {
        let validation = AppError::Validation(vec![FieldError::field("a", ErrorKind::Missing, None)]);
        assert_eq!(validation.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = AppError::Validation(vec![
            FieldError::field("a", ErrorKind::IntType, Some(json!(true))),
            FieldError::field("b", ErrorKind::Missing, None),
        ]);
        let text = err.to_string();
        assert!(text.contains("body.a: Input should be a valid integer"));
        assert!(text.contains("body.b: Field required"));
    }
}
