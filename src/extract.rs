//! JSON body extraction with per-field validation.
//!
//! `ValidJson<T>` replaces axum's `Json<T>` for request bodies. Instead of
//! failing on the first serde error, the body is parsed into a
//! `serde_json::Value` and handed to `T::from_json`, which reports every
//! offending field. The body is parsed whatever the `Content-Type` says.
//!
//! Integer fields use lax coercion: JSON integers, integral floats (`2.0`),
//! strings holding an integer (`" 5 "`, `"-3"`, `"7.00"`) and booleans are
//! accepted. The result must fit in an `i64`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Number, Value};

use crate::error::{AppError, ErrorKind, FieldError};

/// 2^63 as a float: the first value above `i64::MAX`, and `-i64::MIN`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Build a value from an already-parsed JSON document.
pub trait FromJson: Sized {
    /// On failure, returns every field error found, never an empty list.
    fn from_json(value: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Extractor for a validated JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: FromJson,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;

        if bytes.is_empty() {
            return Err(AppError::Validation(vec![FieldError::body(
                ErrorKind::Missing,
                None,
            )]));
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "Request body is not valid JSON");
            AppError::Validation(vec![FieldError::body(ErrorKind::JsonInvalid, None)])
        })?;

        T::from_json(&value)
            .map(ValidJson)
            .map_err(AppError::Validation)
    }
}

/// Borrow the body as a JSON object.
pub fn require_object(value: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    value
        .as_object()
        .ok_or_else(|| vec![FieldError::body(ErrorKind::ModelType, Some(value.clone()))])
}

/// Read a required integer field.
///
/// Failures are appended to `errors` so callers can check all fields before
/// giving up.
pub fn require_i64(
    object: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let Some(input) = object.get(name) else {
        errors.push(FieldError::field(name, ErrorKind::Missing, None));
        return None;
    };

    match coerce_i64(input) {
        Ok(value) => Some(value),
        Err(kind) => {
            errors.push(FieldError::field(name, kind, Some(input.clone())));
            None
        }
    }
}

/// Coerce a JSON value to an `i64`.
pub fn coerce_i64(input: &Value) -> Result<i64, ErrorKind> {
    match input {
        Value::Number(n) => number_to_i64(n),
        Value::String(s) => str_to_i64(s),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(ErrorKind::IntType),
    }
}

fn number_to_i64(n: &Number) -> Result<i64, ErrorKind> {
    if let Some(value) = n.as_i64() {
        return Ok(value);
    }
    if n.is_u64() {
        return Err(ErrorKind::LessThanEqual);
    }
    match n.as_f64() {
        Some(f) => float_to_i64(f),
        None => Err(ErrorKind::IntType),
    }
}

fn float_to_i64(f: f64) -> Result<i64, ErrorKind> {
    if f.fract() != 0.0 {
        return Err(ErrorKind::IntFromFloat);
    }
    // Integer literals below i64::MIN reach here rounded to exactly -2^63, so
    // that value is treated as out of range.
    if f >= I64_BOUND {
        Err(ErrorKind::LessThanEqual)
    } else if f <= -I64_BOUND {
        Err(ErrorKind::GreaterThanEqual)
    } else {
        Ok(f as i64)
    }
}

fn str_to_i64(s: &str) -> Result<i64, ErrorKind> {
    let s = s.trim();

    // "7.00" is 7
    let s = match s.split_once('.') {
        Some((int, frac)) if frac.bytes().all(|b| b == b'0') => int,
        _ => s,
    };

    let (negative, digits) = match s.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorKind::IntParsing);
    }

    s.parse().map_err(|_| {
        if negative {
            ErrorKind::GreaterThanEqual
        } else {
            ErrorKind::LessThanEqual
        }
    })
}
