//! Integer addition endpoint.
//!
//! Each operand may be anything that coerces to an integer in the signed 64-bit
//! range (see `extract::coerce_i64`). The sum is computed in 128 bits so it is
//! exact for every pair of accepted operands.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::FieldError;
use crate::extract::{require_i64, require_object, FromJson, ValidJson};

/// Body of `POST /add`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddRequest {
    pub a: i64,
    pub b: i64,
}

impl FromJson for AddRequest {
    fn from_json(value: &Value) -> Result<Self, Vec<FieldError>> {
        let object = require_object(value)?;

        let mut errors = Vec::new();
        let a = require_i64(object, "a", &mut errors);
        let b = require_i64(object, "b", &mut errors);

        match (a, b) {
            (Some(a), Some(b)) => Ok(Self { a, b }),
            _ => Err(errors),
        }
    }
}

/// Result of `POST /add`, echoing the operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResponse {
    pub a: i64,
    pub b: i64,
    pub result: i128,
}

impl AddRequest {
    pub fn sum(self) -> AddResponse {
        AddResponse {
            a: self.a,
            b: self.b,
            result: i128::from(self.a) + i128::from(self.b),
        }
    }
}

/// `POST /add`
#[instrument(level = "debug", name = "add", skip_all)]
pub async fn add(ValidJson(request): ValidJson<AddRequest>) -> Json<AddResponse> {
    let response = request.sum();
    tracing::debug!(
        a = response.a,
        b = response.b,
        result = %response.result,
        "Computed sum"
    );
    Json(response)
}
