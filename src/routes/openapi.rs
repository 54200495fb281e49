//! OpenAPI 3.1 description of the service.

use axum::Json;
use serde_json::{json, Value};

/// JSON content entry referencing a named component schema
fn json_content(schema: &str) -> Value {
    json!({
        "application/json": {
            "schema": { "$ref": format!("#/components/schemas/{schema}") }
        }
    })
}

fn int64() -> Value {
    json!({ "type": "integer", "format": "int64" })
}

fn ping_path() -> Value {
    json!({
        "get": {
            "operationId": "ping",
            "summary": "Liveness probe",
            "responses": {
                "200": { "description": "Service is running", "content": json_content("PingResponse") }
            }
        }
    })
}

fn add_path() -> Value {
    json!({
        "post": {
            "operationId": "add",
            "summary": "Add two integers",
            "requestBody": { "required": true, "content": json_content("AddRequest") },
            "responses": {
                "200": { "description": "Sum of the operands", "content": json_content("AddResponse") },
                "422": { "description": "Validation error", "content": json_content("ValidationError") }
            }
        }
    })
}

fn validation_error_schema() -> Value {
    let entry = json!({
        "type": "object",
        "required": ["type", "loc", "msg"],
        "properties": {
            "type": { "type": "string" },
            "loc": { "type": "array", "items": { "type": "string" } },
            "msg": { "type": "string" },
            "input": {}
        }
    });

    json!({
        "type": "object",
        "required": ["detail"],
        "properties": { "detail": { "type": "array", "items": entry } }
    })
}

fn schemas() -> Value {
    json!({
        "PingResponse": {
            "type": "object",
            "required": ["status"],
            "properties": { "status": { "type": "string", "const": "ok" } }
        },
        "AddRequest": {
            "type": "object",
            "required": ["a", "b"],
            "properties": { "a": int64(), "b": int64() }
        },
        "AddResponse": {
            "type": "object",
            "required": ["a", "b", "result"],
            "properties": { "a": int64(), "b": int64(), "result": { "type": "integer" } }
        },
        "ValidationError": validation_error_schema(),
    })
}

/// Builds the document served at `GET /openapi.json`.
pub fn document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/ping": ping_path(),
            "/add": add_path(),
        },
        "components": { "schemas": schemas() }
    })
}

/// `GET /openapi.json`
pub async fn openapi() -> Json<Value> {
    Json(document())
}
