use axum::{Json, extract::Path};
use serde_json::{Value, json};

/// Liveness check.
pub async fn index() -> Json<Value> {
    Json(json!({ "Welcome": "to the future!" }))
}

pub async fn hello_name(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "message": format!("Welcome to the course, {}!", name.to_uppercase()) }))
}
