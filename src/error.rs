// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the HTTP handlers.
///
/// Both kinds render as a 500 with `{"error": .., "kind": ..}`; the kind lets
/// callers tell bad input apart from a failing collaborator.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body was malformed or missing a required field.
    #[error("{0}")]
    Validation(String),

    /// The language model, a tool, or another downstream collaborator failed.
    #[error("{0}")]
    Collaborator(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Collaborator(_) => "collaborator",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Collaborator(format!("Network error: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), "there was an error: {}", self);
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
