use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::Error;

/// Failure of one endpoint, rendered with the remediation hints that endpoint promises.
#[derive(Debug)]
pub enum ApiError {
    InvalidBody(JsonRejection),
    Analyze { error: Error, model: String },
    Health(Error),
    Models(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid request body",
                    "details": rejection.body_text(),
                })),
            )
                .into_response(),
            ApiError::Analyze {
                error: Error::EmptyTranscript,
                ..
            } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Empty transcript" })),
            )
                .into_response(),
            ApiError::Analyze { error, .. } if error.is_connection() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Cannot connect to Ollama",
                    "suggestion": "Make sure Ollama is running: ollama serve",
                    "details": error.to_string(),
                })),
            )
                .into_response(),
            ApiError::Analyze { error, model } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Error: {error}"),
                    "suggestion": format!("Make sure model is available: ollama pull {model}"),
                })),
            )
                .into_response(),
            ApiError::Health(error) if error.is_connection() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "ollama_running": false,
                    "error": "Cannot connect to Ollama. Make sure Ollama is running (ollama serve)",
                    "details": error.to_string(),
                })),
            )
                .into_response(),
            ApiError::Health(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "ollama_running": false,
                    "error": format!("Ollama error: {error}"),
                    "suggestion": "Run: ollama list (to check if Ollama is working)",
                })),
            )
                .into_response(),
            ApiError::Models(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": error.to_string(),
                    "models": [],
                })),
            )
                .into_response(),
        }
    }
}
