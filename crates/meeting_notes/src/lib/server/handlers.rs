use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    llm::model::LanguageModel,
    server::{ApiError, AppState},
    types::AnalysisOutcome,
};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ollama_running: bool,
    pub available_models: Vec<String>,
    pub current_model: String,
    pub models_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Meeting Notes Summarizer API",
        "endpoints": {
            "/api/health": "Check Ollama connection status",
            "/api/analyze": "POST meeting transcript for analysis",
            "/api/models": "List available models"
        },
        "instructions": "POST a JSON body {\"transcript\": \"...\"} to /api/analyze"
    }))
}

pub async fn health<M>(
    State(app_state): State<AppState<M>>,
) -> Result<Json<HealthResponse>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
{
    let analyzer = &app_state.analyzer;
    let available_models = analyzer
        .available_models()
        .await
        .map_err(ApiError::Health)?;

    Ok(Json(HealthResponse {
        status: "healthy",
        ollama_running: true,
        models_count: available_models.len(),
        available_models,
        current_model: analyzer.model_id().to_string(),
    }))
}

pub async fn models<M>(
    State(app_state): State<AppState<M>>,
) -> Result<Json<ModelsResponse>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
{
    let models = app_state
        .analyzer
        .available_models()
        .await
        .map_err(ApiError::Models)?;

    Ok(Json(ModelsResponse { models }))
}

pub async fn analyze<M>(
    State(app_state): State<AppState<M>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
{
    let Json(request) = payload.map_err(ApiError::InvalidBody)?;
    let analyzer = &app_state.analyzer;

    let outcome = analyzer
        .analyze(&request.transcript)
        .await
        .map_err(|error| ApiError::Analyze {
            error,
            model: analyzer.model_id().to_string(),
        })?;

    Ok(Json(AnalyzeResponse {
        success: true,
        outcome,
    }))
}
