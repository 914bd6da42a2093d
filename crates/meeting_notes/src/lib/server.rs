//! # HTTP API
//!
//! Routes:
//! * `GET /` static service description
//! * `GET /api/health` runtime reachability and served models
//! * `GET /api/models` names of the served models
//! * `POST /api/analyze` transcript analysis

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{llm::model::LanguageModel, MeetingAnalyzer};

mod error;
pub mod handlers;

pub use error::ApiError;

pub struct AppState<M>
where
    M: LanguageModel + Send + Sync + 'static,
{
    pub analyzer: Arc<MeetingAnalyzer<M>>,
}

// manual impl: deriving would demand `M: Clone`
impl<M> Clone for AppState<M>
where
    M: LanguageModel + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
        }
    }
}

pub fn define_routes<M>(analyzer: MeetingAnalyzer<M>) -> Router
where
    M: LanguageModel + Send + Sync + 'static,
{
    let app_state = AppState {
        analyzer: Arc::new(analyzer),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health::<M>))
        .route("/api/models", get(handlers::models::<M>))
        .route("/api/analyze", post(handlers::analyze::<M>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
