// Axum API Server Module
//
// Purpose: serve the recommendation UI (askama + htmx) and a small JSON API
// over one shared, read-only ModelContext.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::catalog::{CROPS, UNKNOWN_CROP};
use crate::config::ModelPaths;
use crate::features::{FeatureVector, FEATURES, PRESETS};
use crate::model::ModelError;
use crate::recommend::{ModelContext, RecommendError};
use crate::report::ReportFormatter;
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ModelContext>,
}

impl AppState {
    /// Load artifacts; any failure on a required artifact is returned
    pub fn load(paths: &ModelPaths) -> anyhow::Result<Self> {
        tracing::info!("Loading model artifacts...");
        let context = ModelContext::load(paths)?;
        Ok(Self::from_context(context))
    }

    pub fn from_context(context: ModelContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // HTML pages (htmx fragments when requested by htmx)
        .route("/", get(pages::home_page))
        .route("/recommend", post(pages::recommend_form))
        .route("/clear", get(pages::clear_inputs))
        .route("/presets/:index", get(pages::load_preset))

        // JSON API
        .route("/api/recommend", post(recommend_json))
        .route("/api/crops", get(list_crops))
        .route("/api/presets", get(list_presets))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let classifier = state.context.classifier();
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model": classifier.name(),
        "trees": classifier.n_trees(),
        "nodes": classifier.total_nodes(),
        "leaves": classifier.total_leaves(),
        "avg_depth": classifier.avg_depth(),
        "normalization": state.context.stage().describe(),
    }))
}

async fn recommend_json(
    State(state): State<AppState>,
    Json(inputs): Json<FeatureVector>,
) -> Result<Json<serde_json::Value>, AppError> {
    let recommendation = state.context.recommend(&inputs)?;

    Ok(Json(serde_json::json!({
        "label": recommendation.label,
        "crop": recommendation.crop,
        "display_name": recommendation.crop_name(),
        "confidence": recommendation.confidence,
        "inputs": recommendation.inputs,
        "report": ReportFormatter::format(&recommendation),
    })))
}

async fn list_crops() -> impl IntoResponse {
    Json(serde_json::json!({
        "crops": CROPS,
        "unknown": UNKNOWN_CROP,
        "count": CROPS.len(),
    }))
}

async fn list_presets() -> impl IntoResponse {
    Json(serde_json::json!({
        "features": &FEATURES[..],
        "presets": &PRESETS[..],
        "defaults": FeatureVector::default(),
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

/// Bad input is the caller's fault; a scaler/classifier width mismatch is ours
impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Features(_) | RecommendError::Model(ModelError::NonFinite) => {
                AppError::BadRequest(err.to_string())
            }
            RecommendError::Model(_) => {
                tracing::error!("Model misconfiguration: {}", err);
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
