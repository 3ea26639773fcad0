use crate::state::{AppState, APP_TITLE};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use newsclass_core::{Category, Prediction};
use newsclass_features::ClassifyOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

// ============================================================================
// Request and response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Lowercase category id
    pub label: Category,

    /// Category as shown to users
    pub category: String,

    pub score: f32,
    pub scores: Vec<CategoryScore>,
    pub token_count: usize,
    pub matched_count: usize,
    pub latency_us: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryScore {
    pub label: Category,
    pub score: f32,
}

impl From<Prediction> for ClassifyResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.label,
            category: prediction.label.display_name().to_string(),
            score: prediction.score,
            scores: prediction
                .scores
                .into_iter()
                .map(|(label, score)| CategoryScore { label, score })
                .collect(),
            token_count: prediction.token_count,
            matched_count: prediction.matched_count,
            latency_us: prediction.latency_us,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub title: String,
    pub categories: Vec<String>,
    pub classifier: String,
    pub dimension: usize,
    pub vocabulary: usize,
    pub logo: LogoInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoInfo {
    pub available: bool,
    pub warning: Option<String>,
}

// ============================================================================
// Health and info endpoints
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let classifier = &state.classifier;

    Json(InfoResponse {
        title: APP_TITLE.to_string(),
        categories: classifier
            .labels()
            .iter()
            .map(|c| c.display_name().to_string())
            .collect(),
        classifier: classifier.classifier_name().to_string(),
        dimension: classifier.dim(),
        vocabulary: classifier.pipeline().table().len(),
        logo: LogoInfo {
            available: state.logo.is_available(),
            warning: state.logo.warning(),
        },
    })
}

// ============================================================================
// Classification endpoints
// ============================================================================

pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Response {
    match state.classifier.classify(&req.text).await {
        Ok(ClassifyOutcome::EmptyInput) => {
            metrics::counter!("newsclass_requests_total", "outcome" => "empty").increment(1);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "warning": newsclass_features::EMPTY_INPUT_WARNING })),
            )
                .into_response()
        }
        Ok(ClassifyOutcome::Predicted { prediction, .. }) => {
            metrics::counter!("newsclass_requests_total", "outcome" => "predicted").increment(1);
            metrics::counter!("newsclass_predictions_total", "label" => prediction.label.as_str())
                .increment(1);
            metrics::histogram!("newsclass_classify_latency_us")
                .record(prediction.latency_us as f64);

            debug!(label = %prediction.label, "Classify request served");
            Json(ClassifyResponse::from(prediction)).into_response()
        }
        Err(e) => {
            metrics::counter!("newsclass_requests_total", "outcome" => "error").increment(1);
            error!("Classification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn tokens(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Response {
    match state.classifier.tokenize(&req.text) {
        Ok(tokens) => {
            let matched = tokens
                .iter()
                .filter(|t| state.classifier.pipeline().table().contains(t))
                .count();
            Json(serde_json::json!({
                "tokens": tokens,
                "count": tokens.len(),
                "matched": matched,
            }))
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

// ============================================================================
// Assets and metrics
// ============================================================================

pub async fn logo(State(state): State<AppState>) -> impl IntoResponse {
    let (bytes, content_type) = state.logo.content();
    ([(header::CONTENT_TYPE, content_type)], bytes.into_owned())
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics exporter not installed").into_response(),
    }
}
