use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::bias::{self, BiasSignal};
use crate::classify::{Outcome, Scorer};
use crate::preprocess;
use crate::quality::{self, QualityReport};

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<Scorer>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/verify", post(verify))
        .route("/batch", post(verify_batch))
        .route("/debug/quality", post(debug_quality))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct VerifyReq {
    /// Optional headline; joined with the body before scoring.
    #[serde(default)]
    title: Option<String>,
    text: String,
    #[serde(default)]
    source_url: Option<String>,
}

#[derive(serde::Serialize)]
struct VerifyResp {
    #[serde(flatten)]
    outcome: Outcome,
    analyzed_at: String,
}

async fn verify(State(state): State<AppState>, Json(body): Json<VerifyReq>) -> Json<VerifyResp> {
    metrics::counter!("verify_requests_total").increment(1);
    Json(run_verify(&state, body).await)
}

async fn verify_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<VerifyReq>>,
) -> Json<Vec<VerifyResp>> {
    metrics::counter!("verify_requests_total").increment(items.len() as u64);
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(run_verify(&state, item).await);
    }
    Json(out)
}

async fn run_verify(state: &AppState, req: VerifyReq) -> VerifyResp {
    // Compose "Title. Body" the way the verification UI submits articles,
    // after stripping markup/entities from pasted content.
    let cleaned = preprocess::clean_article_text(&req.text);
    let combined = match req.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => format!("{title}. {cleaned}"),
        _ => cleaned,
    };

    let outcome = state
        .scorer
        .score(&combined, req.source_url.as_deref())
        .await;

    VerifyResp {
        outcome,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[derive(serde::Deserialize)]
struct QualityReq {
    text: String,
}

#[derive(serde::Serialize)]
struct QualityResp {
    quality: QualityReport,
    bias: BiasSignal,
}

/// Dev aid: run only the deterministic analyzers, no classifier calls.
async fn debug_quality(Json(body): Json<QualityReq>) -> Json<QualityResp> {
    Json(QualityResp {
        quality: quality::assess(&body.text),
        bias: bias::detect_bias_signals(&body.text),
    })
}
