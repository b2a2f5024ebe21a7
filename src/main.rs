//! News Credibility Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_credibility_analyzer::{api, classify, config, metrics};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CREDIBILITY_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("CREDIBILITY_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("credibility=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // CLASSIFIERS_CONFIG_PATH and the API-key env var from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Classifier handles (built once, shared) ---
    let cfg = config::ClassifiersConfig::load();
    let scorer = classify::build_scorer(&cfg);

    // Prometheus recorder + /metrics route.
    let prometheus = metrics::Metrics::init();

    let state = api::AppState {
        scorer: Arc::new(scorer),
    };
    let router = api::router(state).merge(prometheus.router());

    Ok(router.into())
}
