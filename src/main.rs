//! Water Potability Prediction Server
//!
//! Loads a fitted scaler and a trained classifier once at startup and
//! classifies nine water-quality measurements per request.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  WATER POTABILITY API                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  GET  /          → templates/index.html                  │
//! │  GET  /static/*  → templates/                            │
//! │  POST /predict   → WaterSample ─┐                        │
//! │                                 ▼                        │
//! │                  ┌─────────────────────────────┐         │
//! │                  │ Predictor                   │         │
//! │                  │  Scaler (JSON) → Classifier │         │
//! │                  │                  (ONNX)     │         │
//! │                  └─────────────────────────────┘         │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod inference;
mod models;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "water_potability=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Water Potability Server starting...");

    // Load artifacts
    let predictor = inference::Predictor::load(&config.model_path, &config.scaler_path)
        .with_context(|| format!(
            "failed to load artifacts (model: {}, scaler: {})",
            config.model_path.display(),
            config.scaler_path.display()
        ))?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<inference::Predictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.templates_dir)
        .append_index_html_on_directories(false);

    Router::new()
        .route("/", get(handlers::index::page))
        .route("/predict", post(handlers::predict::predict))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
