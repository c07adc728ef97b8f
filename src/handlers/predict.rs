//! Prediction handler

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};

use crate::inference::InferenceError;
use crate::models::{PredictionResponse, WaterSample};
use crate::{AppResult, AppState};

/// Validate a water sample and classify it
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<PredictionResponse>> {
    // a header that is not valid text never names a JSON type
    let content_type = headers
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().unwrap_or_default());

    let sample = WaterSample::from_request(content_type, &body)?;
    let features = sample.features();

    // CPU-bound; keep it off the reactor
    let predictor = state.predictor.clone();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&features))
        .await
        .map_err(|e| InferenceError::Worker(e.to_string()))??;

    tracing::debug!(?sample, prediction, "Prediction complete");

    Ok(Json(PredictionResponse::from(prediction)))
}
