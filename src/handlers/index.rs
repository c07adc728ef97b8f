//! Landing page handler

use axum::{extract::State, response::Html};

use crate::{AppError, AppResult, AppState};

/// Serve `index.html` verbatim, read from disk on every request
pub async fn page(State(state): State<AppState>) -> AppResult<Html<Vec<u8>>> {
    let path = state.config.index_path();

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Asset(format!("File at path {} does not exist: {}", path.display(), e)))?;

    Ok(Html(bytes))
}
