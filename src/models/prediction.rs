//! Prediction response model

use serde::Serialize;

/// Predicted potability label (1 = potable, 0 = not potable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionResponse {
    pub prediction: i64,
}

impl From<i64> for PredictionResponse {
    fn from(prediction: i64) -> Self {
        Self { prediction }
    }
}
