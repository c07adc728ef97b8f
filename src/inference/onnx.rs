//! ONNX classifier
//!
//! Loads a classifier exported to ONNX and runs it through ONNX Runtime.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{Classifier, InferenceError};

/// ONNX Runtime session for a single-row classifier.
pub struct OnnxClassifier {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    label_output: String,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::ArtifactIo {
                path: model_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "model not found"),
            });
        }

        let session = Session::builder()
            .map_err(|e| artifact_error(model_path, "session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| artifact_error(model_path, "optimization", e))?
            .commit_from_file(model_path)
            .map_err(|e| artifact_error(model_path, "load", e))?;

        let label_output = Self::pick_label_output(session.outputs.iter().map(|o| o.name.as_str()))
            .ok_or_else(|| InferenceError::ArtifactFormat {
                path: model_path.to_path_buf(),
                message: "model defines no outputs".to_string(),
            })?;

        tracing::debug!("Using ONNX output '{}' as label", label_output);

        Ok(Self {
            session: Mutex::new(session),
            label_output,
        })
    }

    /// Exported classifiers emit `label` plus `probabilities`; prefer the label.
    fn pick_label_output<'a>(mut names: impl Iterator<Item = &'a str> + Clone) -> Option<String> {
        names
            .clone()
            .find(|name| name.contains("label"))
            .or_else(|| names.next())
            .map(str::to_string)
    }
}

fn artifact_error(path: &Path, stage: &str, e: impl std::fmt::Display) -> InferenceError {
    InferenceError::ArtifactFormat {
        path: path.to_path_buf(),
        message: format!("{}: {}", stage, e),
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &[f64]) -> Result<i64, InferenceError> {
        let data: Vec<f32> = row.iter().map(|&x| x as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), data)
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.label_output)
            .ok_or(InferenceError::EmptyOutput)?;

        // Labels are int64 for most exporters; regressors-as-classifiers yield floats.
        match output.try_extract_tensor::<i64>() {
            Ok((_, labels)) => labels.first().copied().ok_or(InferenceError::EmptyOutput),
            Err(_) => {
                let (_, scores) = output
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;
                let score = scores.first().copied().ok_or(InferenceError::EmptyOutput)?;
                label_from_score(score)
            }
        }
    }
}

/// Truncate a float label toward zero; non-finite or out-of-range scores are errors.
fn label_from_score(score: f32) -> Result<i64, InferenceError> {
    if score.is_nan() {
        return Err(InferenceError::Runtime(
            "cannot convert float NaN to integer".to_string(),
        ));
    }
    if score.is_infinite() {
        return Err(InferenceError::Runtime(
            "cannot convert float infinity to integer".to_string(),
        ));
    }

    let truncated = score.trunc();
    // i64::MIN is exactly representable in f32, i64::MAX is not
    if truncated < i64::MIN as f32 || truncated >= -(i64::MIN as f32) {
        return Err(InferenceError::Runtime(format!(
            "label {} does not fit in a 64-bit integer",
            score
        )));
    }

    Ok(truncated as i64)
}
