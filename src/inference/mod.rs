//! Inference Adapter
//!
//! Fixed scaler + fixed classifier, loaded once at startup.
//! Both sit behind narrow capability traits so the artifact format
//! can change without touching the HTTP layer.

pub mod onnx;
pub mod scaler;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::FEATURE_COUNT;

pub use onnx::OnnxClassifier;
pub use scaler::ScalerArtifact;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to read artifact {path}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact {path}: {message}")]
    ArtifactFormat { path: PathBuf, message: String },

    #[error("scaler was fitted on features {found:?}, expected {expected:?}")]
    FeatureNames {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("X has {actual} features, but the scaler is expecting {expected} features as input")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    Runtime(String),

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("inference worker failed: {0}")]
    Worker(String),
}

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Feature transformation fitted ahead of time.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Decision function mapping one scaled row to a class label.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f64]) -> Result<i64, InferenceError>;
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Scaler and classifier composed into a single pure inference call.
#[derive(Clone)]
pub struct Predictor {
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Load both artifacts from disk
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, InferenceError> {
        let scaler = ScalerArtifact::load(scaler_path)?;
        tracing::info!("Scaler loaded from {}", scaler_path.display());

        let classifier = OnnxClassifier::load(model_path)?;
        tracing::info!("Classifier loaded from {}", model_path.display());

        Ok(Self::new(Arc::new(scaler), Arc::new(classifier)))
    }

    /// Scale one feature vector, then classify it
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
        let scaled = self.scaler.transform(features)?;
        self.classifier.predict(&scaled)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Label 1 when the first scaled feature is positive, else 0.
    /// Counts every call so tests can assert inference was (not) reached.
    #[derive(Default)]
    pub struct SignClassifier {
        pub calls: AtomicUsize,
    }

    impl SignClassifier {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for SignClassifier {
        fn predict(&self, row: &[f64]) -> Result<i64, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let first = row.first().ok_or(InferenceError::EmptyOutput)?;
            Ok(i64::from(*first > 0.0))
        }
    }

    /// Always fails, the way a corrupt artifact would.
    pub struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn predict(&self, _row: &[f64]) -> Result<i64, InferenceError> {
            Err(InferenceError::Runtime("model graph is corrupt".to_string()))
        }
    }

    /// Standard scaler with realistic per-feature statistics.
    pub fn fitted_scaler() -> ScalerArtifact {
        ScalerArtifact::Standard {
            mean: vec![
                7.08, 196.37, 22014.09, 7.12, 333.78, 426.21, 14.28, 66.40, 3.97,
            ],
            scale: vec![
                1.47, 32.87, 8767.23, 1.58, 36.14, 80.81, 3.31, 15.77, 0.78,
            ],
            feature_names: None,
        }
    }
}
