//! Fitted scaler artifact
//!
//! Parameters exported from the training toolchain as JSON, e.g.
//!
//! ```json
//! {"kind": "standard", "mean": [...], "scale": [...], "feature_names": [...]}
//! {"kind": "min_max", "scale": [...], "min": [...]}
//! ```

use std::path::Path;

use serde::Deserialize;

use super::{InferenceError, Scaler};
use crate::models::{FEATURE_COUNT, FEATURE_NAMES};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// `(x - mean) / scale`
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },

    /// `x * scale + min`, unclipped
    MinMax {
        scale: Vec<f64>,
        min: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

impl ScalerArtifact {
    /// Read and validate a scaler file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = std::fs::read(path).map_err(|source| InferenceError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;

        let scaler: Self =
            serde_json::from_slice(&raw).map_err(|e| InferenceError::ArtifactFormat {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        scaler.validate(path)?;

        Ok(scaler)
    }

    fn validate(&self, path: &Path) -> Result<(), InferenceError> {
        let (a, b, names) = match self {
            Self::Standard { mean, scale, feature_names } => (mean, scale, feature_names),
            Self::MinMax { scale, min, feature_names } => (scale, min, feature_names),
        };

        if a.len() != b.len() {
            return Err(InferenceError::ArtifactFormat {
                path: path.to_path_buf(),
                message: format!("parameter lengths differ ({} vs {})", a.len(), b.len()),
            });
        }

        if a.len() != FEATURE_COUNT {
            return Err(InferenceError::ArtifactFormat {
                path: path.to_path_buf(),
                message: format!(
                    "scaler was fitted on {} features, samples have {}",
                    a.len(),
                    FEATURE_COUNT
                ),
            });
        }

        if let Some(found) = names {
            if found.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(InferenceError::FeatureNames {
                    expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                    found: found.clone(),
                });
            }
        }

        Ok(())
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { scale, .. } => scale.len(),
        }
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(InferenceError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let scaled = match self {
            Self::Standard { mean, scale, .. } => features
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| {
                    // constant features are stored with zero variance
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            Self::MinMax { scale, min, .. } => features
                .iter()
                .zip(scale.iter().zip(min))
                .map(|(x, (s, m))| x * s + m)
                .collect(),
        };

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_artifact(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_standard_transform() {
        let scaler = ScalerArtifact::Standard {
            mean: vec![7.0, 200.0],
            scale: vec![2.0, 0.0],
            feature_names: None,
        };

        let scaled = scaler.transform(&[9.0, 150.0]).unwrap();
        assert_eq!(scaled, vec![1.0, -50.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = ScalerArtifact::MinMax {
            scale: vec![0.5, 0.25],
            min: vec![-1.0, 0.0],
            feature_names: None,
        };

        // no clipping outside the fitted range
        let scaled = scaler.transform(&[6.0, 20.0]).unwrap();
        assert_eq!(scaled, vec![2.0, 5.0]);
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let scaler = ScalerArtifact::Standard {
            mean: vec![0.0; 9],
            scale: vec![1.0; 9],
            feature_names: None,
        };

        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ShapeMismatch { expected: 9, actual: 2 }
        ));
    }

    #[test]
    fn test_load_standard_with_feature_names() {
        let names = serde_json::to_string(&FEATURE_NAMES).unwrap();
        let file = write_artifact(&format!(
            r#"{{"kind":"standard","mean":[0,0,0,0,0,0,0,0,0],"scale":[1,1,1,1,1,1,1,1,1],"feature_names":{names}}}"#
        ));

        let scaler = ScalerArtifact::load(file.path()).unwrap();
        assert_eq!(scaler.n_features(), 9);
    }

    #[test]
    fn test_load_rejects_reordered_feature_names() {
        let mut names = FEATURE_NAMES.to_vec();
        names.swap(0, 1);
        let names = serde_json::to_string(&names).unwrap();
        let file = write_artifact(&format!(
            r#"{{"kind":"min_max","scale":[1,1,1,1,1,1,1,1,1],"min":[0,0,0,0,0,0,0,0,0],"feature_names":{names}}}"#
        ));

        let err = ScalerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, InferenceError::FeatureNames { .. }));
    }

    #[test]
    fn test_load_rejects_mismatched_lengths() {
        let file = write_artifact(r#"{"kind":"standard","mean":[0,0,0],"scale":[1,1]}"#);

        let err = ScalerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactFormat { .. }));
    }

    #[test]
    fn test_load_rejects_wrong_feature_count() {
        let file = write_artifact(r#"{"kind":"standard","mean":[0,0,0,0],"scale":[1,1,1,1]}"#);

        let err = ScalerArtifact::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("fitted on 4 features"));
    }

    #[test]
    fn test_load_rejects_unknown_kind() {
        let file = write_artifact(r#"{"kind":"robust","center":[0],"scale":[1]}"#);

        let err = ScalerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactFormat { .. }));
    }
}
