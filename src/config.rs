//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Serialized classifier (ONNX)
    pub model_path: PathBuf,

    /// Fitted scaler parameters (JSON)
    pub scaler_path: PathBuf,

    /// Directory holding index.html and the static assets
    pub templates_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8884,
            model_path: PathBuf::from("Water_Quality_Model.onnx"),
            scaler_path: PathBuf::from("scaler.json"),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),

            templates_dir: env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
        }
    }

    /// `host:port` string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path of the landing page
    pub fn index_path(&self) -> PathBuf {
        self.templates_dir.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8884");
        assert_eq!(config.index_path(), PathBuf::from("templates/index.html"));
    }
}
