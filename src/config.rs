use crate::artifact::DEFAULT_ARTIFACT_PATH;
use crate::error::{Result, SalesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Optional overlay file looked up in the working directory by the front end.
pub const CONFIG_FILE_NAME: &str = "sales-pred.config.json";

/// Application settings. Every field has a default, so an overlay file only
/// needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub artifact_path: PathBuf,
    pub window_title: String,
    pub default_item_weight: f64,
    pub default_item_mrp: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            window_title: "Big Mart Sales Prediction".to_string(),
            default_item_weight: 0.50,
            default_item_mrp: 249.8092,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |source: Box<dyn std::error::Error + Send + Sync>| SalesError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path).map_err(|e| config_err(e.into()))?;
        serde_json::from_str(&text).map_err(|e| config_err(e.into()))
    }

    /// Reads `path` if it exists and falls back to the defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
