//! Loading of the pre-trained model artifact.
//!
//! The artifact is a JSON document tagged by `"kind"`:
//!
//! ```json
//! { "kind": "linear", "intercept": 7.1, "coefficients": [0.0, 0.01, 0.05, -0.02, 0.4] }
//! ```
//!
//! or a `"tree_ensemble"` with `n_features`, `aggregation`, `base_score`,
//! `learning_rate` and `trees`. Whatever the family, the model is expected to have
//! been trained on `log1p(sales)` over the five form columns in
//! [`FEATURE_NAMES`] order.

use crate::error::{Result, SalesError};
use linear_model::LinearRegressor;
use sales_helpers::{RegressionModel, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tree_ensemble::TreeEnsemble;

/// Where the artifact is looked up when no configuration says otherwise.
pub const DEFAULT_ARTIFACT_PATH: &str = "Store-Sales-Pred.json";

/// The boxed model handed to the prediction service.
pub type DynModel = Box<dyn RegressionModel<f64> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor<f64>),
    TreeEnsemble(TreeEnsemble<f64>),
}

impl ModelArtifact {
    /// Parses an artifact from its JSON text. `path` is only used in error messages.
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| SalesError::ArtifactFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Boxes the model after checking it takes exactly the form's feature vector.
    ///
    /// Structural validation already happened while parsing.
    pub fn into_model(self) -> Result<DynModel> {
        let model: DynModel = match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::TreeEnsemble(m) => Box::new(m),
        };
        if model.n_features() != FEATURE_COUNT {
            return Err(SalesError::FeatureWidth {
                expected: FEATURE_COUNT,
                found: model.n_features(),
            });
        }
        Ok(model)
    }
}

/// Reads, parses and validates the artifact at `path`.
///
/// Called once at startup; any error here is fatal for the application.
pub fn load_model(path: impl AsRef<Path>) -> Result<DynModel> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| SalesError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })?;
    let model = ModelArtifact::from_json(&json, path)?.into_model()?;
    info!(path = %path.display(), model = %model.name(), "loaded model artifact");
    debug!(columns = ?FEATURE_NAMES, "model feature order");
    Ok(model)
}
