use sales_helpers::{ModelError, UnknownCategory};
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading the model or predicting a sale.
#[derive(Debug, Error)]
pub enum SalesError {
    /// A categorical label outside its closed label set reached the encoder.
    #[error("unknown {field} label {label:?}")]
    UnknownCategory { field: &'static str, label: String },

    /// A numeric input is negative or not a finite number.
    #[error("{field} must be a finite number >= 0, got {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model output has no finite sales figure, e.g. `exp_m1` overflowed.
    #[error("model output {raw} does not give a finite sales figure")]
    NonFiniteSales { raw: f64 },

    #[error("failed to read model artifact {path}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}")]
    ArtifactFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact was trained on a different number of columns.
    #[error("model artifact expects {found} features, the form produces {expected}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("failed to load config {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<UnknownCategory> for SalesError {
    fn from(e: UnknownCategory) -> Self {
        SalesError::UnknownCategory {
            field: e.field,
            label: e.label,
        }
    }
}

pub type Result<T, E = SalesError> = std::result::Result<T, E>;
