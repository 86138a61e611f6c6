//! Store sales prediction: encodes a handful of item and outlet attributes, runs
//! them through a pre-trained regression artifact and keeps the session's
//! predictions for plotting.

mod artifact;
mod config;
mod error;
mod history;
mod service;
mod transform;

pub use artifact::{load_model, DynModel, ModelArtifact, DEFAULT_ARTIFACT_PATH};
pub use config::{AppConfig, CONFIG_FILE_NAME};
pub use error::{Result, SalesError};
pub use history::{PredictionRecord, SessionHistory};
pub use service::{PredictionInput, PredictionService};
pub use transform::{format_sales, inverse_log};

pub use sales_helpers::{
    Category, FeatureVector, Float, ModelError, OutletLocationType, OutletSize, OutletType,
    RegressionModel, FEATURE_COUNT, FEATURE_NAMES,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the `fmt` subscriber used by the binaries; `RUST_LOG` replaces the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sales_pred=info,sales_visualizer=info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
