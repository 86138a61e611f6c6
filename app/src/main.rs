mod app;
mod charts;
mod ui;

use anyhow::{Context, Result};
use app::SalesApp;
use sales_pred::{init_tracing, load_model, AppConfig, PredictionService, CONFIG_FILE_NAME};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load_or_default(CONFIG_FILE_NAME)?;
    // The form is useless without a model, so a bad artifact stops the process here.
    let model = load_model(&config.artifact_path).with_context(|| {
        format!("cannot start without a model at {}", config.artifact_path.display())
    })?;
    let service = PredictionService::new(model);
    info!(title = %config.window_title, "starting sales visualizer");

    let native_options = eframe::NativeOptions::default();
    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(SalesApp::new(service, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
