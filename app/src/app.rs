use crate::ui;

use ecolor::Hsva;
use eframe::egui::{self, Color32};
use eframe::{App, Frame};
use sales_pred::{
    AppConfig, Category, DynModel, OutletLocationType, OutletSize, OutletType, PredictionInput,
    PredictionService, SessionHistory,
};
use tracing::{info, warn};

/// Current values of the five form inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormState {
    pub item_weight: f64,
    pub item_mrp: f64,
    pub outlet_size: OutletSize,
    pub outlet_location_type: OutletLocationType,
    pub outlet_type: OutletType,
}

impl FormState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            item_weight: config.default_item_weight,
            item_mrp: config.default_item_mrp,
            outlet_size: OutletSize::Small,
            outlet_location_type: OutletLocationType::Urban,
            outlet_type: OutletType::ConvenienceStore,
        }
    }

    pub fn input(&self) -> PredictionInput {
        PredictionInput::new(
            self.item_weight,
            self.item_mrp,
            self.outlet_size,
            self.outlet_location_type,
            self.outlet_type,
        )
    }
}

/// The main application struct.
/// It holds the session state and delegates drawing to the `ui` module.
pub struct SalesApp {
    // --- Core State ---
    /// Encoder plus the model loaded at startup.
    pub service: PredictionService<DynModel>,
    /// Every successful prediction of this session, in order.
    pub history: SessionHistory,

    // --- UI State ---
    pub form: FormState,
    /// Sales figure of the last Predict press, or the reason it failed.
    pub last_result: Option<Result<f64, String>>,
}

impl SalesApp {
    pub fn new(service: PredictionService<DynModel>, config: &AppConfig) -> Self {
        Self {
            service,
            history: SessionHistory::new(),
            form: FormState::from_config(config),
            last_result: None,
        }
    }

    /// Runs the form through the model and appends the result to the history.
    pub fn predict(&mut self) {
        let input = self.form.input();
        let result = self
            .service
            .record_prediction(&mut self.history, input)
            .map(|record| record.sales);
        self.last_result = Some(match result {
            Ok(sales) => {
                info!(sales, records = self.history.len(), "prediction recorded");
                Ok(sales)
            }
            Err(e) => {
                warn!(error = %e, "prediction failed");
                Err(e.to_string())
            }
        });
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.last_result = None;
    }

    /// A stable color per outlet size, shared by both charts and the legend.
    pub fn outlet_size_color(size: OutletSize) -> Color32 {
        let golden_ratio_conjugate = 0.61803398875;
        let hue = (0.1 + size.code() as f32 * golden_ratio_conjugate).fract();
        let hsva = Hsva { h: hue, s: 0.85, v: 0.8, a: 1.0 };
        Color32::from(hsva)
    }
}

impl App for SalesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ui::draw_side_panel(self, ctx);
        ui::draw_central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sales_pred::ModelArtifact;
    use std::path::Path;

    /// Constant model: always predicts log1p(100).
    fn test_app() -> SalesApp {
        let json = format!(
            r#"{{"kind": "linear", "intercept": {}, "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0]}}"#,
            101f64.ln()
        );
        let model = ModelArtifact::from_json(&json, Path::new("test.json"))
            .unwrap()
            .into_model()
            .unwrap();
        SalesApp::new(PredictionService::new(model), &AppConfig::default())
    }

    #[test]
    fn test_form_defaults() {
        let app = test_app();
        assert_eq!(app.form.item_weight, 0.5);
        assert_eq!(app.form.item_mrp, 249.8092);
        assert_eq!(app.form.outlet_size, OutletSize::Small);
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_predict_appends_and_shows_sales() {
        let mut app = test_app();
        app.predict();
        app.form.outlet_size = OutletSize::High;
        app.predict();

        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history.records()[1].input.outlet_size, OutletSize::High);
        match app.last_result {
            Some(Ok(sales)) => assert_abs_diff_eq!(sales, 100.0, epsilon = 1e-9),
            ref other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_failed_prediction_is_reported() {
        let mut app = test_app();
        app.form.item_mrp = -1.0;
        app.predict();
        assert!(app.history.is_empty());
        assert!(matches!(app.last_result, Some(Err(ref msg)) if msg.contains("Item_MRP")));

        app.form.item_mrp = 10.0;
        app.predict();
        app.clear_history();
        assert!(app.history.is_empty());
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_outlet_size_colors_are_distinct() {
        let colors: Vec<Color32> = OutletSize::ALL
            .iter()
            .map(|&s| SalesApp::outlet_size_color(s))
            .collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
