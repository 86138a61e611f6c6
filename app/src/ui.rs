use crate::app::{FormState, SalesApp};
use crate::charts;

use eframe::egui::{self, Color32, RichText, Ui};
use sales_pred::{format_sales, Category, OutletSize, OutletType, RegressionModel};

const PREDICTION_BOX: Color32 = Color32::from_rgb(0x00, 0x79, 0x6B);
const TITLE_COLOR: Color32 = Color32::from_rgb(0x2E, 0x7D, 0x32);

/// Draws the left-side panel: model information and session controls.
pub fn draw_side_panel(app: &mut SalesApp, ctx: &egui::Context) {
    egui::SidePanel::left("session_panel").show(ctx, |ui| {
        ui.heading("Session");
        ui.separator();

        ui.label(format!("Model: {}", app.service.model().name()));
        ui.label(format!("Predictions: {}", app.history.len()));
        ui.separator();

        if ui
            .add_enabled(!app.history.is_empty(), egui::Button::new("Clear History"))
            .clicked()
        {
            app.clear_history();
        }
    });
}

/// Draws the central panel: the form, the prediction and the charts.
pub fn draw_central_panel(app: &mut SalesApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                let title = RichText::new("Item Sale Predictor").size(28.0).strong();
                ui.label(title.color(TITLE_COLOR));
            });
            ui.add_space(12.0);

            draw_form(&mut app.form, ui);
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                if ui.button(RichText::new("Predict").size(16.0)).clicked() {
                    app.predict();
                }
                draw_prediction(app, ui);
            });

            ui.add_space(40.0);
            draw_visualizations(app, ui);
        });
    });
}

fn draw_form(form: &mut FormState, ui: &mut Ui) {
    ui.columns(2, |columns| {
        let ui = &mut columns[0];
        ui.label("Item Weight");
        ui.add(
            egui::DragValue::new(&mut form.item_weight)
                .range(0.0..=f64::MAX)
                .speed(0.05)
                .fixed_decimals(2),
        );
        category_combo(ui, "Outlet Size", &mut form.outlet_size);
        ui.label("Outlet Type");
        ui.horizontal_wrapped(|ui| {
            for outlet_type in OutletType::ALL {
                ui.radio_value(&mut form.outlet_type, *outlet_type, outlet_type.label());
            }
        });

        let ui = &mut columns[1];
        ui.label("Item MRP");
        ui.add(
            egui::DragValue::new(&mut form.item_mrp)
                .range(0.0..=f64::MAX)
                .speed(0.5)
                .max_decimals(4),
        );
        category_combo(ui, "Outlet Location Type", &mut form.outlet_location_type);
    });
}

/// A combo box over the closed label set of one categorical feature.
fn category_combo<C: Category>(ui: &mut Ui, label: &str, value: &mut C) {
    ui.label(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for option in C::ALL {
                ui.selectable_value(value, *option, option.label());
            }
        });
}

fn draw_prediction(app: &SalesApp, ui: &mut Ui) {
    match &app.last_result {
        Some(Ok(sales)) => {
            ui.add_space(20.0);
            ui.label(
                RichText::new(format!("Predicted Value: {}", format_sales(*sales)))
                    .size(22.0)
                    .color(Color32::WHITE)
                    .background_color(PREDICTION_BOX),
            );
        }
        Some(Err(message)) => {
            ui.add_space(20.0);
            ui.colored_label(ui.visuals().error_fg_color, format!("Error: {}", message));
        }
        None => {}
    }
}

fn draw_visualizations(app: &SalesApp, ui: &mut Ui) {
    if app.history.is_empty() {
        ui.colored_label(
            ui.visuals().warn_fg_color,
            "No data to display. Please provide inputs and click Predict.",
        );
        return;
    }

    ui.vertical_centered(|ui| {
        ui.label(RichText::new("Visualizations").size(22.0).color(PREDICTION_BOX));
    });
    ui.add_space(8.0);
    charts::draw_mrp_scatter(ui, &app.history);
    ui.add_space(24.0);
    charts::draw_mean_sales_bars(ui, &app.history);

    // Outlet sizes without any record yet are left out of the bar chart.
    let missing: Vec<&str> = OutletSize::ALL
        .iter()
        .filter(|s| !app.history.records().iter().any(|r| r.input.outlet_size == **s))
        .map(|s| s.label())
        .collect();
    if !missing.is_empty() {
        ui.weak(format!("No predictions yet for: {}", missing.join(", ")));
    }
}
