//! Conversion of raw model output into displayed sales figures.

/// Undoes the `log(1 + y)` target transform the artifact was trained with.
///
/// The artifact carries no record of this transform; it is part of the inference
/// contract. `exp_m1` keeps precision for outputs close to zero.
pub fn inverse_log(raw: f64) -> f64 {
    raw.exp_m1()
}

/// Two-decimal rendering used by the prediction box.
pub fn format_sales(value: f64) -> String {
    format!("{:.2}", value)
}
