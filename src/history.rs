use crate::service::PredictionInput;
use sales_helpers::{Category, OutletSize};

/// One successful prediction: the inputs the user entered and what came out.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub input: PredictionInput,
    /// Model output in the training target space (log1p of sales).
    pub raw: f64,
    /// `inverse_log(raw)`, the figure shown to the user and plotted.
    pub sales: f64,
}

/// Predictions made during one interactive session, in call order.
///
/// The history is owned by the session and handed to
/// [`PredictionService::record_prediction`](crate::PredictionService::record_prediction).
/// Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHistory {
    records: Vec<PredictionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: PredictionRecord) -> &PredictionRecord {
        self.records.push(record);
        // The vector cannot be empty right after a push.
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// `(item_mrp, sales, outlet_size)` per record, for the MRP scatter plot.
    pub fn scatter_points(&self) -> Vec<(f64, f64, OutletSize)> {
        self.records
            .iter()
            .map(|r| (r.input.item_mrp, r.sales, r.input.outlet_size))
            .collect()
    }

    /// Mean predicted sales per outlet size, for sizes that have at least one record.
    ///
    /// Sizes come out in code order (Small, Medium, High).
    pub fn mean_sales_by_outlet_size(&self) -> Vec<(OutletSize, f64)> {
        OutletSize::ALL
            .iter()
            .filter_map(|&size| {
                let (sum, count) = self
                    .records
                    .iter()
                    .filter(|r| r.input.outlet_size == size)
                    .fold((0.0, 0usize), |(sum, count), r| (sum + r.sales, count + 1));
                (count > 0).then(|| (size, sum / count as f64))
            })
            .collect()
    }
}
