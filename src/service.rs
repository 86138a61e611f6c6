use crate::error::{Result, SalesError};
use crate::history::{PredictionRecord, SessionHistory};
use crate::transform::inverse_log;
use sales_helpers::{
    Category, FeatureVector, OutletLocationType, OutletSize, OutletType, RegressionModel,
};
use tracing::{debug, warn};

/// The five values entered on the form for one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    pub item_weight: f64,
    pub item_mrp: f64,
    pub outlet_size: OutletSize,
    pub outlet_location_type: OutletLocationType,
    pub outlet_type: OutletType,
}

impl PredictionInput {
    pub fn new(
        item_weight: f64,
        item_mrp: f64,
        outlet_size: OutletSize,
        outlet_location_type: OutletLocationType,
        outlet_type: OutletType,
    ) -> Self {
        Self {
            item_weight,
            item_mrp,
            outlet_size,
            outlet_location_type,
            outlet_type,
        }
    }

    /// Parses the three categorical inputs from their display labels.
    ///
    /// # Errors
    ///
    /// Returns `SalesError::UnknownCategory` for the first label that is not in its
    /// closed label set.
    pub fn from_labels(
        item_weight: f64,
        item_mrp: f64,
        outlet_size: &str,
        outlet_location_type: &str,
        outlet_type: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            item_weight,
            item_mrp,
            parse_label(outlet_size)?,
            parse_label(outlet_location_type)?,
            parse_label(outlet_type)?,
        ))
    }

    pub fn features(&self) -> FeatureVector<f64> {
        FeatureVector::new(
            self.item_weight,
            self.item_mrp,
            self.outlet_size,
            self.outlet_location_type,
            self.outlet_type,
        )
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [("Item_Weight", self.item_weight), ("Item_MRP", self.item_mrp)] {
            if !value.is_finite() || value < 0.0 {
                warn!(field, value, "rejected numeric input");
                return Err(SalesError::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

fn parse_label<C: Category>(label: &str) -> Result<C> {
    label.parse::<C>().map_err(|e| {
        warn!(field = e.field, label = %e.label, "rejected categorical label");
        SalesError::from(e)
    })
}

/// Encodes form inputs and runs them through the loaded regression model.
pub struct PredictionService<M> {
    model: M,
}

impl<M: RegressionModel<f64>> PredictionService<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Predicts the sales of one item, in the model's target space.
    ///
    /// The value is the raw model output; apply [`inverse_log`] to get a sales figure.
    ///
    /// # Errors
    ///
    /// Returns `SalesError::InvalidInput` if a numeric input is negative or not finite,
    /// and `SalesError::Model` if inference fails.
    pub fn predict_sale(
        &self,
        item_weight: f64,
        item_mrp: f64,
        outlet_size: OutletSize,
        outlet_location_type: OutletLocationType,
        outlet_type: OutletType,
    ) -> Result<f64> {
        self.predict(&PredictionInput::new(
            item_weight,
            item_mrp,
            outlet_size,
            outlet_location_type,
            outlet_type,
        ))
    }

    /// Like [`predict_sale`](Self::predict_sale), with the categories given as labels.
    ///
    /// All labels are resolved before the model is called, so an unknown label
    /// never reaches inference.
    pub fn predict_sale_labels(
        &self,
        item_weight: f64,
        item_mrp: f64,
        outlet_size: &str,
        outlet_location_type: &str,
        outlet_type: &str,
    ) -> Result<f64> {
        let input = PredictionInput::from_labels(
            item_weight,
            item_mrp,
            outlet_size,
            outlet_location_type,
            outlet_type,
        )?;
        self.predict(&input)
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
        input.validate()?;
        let features = input.features();
        let raw = self.model.predict_one(features.view())?;
        debug!(features = ?features.values(), raw, "predicted sale");
        Ok(raw)
    }

    /// Predicts `input` and appends the result to `history`.
    ///
    /// Nothing is appended when the prediction fails or its sales figure is not finite.
    pub fn record_prediction<'h>(
        &self,
        history: &'h mut SessionHistory,
        input: PredictionInput,
    ) -> Result<&'h PredictionRecord> {
        let raw = self.predict(&input)?;
        let sales = inverse_log(raw);
        if !sales.is_finite() {
            warn!(raw, "prediction overflows the sales scale");
            return Err(SalesError::NonFiniteSales { raw });
        }
        Ok(history.push(PredictionRecord { input, raw, sales }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, ArrayView2, Axis};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;
    use sales_helpers::ModelError;
    use std::cell::{Cell, RefCell};
    use std::result::Result as StdResult;

    /// Returns a fixed value and remembers what it was asked.
    struct StubModel {
        value: f64,
        calls: Cell<usize>,
        last_row: RefCell<Vec<f64>>,
    }

    impl StubModel {
        fn new(value: f64) -> Self {
            Self {
                value,
                calls: Cell::new(0),
                last_row: RefCell::new(Vec::new()),
            }
        }
    }

    impl RegressionModel<f64> for StubModel {
        fn n_features(&self) -> usize {
            5
        }

        fn predict(&self, rows: ArrayView2<f64>) -> StdResult<Array1<f64>, ModelError> {
            self.check_width(&rows)?;
            self.calls.set(self.calls.get() + 1);
            *self.last_row.borrow_mut() = rows.row(0).to_vec();
            Ok(Array1::from_elem(rows.len_of(Axis(0)), self.value))
        }

        fn name(&self) -> String {
            "stub".to_string()
        }
    }

    #[test]
    fn test_all_category_combinations() {
        let service = PredictionService::new(StubModel::new(1.0));
        let mut seen = 0;
        for size in OutletSize::ALL {
            for location in OutletLocationType::ALL {
                for outlet_type in OutletType::ALL {
                    service
                        .predict_sale_labels(
                            1.0,
                            2.0,
                            size.label(),
                            location.label(),
                            outlet_type.label(),
                        )
                        .unwrap();
                    let row = service.model().last_row.borrow().clone();
                    assert_eq!(
                        row,
                        vec![
                            1.0,
                            2.0,
                            size.code() as f64,
                            location.code() as f64,
                            outlet_type.code() as f64
                        ]
                    );
                    seen += 1;
                }
            }
        }
        assert_eq!(seen, 36);
        assert_eq!(service.model().calls.get(), 36);
    }

    #[test]
    fn test_feature_order_reaches_model() {
        let service = PredictionService::new(StubModel::new(0.0));
        service
            .predict_sale(
                9.3,
                249.8092,
                OutletSize::Medium,
                OutletLocationType::Urban,
                OutletType::Hypermarket,
            )
            .unwrap();
        assert_eq!(
            *service.model().last_row.borrow(),
            vec![9.3, 249.8092, 1.0, 0.0, 3.0]
        );
    }

    #[test]
    fn test_raw_output_passes_through() {
        for v in [0.0, 7.25, -1.5, 1e6] {
            let service = PredictionService::new(StubModel::new(v));
            let out = service
                .predict_sale(
                    0.5,
                    249.8092,
                    OutletSize::Small,
                    OutletLocationType::Rural,
                    OutletType::ConvenienceStore,
                )
                .unwrap();
            assert_eq!(out, v);
        }
    }

    #[test]
    fn test_unknown_label_never_reaches_model() {
        let service = PredictionService::new(StubModel::new(1.0));
        let err = service
            .predict_sale_labels(9.3, 249.8092, "XL", "Urban Area", "Hypermarket")
            .unwrap_err();
        assert!(matches!(
            err,
            SalesError::UnknownCategory { field: "Outlet_Size", ref label } if label == "XL"
        ));

        let err = service
            .predict_sale_labels(9.3, 249.8092, "Small", "Downtown", "Hypermarket")
            .unwrap_err();
        assert!(matches!(
            err,
            SalesError::UnknownCategory { field: "Outlet_Location_Type", .. }
        ));
        assert_eq!(service.model().calls.get(), 0);
    }

    #[test]
    fn test_invalid_numeric_input() {
        let service = PredictionService::new(StubModel::new(1.0));
        for (weight, mrp) in [(-0.1, 10.0), (1.0, f64::NAN), (f64::INFINITY, 1.0)] {
            let err = service
                .predict_sale(
                    weight,
                    mrp,
                    OutletSize::Small,
                    OutletLocationType::Urban,
                    OutletType::MiniMart,
                )
                .unwrap_err();
            assert!(matches!(err, SalesError::InvalidInput { .. }));
        }
        assert_eq!(service.model().calls.get(), 0);
    }

    #[test]
    fn test_model_error_propagates() {
        struct Narrow;
        impl RegressionModel<f64> for Narrow {
            fn n_features(&self) -> usize {
                4
            }
            fn predict(&self, rows: ArrayView2<f64>) -> StdResult<Array1<f64>, ModelError> {
                self.check_width(&rows)?;
                Ok(Array1::zeros(rows.nrows()))
            }
            fn name(&self) -> String {
                "narrow".to_string()
            }
        }

        let service = PredictionService::new(Narrow);
        let mut history = SessionHistory::new();
        let input = PredictionInput::new(
            1.0,
            1.0,
            OutletSize::High,
            OutletLocationType::Suburban,
            OutletType::NeighborhoodMarket,
        );
        let err = service.record_prediction(&mut history, input).unwrap_err();
        assert!(matches!(
            err,
            SalesError::Model(ModelError::DimensionMismatch { expected: 4, found: 5 })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_history_keeps_call_order() {
        let service = PredictionService::new(StubModel::new(101f64.ln()));
        let mut history = SessionHistory::new();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut inputs = Vec::new();

        for _ in 0..25 {
            let input = PredictionInput::new(
                rng.random_range(0.0..25.0),
                rng.random_range(30.0..270.0),
                OutletSize::ALL[rng.random_range(0..OutletSize::ALL.len())],
                OutletLocationType::ALL[rng.random_range(0..OutletLocationType::ALL.len())],
                OutletType::ALL[rng.random_range(0..OutletType::ALL.len())],
            );
            let record = service.record_prediction(&mut history, input).unwrap();
            assert_abs_diff_eq!(record.sales, 100.0, epsilon = 1e-9);
            inputs.push(input);
        }

        assert_eq!(history.len(), 25);
        let recorded: Vec<PredictionInput> = history.records().iter().map(|r| r.input).collect();
        assert_eq!(recorded, inputs);
    }

    #[test]
    fn test_overflowing_sales_is_not_recorded() {
        // exp(1000) - 1 is infinite in f64.
        let service = PredictionService::new(StubModel::new(1000.0));
        let mut history = SessionHistory::new();
        let input = PredictionInput::new(
            9.3,
            1.0e6,
            OutletSize::High,
            OutletLocationType::Rural,
            OutletType::Hypermarket,
        );

        assert_eq!(service.predict(&input).unwrap(), 1000.0);
        let err = service.record_prediction(&mut history, input).unwrap_err();
        assert!(matches!(err, SalesError::NonFiniteSales { raw } if raw == 1000.0));
        assert!(history.is_empty());
        assert!(history.mean_sales_by_outlet_size().is_empty());
    }
}
