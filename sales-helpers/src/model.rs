use crate::Float;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use thiserror::Error;

/// Errors raised by regression models at load or inference time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Input rows do not have the width the model was trained with
    #[error("expected {expected} features per row, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// The model parameters are structurally unusable
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// A fitted regression model that maps feature rows to a single value each.
///
/// Implementations are treated as opaque: the caller only relies on the
/// number of features and on `predict`.
pub trait RegressionModel<F: Float> {
    /// Width of the rows accepted by `predict`.
    fn n_features(&self) -> usize;

    /// Predicts one value per row of `rows`.
    fn predict(&self, rows: ArrayView2<F>) -> Result<Array1<F>, ModelError>;

    /// Short human-readable description, e.g. "Linear (5 features)".
    fn name(&self) -> String;

    /// Single-sample inference: a batch of one row.
    fn predict_one(&self, features: ArrayView1<F>) -> Result<F, ModelError> {
        let rows = features.insert_axis(Axis(0));
        let out = self.predict(rows)?;
        out.first()
            .copied()
            .ok_or_else(|| ModelError::InvalidModel("model returned no prediction".to_string()))
    }

    /// Returns `DimensionMismatch` unless `rows` has `n_features()` columns.
    fn check_width(&self, rows: &ArrayView2<F>) -> Result<(), ModelError> {
        if rows.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                found: rows.ncols(),
            });
        }
        Ok(())
    }
}

impl<F: Float, M: RegressionModel<F> + ?Sized> RegressionModel<F> for Box<M> {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict(&self, rows: ArrayView2<F>) -> Result<Array1<F>, ModelError> {
        (**self).predict(rows)
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn predict_one(&self, features: ArrayView1<F>) -> Result<F, ModelError> {
        (**self).predict_one(features)
    }
}
