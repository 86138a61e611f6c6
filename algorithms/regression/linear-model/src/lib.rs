use ndarray::{Array1, ArrayView1, ArrayView2};
use sales_helpers::{Float, ModelError, RegressionModel};
use serde::{Deserialize, Deserializer, Serialize, de};

/// An ordinary linear regression model: `intercept + Σ coefficients[i] * x[i]`.
///
/// # Type Parameters
///
/// * `F`: The float type for the features (e.g., `f32`, `f64`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearRegressor<F: Float> {
    intercept: F,
    coefficients: Vec<F>,
}

#[derive(Deserialize)]
struct LinearParams<F> {
    intercept: F,
    coefficients: Vec<F>,
}

impl<'de, F> Deserialize<'de> for LinearRegressor<F>
where
    F: Float + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let params = LinearParams::<F>::deserialize(deserializer)?;
        Self::new(params.intercept, params.coefficients).map_err(de::Error::custom)
    }
}

impl<F: Float> LinearRegressor<F> {
    /// Creates a model from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidModel` if there are no coefficients or a
    /// parameter is not finite.
    pub fn new(intercept: F, coefficients: Vec<F>) -> Result<Self, ModelError> {
        let model = Self {
            intercept,
            coefficients,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::InvalidModel(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidModel(
                "linear model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }

    pub fn coefficients(&self) -> ArrayView1<'_, F> {
        ArrayView1::from(&self.coefficients[..])
    }
}

impl<F: Float> RegressionModel<F> for LinearRegressor<F> {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, rows: ArrayView2<F>) -> Result<Array1<F>, ModelError> {
        self.check_width(&rows)?;
        Ok(rows.dot(&self.coefficients()) + self.intercept)
    }

    fn name(&self) -> String {
        format!("Linear ({} features)", self.coefficients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new(1.0, vec![2.0, -1.0, 0.5]).unwrap();
        let rows = array![[1.0, 1.0, 2.0], [0.0, 0.0, 0.0], [3.0, 2.0, -4.0]];
        let out = model.predict(rows.view()).unwrap();
        assert_abs_diff_eq!(out, array![3.0, 1.0, 3.0], epsilon = 1e-12);
    }

    #[test]
    fn test_single_row() {
        let model = LinearRegressor::new(0.25, vec![0.01, 0.004, 0.1, -0.05, 0.3]).unwrap();
        let x = array![9.3, 249.8092, 1.0, 0.0, 3.0];
        let expected = 0.25 + 0.093 + 0.9992368 + 0.1 + 0.9;
        assert_abs_diff_eq!(model.predict_one(x.view()).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = LinearRegressor::new(0.0, vec![1.0, 1.0]).unwrap();
        let rows = array![[1.0, 2.0, 3.0]];
        assert_eq!(
            model.predict(rows.view()).unwrap_err(),
            ModelError::DimensionMismatch { expected: 2, found: 3 }
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            LinearRegressor::<f64>::new(0.0, vec![]),
            Err(ModelError::InvalidModel(_))
        ));
        assert!(matches!(
            LinearRegressor::new(f64::NAN, vec![1.0]),
            Err(ModelError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_deserialize() {
        let model: LinearRegressor<f64> =
            serde_json::from_str(r#"{"intercept": 2.0, "coefficients": [1.0, 3.0]}"#).unwrap();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.name(), "Linear (2 features)");
        assert_abs_diff_eq!(model.predict_one(array![1.0, 1.0].view()).unwrap(), 6.0);
    }

    #[test]
    fn test_deserialize_rejects_invalid_parameters() {
        let json = r#"{"intercept": 1.0, "coefficients": []}"#;
        let err = serde_json::from_str::<LinearRegressor<f64>>(json).unwrap_err();
        assert!(err.to_string().contains("no coefficients"));
        let missing_intercept = r#"{"coefficients": [1.0]}"#;
        assert!(serde_json::from_str::<LinearRegressor<f64>>(missing_intercept).is_err());
    }
}
