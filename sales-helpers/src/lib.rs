use ndarray::NdFloat;
use num_traits::FromPrimitive;

use std::iter::Sum;

mod category;
mod common;
mod model;

pub use category::{Category, OutletLocationType, OutletSize, OutletType, UnknownCategory};
pub use common::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{ModelError, RegressionModel};

/// Scalar type the regressors compute in.
pub trait Float: NdFloat + FromPrimitive + Default + Sum {}

impl Float for f32 {}

impl Float for f64 {}
