use crate::{Category, Float, OutletLocationType, OutletSize, OutletType};
use ndarray::{Array1, ArrayView1};

/// Number of columns the regression artifact was trained with.
pub const FEATURE_COUNT: usize = 5;

/// Training column names, in feature-vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Item_Weight",
    "Item_MRP",
    "Outlet_Size",
    "Outlet_Location_Type",
    "Outlet_Type",
];

/// The numeric encoding of one prediction request.
///
/// Layout is `[item_weight, item_mrp, outlet_size, outlet_location_type, outlet_type]`.
/// The order has to match the column order of the trained artifact and cannot be
/// recovered from the values themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector<F: Float> {
    values: [F; FEATURE_COUNT],
}

impl<F: Float> FeatureVector<F> {
    pub fn new(
        item_weight: F,
        item_mrp: F,
        outlet_size: OutletSize,
        outlet_location_type: OutletLocationType,
        outlet_type: OutletType,
    ) -> Self {
        FeatureVector {
            values: [
                item_weight,
                item_mrp,
                F::from_u8(outlet_size.code()).unwrap_or_else(F::zero),
                F::from_u8(outlet_location_type.code()).unwrap_or_else(F::zero),
                F::from_u8(outlet_type.code()).unwrap_or_else(F::zero),
            ],
        }
    }

    pub fn values(&self) -> &[F; FEATURE_COUNT] {
        &self.values
    }

    pub fn view(&self) -> ArrayView1<'_, F> {
        ArrayView1::from(&self.values[..])
    }

    pub fn to_array(&self) -> Array1<F> {
        Array1::from(self.values.to_vec())
    }
}
