use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A label that is not part of a feature's closed label set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} label {label:?}")]
pub struct UnknownCategory {
    /// The column name of the categorical feature, e.g. `Outlet_Size`.
    pub field: &'static str,
    pub label: String,
}

/// Common interface of the closed categorical features.
///
/// Every variant encodes to the small integer the model was trained with.
/// Free text is only accepted through `FromStr`, which is where an
/// unrecognised label is rejected.
pub trait Category: Copy + Eq + Debug + Display + FromStr<Err = UnknownCategory> + 'static {
    /// Column name in the training data.
    const FIELD: &'static str;
    /// All variants in code order.
    const ALL: &'static [Self];

    fn code(self) -> u8;
    fn label(self) -> &'static str;
}

fn parse_label<C: Category>(s: &str) -> Result<C, UnknownCategory> {
    C::ALL
        .iter()
        .copied()
        .find(|c| c.label() == s)
        .ok_or_else(|| UnknownCategory {
            field: C::FIELD,
            label: s.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutletSize {
    Small,
    Medium,
    High,
}

impl Category for OutletSize {
    const FIELD: &'static str = "Outlet_Size";
    const ALL: &'static [Self] = &[OutletSize::Small, OutletSize::Medium, OutletSize::High];

    fn code(self) -> u8 {
        match self {
            OutletSize::Small => 0,
            OutletSize::Medium => 1,
            OutletSize::High => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            OutletSize::Small => "Small",
            OutletSize::Medium => "Medium",
            OutletSize::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutletLocationType {
    Urban,
    Suburban,
    Rural,
}

impl Category for OutletLocationType {
    const FIELD: &'static str = "Outlet_Location_Type";
    const ALL: &'static [Self] = &[
        OutletLocationType::Urban,
        OutletLocationType::Suburban,
        OutletLocationType::Rural,
    ];

    fn code(self) -> u8 {
        match self {
            OutletLocationType::Urban => 0,
            OutletLocationType::Suburban => 1,
            OutletLocationType::Rural => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            OutletLocationType::Urban => "Urban Area",
            OutletLocationType::Suburban => "Suburban Area",
            OutletLocationType::Rural => "Rural Area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutletType {
    ConvenienceStore,
    MiniMart,
    NeighborhoodMarket,
    Hypermarket,
}

impl Category for OutletType {
    const FIELD: &'static str = "Outlet_Type";
    const ALL: &'static [Self] = &[
        OutletType::ConvenienceStore,
        OutletType::MiniMart,
        OutletType::NeighborhoodMarket,
        OutletType::Hypermarket,
    ];

    fn code(self) -> u8 {
        match self {
            OutletType::ConvenienceStore => 0,
            OutletType::MiniMart => 1,
            OutletType::NeighborhoodMarket => 2,
            OutletType::Hypermarket => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            OutletType::ConvenienceStore => "Convenience Store",
            OutletType::MiniMart => "Mini Mart",
            OutletType::NeighborhoodMarket => "Neighborhood Market",
            OutletType::Hypermarket => "Hypermarket",
        }
    }
}

macro_rules! label_impls {
    ($($ty:ty),*) => {$(
        impl FromStr for $ty {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_label(s)
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

label_impls!(OutletSize, OutletLocationType, OutletType);
