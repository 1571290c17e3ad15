//! The job-order record as the sales and planner roles store it.
//!
//! Field names follow the stored JSON (camelCase). Every fixed-choice string is
//! a tolerant enum: known labels map to variants, anything else is kept as
//! `Unrecognized` so a stored record survives a round trip unchanged and simply
//! never ticks a box.

use serde::{Deserialize, Serialize};

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        $vis enum $name {
            $($variant,)+
            Unrecognized(String),
        }

        impl $name {
            /// Every known choice, in printed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($label => $name::$variant,)+
                    _ => $name::Unrecognized(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Unrecognized(raw) => raw,
                    known => known.label().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Stored numbers arrive as numbers, numeric strings or null depending on which
/// form wrote them.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_f64(value: Value) -> f64 {
        let parsed = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        if parsed.is_finite() { parsed } else { 0.0 }
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(to_f64(Value::deserialize(deserializer)?))
    }

    pub(super) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = to_f64(Value::deserialize(deserializer)?);
        Ok(value.clamp(0.0, u32::MAX as f64) as u32)
    }
}

mod material;
mod order;
mod product;
mod supply;

pub use material::MaterialRow;
pub use order::Order;
pub use product::{PackingType, ProductCategory, ProductSpec, ProductType, UnitType, toggle_selection};
pub use supply::{SupplyItem, SupplyParty, SupplySource};

labeled_enum! {
    /// The three legal entities an order can be raised under.
    pub enum Company {
        PlantM => "Halagel Plant (M) Sdn Bhd",
        Products => "Halagel Products Sdn Bhd",
        Malaysia => "Halagel Malaysia Sdn Bhd",
    }
}

labeled_enum! {
    pub enum SkuType {
        Existing => "Existing",
        New => "New",
    }
}

labeled_enum! {
    /// Planner's disposition of the order, printed in the page-2 footer.
    pub enum FinalStatus {
        Closed => "Closed",
        Pending => "Pending",
        Delivered => "Delivered",
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted by sales, planner has not saved yet.
    #[default]
    PendingPlanner,
    Completed,
}
