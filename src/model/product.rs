use super::supply::SupplySource;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Rows of the quantity-order grid.
    pub enum UnitType {
        Bottle => "Bottle",
        Blister => "Blister",
        Box => "Box",
        Tube => "Tube",
        Others => "Others",
    }
}

labeled_enum! {
    pub enum ProductCategory {
        TraditionalHealthSupplement => "Traditional & Health Supplement",
        ToothpasteCosmetics => "Toothpaste & Cosmetics",
        FoodBeverages => "Food & Beverages",
        Others => "Others",
    }
}

labeled_enum! {
    pub enum ProductType {
        Softgel => "Softgel",
        HardCapsule => "Hard Capsule",
        Toothpaste => "Toothpaste",
        Liquid => "Liquid",
        Cosmetics => "Cosmetics",
        Food => "Food",
    }
}

labeled_enum! {
    pub enum PackingType {
        HdpeWhiteBottle => "HDPE White Bottle",
        AmberGlassBottle => "Amber Glass Bottle",
        PetAmberGlassBottle => "PET Amber Glass Bottle",
        Others => "Others",
    }
}

/// Everything the sales role records about one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSpec {
    pub product_name: String,
    #[serde(deserialize_with = "super::lenient::count")]
    pub order_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,

    pub categories: Vec<ProductCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories_others: Option<String>,

    pub product_types: Vec<ProductType>,
    /// Kept for stored records; the product-type group has no Others row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_types_others: Option<String>,

    pub packing_types: Vec<PackingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packing_types_others: Option<String>,

    pub weight_per_item: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_per_bottle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_per_blister: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_per_box_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_per_carton: Option<String>,

    pub supply_source: SupplySource,
}

impl ProductSpec {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            unit_type: Some(UnitType::Bottle),
            ..Self::default()
        }
    }

    pub fn has_category(&self, category: &ProductCategory) -> bool {
        self.categories.contains(category)
    }

    pub fn has_product_type(&self, product_type: &ProductType) -> bool {
        self.product_types.contains(product_type)
    }

    pub fn has_packing_type(&self, packing_type: &PackingType) -> bool {
        self.packing_types.contains(packing_type)
    }
}

/// Adds `value` to a checkbox selection, or removes it when already selected.
pub fn toggle_selection<T: PartialEq>(selection: &mut Vec<T>, value: T) {
    if let Some(pos) = selection.iter().position(|item| *item == value) {
        selection.remove(pos);
    } else {
        selection.push(value);
    }
}
