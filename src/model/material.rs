use serde::{Deserialize, Serialize};

/// One line of the planner's materials table.
///
/// `qty_to_order` is derived from the two inputs and recomputed on every change,
/// including when a stored row is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredMaterialRow")]
pub struct MaterialRow {
    pub id: String,
    pub item_code: String,
    pub material_name: String,
    qty_required: f64,
    stock_balance: f64,
    qty_to_order: f64,
    pub pr_no: String,
}

impl MaterialRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_code: String::new(),
            material_name: String::new(),
            qty_required: 0.0,
            stock_balance: 0.0,
            qty_to_order: 0.0,
            pr_no: String::new(),
        }
    }

    pub fn qty_required(&self) -> f64 {
        self.qty_required
    }

    pub fn stock_balance(&self) -> f64 {
        self.stock_balance
    }

    pub fn qty_to_order(&self) -> f64 {
        self.qty_to_order
    }

    pub fn set_qty_required(&mut self, value: f64) {
        self.qty_required = value;
        self.recompute();
    }

    pub fn set_stock_balance(&mut self, value: f64) {
        self.stock_balance = value;
        self.recompute();
    }

    pub fn with_quantities(mut self, qty_required: f64, stock_balance: f64) -> Self {
        self.qty_required = qty_required;
        self.stock_balance = stock_balance;
        self.recompute();
        self
    }

    fn recompute(&mut self) {
        self.qty_to_order = (self.qty_required - self.stock_balance).max(0.0);
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredMaterialRow {
    id: String,
    item_code: String,
    material_name: String,
    #[serde(deserialize_with = "super::lenient::number")]
    qty_required: f64,
    #[serde(deserialize_with = "super::lenient::number")]
    stock_balance: f64,
    pr_no: String,
}

impl Default for StoredMaterialRow {
    fn default() -> Self {
        Self {
            id: String::new(),
            item_code: String::new(),
            material_name: String::new(),
            qty_required: 0.0,
            stock_balance: 0.0,
            pr_no: String::new(),
        }
    }
}

impl From<StoredMaterialRow> for MaterialRow {
    fn from(stored: StoredMaterialRow) -> Self {
        let mut row = MaterialRow::new(stored.id).with_quantities(stored.qty_required, stored.stock_balance);
        row.item_code = stored.item_code;
        row.material_name = stored.material_name;
        row.pr_no = stored.pr_no;
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn surplus_stock_orders_nothing() {
        let row = MaterialRow::new("m1").with_quantities(10.0, 15.0);
        assert_eq!(row.qty_to_order(), 0.0);
    }

    #[test]
    fn each_setter_recomputes() {
        let mut row = MaterialRow::new("m1");
        row.set_qty_required(40.0);
        assert_eq!(row.qty_to_order(), 40.0);
        row.set_stock_balance(12.5);
        assert_eq!(row.qty_to_order(), 27.5);
    }

    #[test]
    fn stale_stored_value_is_rederived() {
        let row: MaterialRow = serde_json::from_str(
            r#"{"id":"a","itemCode":"RM-1","materialName":"Gelatin","qtyRequired":"25","stockBalance":5,"qtyToOrder":999,"prNo":"PR-7"}"#,
        )
        .expect("row");
        assert_eq!(row.qty_required(), 25.0);
        assert_eq!(row.qty_to_order(), 20.0);
        assert_eq!(row.pr_no, "PR-7");
    }

    #[test]
    fn serializes_derived_value_for_storage() {
        let row = MaterialRow::new("a").with_quantities(3.0, 1.0);
        let json = serde_json::to_value(&row).expect("json");
        assert_eq!(json["qtyToOrder"], serde_json::json!(2.0));
        assert_eq!(json["itemCode"], serde_json::json!(""));
    }

    proptest! {
        #[test]
        fn qty_to_order_tracks_inputs(req in -1.0e6f64..1.0e6, bal in -1.0e6f64..1.0e6, req2 in -1.0e6f64..1.0e6) {
            let mut row = MaterialRow::new("p").with_quantities(req, bal);
            prop_assert_eq!(row.qty_to_order(), (req - bal).max(0.0));
            row.set_qty_required(req2);
            prop_assert_eq!(row.qty_to_order(), (req2 - bal).max(0.0));
        }
    }
}
