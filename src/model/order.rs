use super::material::MaterialRow;
use super::product::ProductSpec;
use super::{Company, FinalStatus, OrderStatus, SkuType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job order as stored: the sales header, the primary product flattened into
/// the record, an optional second product, and the planner's section B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,

    pub company: Company,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub po_number: String,
    pub sku_type: SkuType,
    #[serde(default)]
    pub est_delivery_date: String,

    #[serde(flatten)]
    pub product: ProductSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product2: Option<ProductSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_prepared_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_received_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_date: Option<String>,

    // Section B
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_order_no: Option<String>,
    #[serde(default, rename = "sectionBDate", skip_serializing_if = "Option::is_none")]
    pub section_b_date: Option<String>,
    #[serde(default)]
    pub materials: Vec<MaterialRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_prepared_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_received_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_prepared_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_reviewed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_approved_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_received_date: Option<String>,

    // Footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_status: Option<FinalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_delivered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,
}

impl Order {
    /// A fresh order awaiting the planner, with every optional field empty.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, company: Company, product: ProductSpec) -> Self {
        Self {
            id: id.into(),
            created_at,
            status: OrderStatus::PendingPlanner,
            company,
            customer_name: String::new(),
            po_number: String::new(),
            sku_type: SkuType::Existing,
            est_delivery_date: String::new(),
            product,
            product2: None,
            sales_prepared_by: None,
            sales_approved_by: None,
            sales_received_by: None,
            sales_date: None,
            job_order_no: None,
            section_b_date: None,
            materials: Vec::new(),
            remarks: None,
            planner_prepared_by: None,
            planner_reviewed_by: None,
            planner_approved_by: None,
            planner_received_by: None,
            planner_prepared_date: None,
            planner_reviewed_date: None,
            planner_approved_date: None,
            planner_received_date: None,
            completion_date: None,
            final_status: None,
            qty_delivered: None,
            pending_reason: None,
        }
    }

    pub fn material_mut(&mut self, id: &str) -> Option<&mut MaterialRow> {
        self.materials.iter_mut().find(|row| row.id == id)
    }

    pub fn remove_material(&mut self, id: &str) -> Option<MaterialRow> {
        let pos = self.materials.iter().position(|row| row.id == id)?;
        Some(self.materials.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SupplyItem, SupplyParty, UnitType};

    const STORED: &str = r#"{
        "id": "k3j9x0a1b",
        "createdAt": "2024-05-02T08:15:00.000Z",
        "status": "PENDING_PLANNER",
        "company": "Halagel Malaysia Sdn Bhd",
        "customerName": "Nur Health",
        "poNumber": "PO-118",
        "skuType": "New",
        "estDeliveryDate": "2024-06-30",
        "productName": "Omega Softgel",
        "orderQuantity": 5000,
        "unitType": "Bottle",
        "categories": ["Traditional & Health Supplement"],
        "productTypes": ["Softgel"],
        "packingTypes": ["Others"],
        "packingTypesOthers": "Pouch",
        "weightPerItem": "1000mg",
        "supplySource": {"rawMaterial": "Customer", "bottle": "Halagel", "labeling": null},
        "salesDate": "2024-05-02"
    }"#;

    #[test]
    fn reads_flattened_primary_product() {
        let order: Order = serde_json::from_str(STORED).expect("order");
        assert_eq!(order.company, Company::Malaysia);
        assert_eq!(order.sku_type, SkuType::New);
        assert_eq!(order.product.product_name, "Omega Softgel");
        assert_eq!(order.product.unit_type, Some(UnitType::Bottle));
        assert_eq!(order.product.packing_types_others.as_deref(), Some("Pouch"));
        assert_eq!(
            order.product.supply_source.get(SupplyItem::Bottle),
            Some(SupplyParty::Halagel)
        );
        assert!(order.product2.is_none());
        assert!(order.materials.is_empty());
        assert_eq!(order.status, OrderStatus::PendingPlanner);
    }

    #[test]
    fn writes_back_the_same_shape() {
        let order: Order = serde_json::from_str(STORED).expect("order");
        let json = serde_json::to_value(&order).expect("json");
        assert_eq!(json["productName"], "Omega Softgel");
        assert_eq!(json["poNumber"], "PO-118");
        assert!(json.get("product").is_none());
        assert!(json.get("product2").is_none());
        let again: Order = serde_json::from_value(json).expect("round trip");
        assert_eq!(again, order);
    }

    #[test]
    fn material_rows_are_addressed_by_id() {
        let mut order: Order = serde_json::from_str(STORED).expect("order");
        order.materials.push(MaterialRow::new("r1"));
        order.materials.push(MaterialRow::new("r2"));
        order
            .material_mut("r2")
            .expect("row exists")
            .set_qty_required(8.0);
        assert_eq!(order.materials[1].qty_to_order(), 8.0);
        assert!(order.remove_material("r1").is_some());
        assert!(order.remove_material("missing").is_none());
        assert_eq!(order.materials.len(), 1);
    }
}
