//! Sales submission and planner save: the only two writes an order sees.

use crate::error::JobOrderError;
use crate::model::{Company, FinalStatus, MaterialRow, Order, OrderStatus, ProductSpec, SkuType};
use crate::store::{OrderStore, StoreResult};
use chrono::{DateTime, Utc};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// What the sales role fills in before submitting.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesDraft {
    pub company: Company,
    pub customer_name: String,
    pub po_number: String,
    pub sku_type: SkuType,
    pub est_delivery_date: String,
    pub product: ProductSpec,
    /// Only kept when `include_product2` is set at submission.
    pub product2: Option<ProductSpec>,
    pub include_product2: bool,
    pub sales_prepared_by: Option<String>,
    pub sales_approved_by: Option<String>,
    pub sales_received_by: Option<String>,
}

impl SalesDraft {
    pub fn new(company: Company, product: ProductSpec) -> Self {
        Self {
            company,
            customer_name: String::new(),
            po_number: String::new(),
            sku_type: SkuType::Existing,
            est_delivery_date: String::new(),
            product,
            product2: None,
            include_product2: false,
            sales_prepared_by: None,
            sales_approved_by: None,
            sales_received_by: None,
        }
    }

    /// Builds the stored order. The sales date is the UTC calendar day of `now`.
    pub fn into_order(self, id: impl Into<String>, now: DateTime<Utc>) -> Order {
        let mut order = Order::new(id, now, self.company, self.product);
        order.status = OrderStatus::PendingPlanner;
        order.customer_name = self.customer_name;
        order.po_number = self.po_number;
        order.sku_type = self.sku_type;
        order.est_delivery_date = self.est_delivery_date;
        order.product2 = if self.include_product2 { self.product2 } else { None };
        order.sales_prepared_by = non_empty(self.sales_prepared_by);
        order.sales_approved_by = non_empty(self.sales_approved_by);
        order.sales_received_by = non_empty(self.sales_received_by);
        order.sales_date = Some(now.format("%Y-%m-%d").to_string());
        order
    }
}

/// Assigns an id from `store`, stamps the submission time and stores the order.
pub fn submit_sales_order(store: &dyn OrderStore, draft: SalesDraft) -> StoreResult<Order> {
    let order = draft.into_order(store.generate_id(), Utc::now());
    store.create_order(order.clone())?;
    tracing::debug!(id = %order.id, po = %order.po_number, "sales order submitted");
    Ok(order)
}

/// Section B as the planner enters it. Saving replaces every field below on
/// the stored order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerEntry {
    pub job_order_no: Option<String>,
    pub section_b_date: Option<String>,
    pub materials: Vec<MaterialRow>,
    pub remarks: Option<String>,
    pub prepared_by: Option<String>,
    pub prepared_date: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_date: Option<String>,
    pub approved_by: Option<String>,
    pub approved_date: Option<String>,
    pub received_by: Option<String>,
    pub received_date: Option<String>,
    pub completion_date: Option<String>,
    pub qty_delivered: Option<String>,
    pub pending_reason: Option<String>,
}

impl PlannerEntry {
    /// Starts from what is already stored so a re-save keeps untouched fields.
    pub fn from_order(order: &Order) -> Self {
        Self {
            job_order_no: order.job_order_no.clone(),
            section_b_date: order.section_b_date.clone(),
            materials: order.materials.clone(),
            remarks: order.remarks.clone(),
            prepared_by: order.planner_prepared_by.clone(),
            prepared_date: order.planner_prepared_date.clone(),
            reviewed_by: order.planner_reviewed_by.clone(),
            reviewed_date: order.planner_reviewed_date.clone(),
            approved_by: order.planner_approved_by.clone(),
            approved_date: order.planner_approved_date.clone(),
            received_by: order.planner_received_by.clone(),
            received_date: order.planner_received_date.clone(),
            completion_date: order.completion_date.clone(),
            qty_delivered: order.qty_delivered.clone(),
            pending_reason: order.pending_reason.clone(),
        }
    }

    /// Writes the entry onto `order`. The order becomes completed and stays so.
    /// Without an explicit disposition the stored one is kept, else Pending.
    pub fn apply(self, order: &mut Order, final_status: Option<FinalStatus>) {
        order.job_order_no = non_empty(self.job_order_no);
        order.section_b_date = non_empty(self.section_b_date);
        order.materials = self.materials;
        order.remarks = non_empty(self.remarks);
        order.planner_prepared_by = non_empty(self.prepared_by);
        order.planner_prepared_date = non_empty(self.prepared_date);
        order.planner_reviewed_by = non_empty(self.reviewed_by);
        order.planner_reviewed_date = non_empty(self.reviewed_date);
        order.planner_approved_by = non_empty(self.approved_by);
        order.planner_approved_date = non_empty(self.approved_date);
        order.planner_received_by = non_empty(self.received_by);
        order.planner_received_date = non_empty(self.received_date);
        order.completion_date = non_empty(self.completion_date);
        order.qty_delivered = non_empty(self.qty_delivered);
        order.pending_reason = non_empty(self.pending_reason);
        order.final_status = final_status
            .or_else(|| order.final_status.take())
            .or(Some(FinalStatus::Pending));
        order.status = OrderStatus::Completed;
    }
}

/// Loads order `id`, applies `entry` and stores the result.
pub fn save_planner_entry(
    store: &dyn OrderStore,
    id: &str,
    entry: PlannerEntry,
    final_status: Option<FinalStatus>,
) -> StoreResult<Order> {
    let mut order = store
        .get_order_by_id(id)?
        .ok_or_else(|| JobOrderError::NotFound(id.to_string()))?;
    let first_save = order.status == OrderStatus::PendingPlanner;
    entry.apply(&mut order, final_status);
    store.update_order(order.clone())?;
    tracing::debug!(
        id = %order.id,
        first_save,
        materials = order.materials.len(),
        "planner entry saved"
    );
    Ok(order)
}

/// Appends an empty material row with a fresh id and returns it for editing.
pub fn add_material_row(materials: &mut Vec<MaterialRow>) -> &mut MaterialRow {
    let id = uuid::Uuid::new_v4().simple().to_string();
    let index = materials.len();
    materials.push(MaterialRow::new(id));
    &mut materials[index]
}

/// `JobOrder_<poNumber>.pdf`. Path separators in the PO number become `_`.
pub fn pdf_file_name(order: &Order) -> String {
    let po: String = order
        .po_number
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("JobOrder_{po}.pdf")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
