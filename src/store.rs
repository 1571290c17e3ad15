//! Flat record store for job orders, keyed by an opaque id.
//!
//! The renderer never touches a store; callers load an [`Order`] here and hand
//! the snapshot to [`crate::JobOrderRenderer::render`].

use crate::error::JobOrderError;
use crate::model::Order;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Strings longer than this in a stored record are treated as corrupt.
pub const CORRUPT_STRING_CHARS: usize = 5000;
/// How much of a corrupt string survives the scrub.
pub const CORRUPT_STRING_KEEP: usize = 100;
pub const CORRUPT_STRING_MARKER: &str = "...[TRUNCATED_CORRUPT_DATA]";

pub type StoreResult<T> = Result<T, JobOrderError>;

pub trait OrderStore {
    /// Appends a new order. Ids are not checked for uniqueness.
    fn create_order(&self, order: Order) -> StoreResult<()>;
    /// Replaces the order with the same id; `NotFound` when there is none.
    fn update_order(&self, order: Order) -> StoreResult<()>;
    fn get_order_by_id(&self, id: &str) -> StoreResult<Option<Order>>;
    /// Every order, in insertion order.
    fn get_all_orders(&self) -> StoreResult<Vec<Order>>;

    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

fn replace_by_id(orders: &mut [Order], order: Order) -> StoreResult<()> {
    match orders.iter_mut().find(|existing| existing.id == order.id) {
        Some(slot) => {
            *slot = order;
            Ok(())
        }
        None => Err(JobOrderError::NotFound(order.id)),
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Vec<Order>>> {
        self.orders
            .lock()
            .map_err(|_| JobOrderError::Store("order store lock poisoned".to_string()))
    }
}

impl OrderStore for InMemoryStore {
    fn create_order(&self, order: Order) -> StoreResult<()> {
        self.lock()?.push(order);
        Ok(())
    }

    fn update_order(&self, order: Order) -> StoreResult<()> {
        replace_by_id(&mut self.lock()?, order)
    }

    fn get_order_by_id(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.lock()?.iter().find(|order| order.id == id).cloned())
    }

    fn get_all_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.lock()?.clone())
    }
}

/// All orders in one JSON array file. Every call reloads the file, so two
/// stores pointed at the same path see each other's writes.
pub struct JsonFileStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.io
            .lock()
            .map_err(|_| JobOrderError::Store("order file lock poisoned".to_string()))
    }

    /// Missing file reads as an empty store. Corrupt oversize strings are
    /// scrubbed and the cleaned file is written back before parsing.
    fn load(&self) -> StoreResult<Vec<Order>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let mut value: Value = serde_json::from_slice(&raw)?;
        let scrubbed = scrub_oversize_strings(&mut value);
        if scrubbed > 0 {
            tracing::warn!(
                path = %self.path.display(),
                scrubbed,
                "truncated oversize strings in stored orders"
            );
            std::fs::write(&self.path, serde_json::to_vec(&value)?)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    fn save(&self, orders: &[Order]) -> StoreResult<()> {
        std::fs::write(&self.path, serde_json::to_vec(orders)?)?;
        tracing::debug!(path = %self.path.display(), orders = orders.len(), "order file saved");
        Ok(())
    }
}

impl OrderStore for JsonFileStore {
    fn create_order(&self, order: Order) -> StoreResult<()> {
        let _io = self.guard()?;
        let mut orders = self.load()?;
        orders.push(order);
        self.save(&orders)
    }

    fn update_order(&self, order: Order) -> StoreResult<()> {
        let _io = self.guard()?;
        let mut orders = self.load()?;
        replace_by_id(&mut orders, order)?;
        self.save(&orders)
    }

    fn get_order_by_id(&self, id: &str) -> StoreResult<Option<Order>> {
        let _io = self.guard()?;
        Ok(self.load()?.into_iter().find(|order| order.id == id))
    }

    fn get_all_orders(&self) -> StoreResult<Vec<Order>> {
        let _io = self.guard()?;
        self.load()
    }
}

/// Truncates every string longer than [`CORRUPT_STRING_CHARS`] anywhere in
/// `value`. Returns how many strings were cut.
pub(crate) fn scrub_oversize_strings(value: &mut Value) -> usize {
    match value {
        Value::String(text) => match text.char_indices().nth(CORRUPT_STRING_CHARS) {
            Some(_) => {
                let keep = text
                    .char_indices()
                    .nth(CORRUPT_STRING_KEEP)
                    .map(|(cut, _)| cut)
                    .unwrap_or(text.len());
                let mut cleaned = String::with_capacity(keep + CORRUPT_STRING_MARKER.len());
                cleaned.push_str(&text[..keep]);
                cleaned.push_str(CORRUPT_STRING_MARKER);
                *text = cleaned;
                1
            }
            None => 0,
        },
        Value::Array(items) => items.iter_mut().map(scrub_oversize_strings).sum(),
        Value::Object(map) => map.values_mut().map(scrub_oversize_strings).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Company, ProductSpec};
    use chrono::{TimeZone, Utc};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn order(id: &str, po: &str) -> Order {
        let created = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).single().expect("date");
        let mut order = Order::new(id, created, Company::PlantM, ProductSpec::new("Vit C"));
        order.po_number = po.to_string();
        order
    }

    fn temp_store_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "joborder_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn in_memory_store_creates_reads_and_updates() {
        let store = InMemoryStore::new();
        store.create_order(order("a", "PO-1")).expect("create");
        store.create_order(order("b", "PO-2")).expect("create");

        let mut b = store.get_order_by_id("b").expect("read").expect("exists");
        b.po_number = "PO-2A".to_string();
        store.update_order(b).expect("update");

        let all = store.get_all_orders().expect("all");
        assert_eq!(
            all.iter().map(|o| o.po_number.as_str()).collect::<Vec<_>>(),
            vec!["PO-1", "PO-2A"]
        );
        assert!(store.get_order_by_id("zzz").expect("read").is_none());
    }

    #[test]
    fn updating_unknown_order_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update_order(order("ghost", "PO-0")).expect_err("missing");
        assert!(matches!(err, JobOrderError::NotFound(id) if id == "ghost"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let store = InMemoryStore::new();
        let a = store.generate_id();
        let b = store.generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn json_file_store_persists_across_instances() {
        let path = temp_store_path("store");
        let store = JsonFileStore::new(&path);
        assert!(store.get_all_orders().expect("empty").is_empty());
        store.create_order(order("a", "PO-9")).expect("create");

        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.get_order_by_id("a").expect("read").expect("exists");
        assert_eq!(loaded.po_number, "PO-9");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_scrubs_oversize_strings_and_writes_back() {
        let path = temp_store_path("scrub");
        let mut record = serde_json::to_value(order("a", "PO-3")).expect("json");
        record["remarks"] = Value::String("x".repeat(CORRUPT_STRING_CHARS + 1));
        record["pendingReason"] = Value::String("y".repeat(6000));
        std::fs::write(&path, serde_json::to_vec(&vec![record]).expect("encode")).expect("write");

        let store = JsonFileStore::new(&path);
        let loaded = store.get_order_by_id("a").expect("read").expect("exists");
        let expected = format!("{}{}", "x".repeat(CORRUPT_STRING_KEEP), CORRUPT_STRING_MARKER);
        assert_eq!(loaded.remarks.as_deref(), Some(expected.as_str()));

        let on_disk = std::fs::read_to_string(&path).expect("reread");
        assert!(!on_disk.contains(&"x".repeat(CORRUPT_STRING_KEEP + 1)));
        assert!(!on_disk.contains(&"y".repeat(CORRUPT_STRING_KEEP + 1)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn strings_at_the_limit_are_kept() {
        let mut value = serde_json::json!({
            "a": "z".repeat(CORRUPT_STRING_CHARS),
            "b": [1, "short", {"c": null}],
        });
        let before = value.clone();
        assert_eq!(scrub_oversize_strings(&mut value), 0);
        assert_eq!(value, before);
    }
}
