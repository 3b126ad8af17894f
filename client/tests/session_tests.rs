//! Dashboard session tests against an in-memory gateway

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use retail_inventory_client::{
    ClientError, ClientResult, DashboardSession, ExportedFile, InventoryGateway, Notice,
    SaveIntent, Saved,
};
use rust_decimal::Decimal;
use shared::{
    ExportFormat, ExportRequest, FilterOptions, ImportReport, InventoryInput, InventoryPatch,
    InventoryRecord, RecordForm, Selector, VariantBatch, VariantSpec,
};
use uuid::Uuid;

#[derive(Default)]
struct FakeGateway {
    records: Mutex<Vec<InventoryRecord>>,
    fail_list: AtomicBool,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
    last_export: Mutex<Option<ExportRequest>>,
    import_report: Mutex<ImportReport>,
}

impl FakeGateway {
    fn with_records(records: Vec<InventoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }
}

#[async_trait]
impl InventoryGateway for FakeGateway {
    async fn list_inventory(&self) -> ClientResult<Vec<InventoryRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn list_filter_options(&self) -> ClientResult<FilterOptions> {
        Ok(FilterOptions::from_records(&self.records.lock().unwrap()))
    }

    async fn create_record(&self, input: &InventoryInput) -> ClientResult<InventoryRecord> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.sku == input.sku && r.warehouse == input.warehouse)
        {
            return Err(ClientError::Conflict(format!(
                "SKU '{}' already exists in warehouse '{}'",
                input.sku, input.warehouse
            )));
        }
        let record = input.clone().into_record("tester", chrono_now());
        records.push(record.clone());
        Ok(record)
    }

    async fn create_variants(&self, batch: &VariantBatch) -> ClientResult<Vec<InventoryRecord>> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let created: Vec<_> = batch
            .expand()
            .into_iter()
            .map(|input| input.into_record("tester", chrono_now()))
            .collect();
        self.records.lock().unwrap().extend(created.clone());
        Ok(created)
    }

    async fn update_record(&self, id: Uuid, patch: &InventoryPatch) -> ClientResult<InventoryRecord> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound("Item not found".into()))?;
        *slot = patch.apply_to(slot, "tester", chrono_now());
        Ok(slot.clone())
    }

    async fn delete_record(&self, id: Uuid) -> ClientResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn import_records(&self, _file_name: &str, _bytes: Vec<u8>) -> ClientResult<ImportReport> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.import_report.lock().unwrap().clone())
    }

    async fn export_records(&self, request: &ExportRequest) -> ClientResult<ExportedFile> {
        *self.last_export.lock().unwrap() = Some(request.clone());
        Ok(ExportedFile {
            filename: "inventory_export.csv".into(),
            content_type: "text/csv".into(),
            bytes: b"sku\nA1\n".to_vec(),
        })
    }
}

fn chrono_now() -> DateTime<Utc> {
    Utc::now()
}

fn record(sku: &str, brand: &str, warehouse: &str, qty: i32) -> InventoryRecord {
    InventoryRecord {
        sku: sku.into(),
        name: format!("Item {}", sku),
        brand: brand.into(),
        warehouse: warehouse.into(),
        category: "Tops".into(),
        quantity: qty,
        selling_price: Decimal::new(100, 0),
        mrp: Decimal::new(120, 0),
        ..Default::default()
    }
}

fn form(sku: &str, quantity: &str) -> RecordForm {
    RecordForm {
        sku: sku.into(),
        name: "Tee".into(),
        brand: "Nike".into(),
        warehouse: "W1".into(),
        category: "Tops".into(),
        size: "M(40)".into(),
        mrp: "500".into(),
        selling_price: "450".into(),
        quantity: quantity.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reload_loads_records_and_options() {
    let gateway = FakeGateway::with_records(vec![record("A1", "Nike", "W1", 5), record("A2", "Puma", "W2", 3)]);
    let mut session = DashboardSession::new(gateway);

    assert!(session.reload().await);
    assert_eq!(session.records().len(), 2);
    assert_eq!(session.filter_options().brands, vec!["Nike", "Puma"]);
    assert_eq!(session.view().totals.total_quantity, 8);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_records() {
    let gateway = FakeGateway::with_records(vec![record("A1", "Nike", "W1", 5)]);
    let mut session = DashboardSession::new(gateway);
    session.reload().await;

    session.gateway().fail_list.store(true, Ordering::SeqCst);
    assert!(!session.reload().await);

    assert_eq!(session.records().len(), 1);
    assert!(matches!(session.notice(), Some(Notice::Error(_))));
}

#[tokio::test]
async fn test_stale_reload_response_is_discarded() {
    let mut session = DashboardSession::new(FakeGateway::default());

    let older = session.begin_reload();
    let newer = session.begin_reload();

    assert!(session.finish_reload(newer, Ok(vec![record("NEW", "Nike", "W1", 1)])));
    assert!(!session.finish_reload(older, Ok(vec![record("OLD", "Nike", "W1", 1)])));

    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].sku, "NEW");
}

#[tokio::test]
async fn test_create_reloads_after_success() {
    let mut session = DashboardSession::new(FakeGateway::default());
    session.reload().await;
    let before = session.gateway().list_calls.load(Ordering::SeqCst);

    let saved = session.save(SaveIntent::Create(form("A1", "3"))).await.unwrap();

    assert!(matches!(saved, Saved::One(ref r) if r.sku == "A1"));
    assert_eq!(session.gateway().list_calls.load(Ordering::SeqCst), before + 1);
    assert_eq!(session.records().len(), 1);
    assert!(matches!(session.notice(), Some(Notice::Success(_))));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_gateway() {
    let gateway = FakeGateway::with_records(vec![record("A1", "Nike", "W1", 5)]);
    let mut session = DashboardSession::new(gateway);
    session.reload().await;

    let err = session.save(SaveIntent::Create(form("A2", "three"))).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(session.gateway().write_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.records().len(), 1);
}

#[tokio::test]
async fn test_duplicate_size_in_batch_rejected_locally() {
    let mut session = DashboardSession::new(FakeGateway::default());
    let base = shared::parse_record_form(&form("BASE", "0")).unwrap();
    let spec = |sku: &str| VariantSpec {
        sku: sku.into(),
        size: "M(40)".into(),
        warehouse: None,
        quantity: 1,
        mrp: None,
        selling_price: None,
    };
    let batch = VariantBatch {
        base,
        variants: vec![spec("A-M1"), spec("A-M2")],
    };

    let err = session.save(SaveIntent::CreateVariants(batch)).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(session.gateway().write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_conflict_surfaced_verbatim() {
    let gateway = FakeGateway::with_records(vec![record("A1", "Nike", "W1", 5)]);
    let mut session = DashboardSession::new(gateway);
    session.reload().await;
    let before = session.gateway().list_calls.load(Ordering::SeqCst);

    let err = session.save(SaveIntent::Create(form("A1", "2"))).await.unwrap_err();

    let message = "SKU 'A1' already exists in warehouse 'W1'".to_string();
    assert_eq!(err, ClientError::Conflict(message.clone()));
    assert_eq!(session.notice(), Some(&Notice::Error(message)));
    // No reload after a rejected write
    assert_eq!(session.gateway().list_calls.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn test_update_and_delete_reload() {
    let existing = record("A1", "Nike", "W1", 5);
    let id = existing.id;
    let mut session = DashboardSession::new(FakeGateway::with_records(vec![existing]));
    session.reload().await;

    let patch = InventoryPatch {
        quantity: Some(9),
        ..Default::default()
    };
    session.save(SaveIntent::Update { id, patch }).await.unwrap();
    assert_eq!(session.records()[0].quantity, 9);

    session.delete(id).await.unwrap();
    assert!(session.records().is_empty());
}

#[tokio::test]
async fn test_partial_import_still_reloads() {
    let gateway = FakeGateway::default();
    let mut report = ImportReport {
        inserted: 2,
        total_rows: 3,
        ..Default::default()
    };
    report.record_failure(4, "quantity: not a number");
    *gateway.import_report.lock().unwrap() = report.clone();

    let mut session = DashboardSession::new(gateway);
    let result = session.import("stock.csv", b"sku\n".to_vec()).await.unwrap();

    assert_eq!(result.failed, 1);
    assert_eq!(session.notice(), Some(&Notice::PartialImport(report)));
    assert_eq!(session.gateway().list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_export_forwards_only_selectors() {
    let mut session = DashboardSession::new(FakeGateway::default());
    session.update_state(|s| {
        s.select_brand(Selector::only("Nike"))
            .select_warehouse(Selector::only("W2"))
            .search("polo")
    });

    session
        .export(ExportFormat::Excel, vec!["sku".into(), "quantity".into()])
        .await
        .unwrap();

    let sent = session.gateway().last_export.lock().unwrap().clone().unwrap();
    assert_eq!(sent.filters.brand.as_deref(), Some("Nike"));
    assert_eq!(sent.filters.warehouse.as_deref(), Some("W2"));
    assert_eq!(sent.fields, vec!["sku", "quantity"]);
}
