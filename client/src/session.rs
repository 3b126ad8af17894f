//! Dashboard session: loaded records, grid state and user notices
//!
//! Writes never patch `records` in place. Every successful write is followed
//! by a full reload, and a failed reload keeps whatever was loaded before.

use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::gateway::{ExportedFile, InventoryGateway};
use crate::sequence::{RequestSequence, Ticket};
use shared::{
    parse_record_form, validate_input, validate_patch, validate_variant_batch, ExportFilters,
    ExportFormat, ExportRequest, FilterOptions, GridState, GridView, ImportReport,
    InventoryPatch, InventoryRecord, RecordForm, VariantBatch,
};

/// Feedback shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    /// Import finished but some rows were rejected
    PartialImport(ImportReport),
}

/// What the record form submits
#[derive(Debug, Clone)]
pub enum SaveIntent {
    Create(RecordForm),
    Update { id: Uuid, patch: InventoryPatch },
    CreateVariants(VariantBatch),
}

/// Records written by a successful save
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    One(InventoryRecord),
    Many(Vec<InventoryRecord>),
}

pub struct DashboardSession<G: InventoryGateway> {
    gateway: G,
    records: Vec<InventoryRecord>,
    filter_options: FilterOptions,
    state: GridState,
    sequence: RequestSequence,
    notice: Option<Notice>,
}

impl<G: InventoryGateway> DashboardSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            records: Vec::new(),
            filter_options: FilterOptions::default(),
            state: GridState::default(),
            sequence: RequestSequence::new(),
            notice: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Apply a user action to the grid state
    pub fn update_state(&mut self, action: impl FnOnce(GridState) -> GridState) {
        let state = std::mem::take(&mut self.state);
        self.state = action(state);
    }

    /// The table as it should render right now
    pub fn view(&self) -> GridView {
        self.state.view(&self.records)
    }

    /// Load records and selector options; returns whether the records were applied
    pub async fn reload(&mut self) -> bool {
        let ticket = self.begin_reload();
        let result = self.gateway.list_inventory().await;
        let applied = self.finish_reload(ticket, result);

        if applied {
            match self.gateway.list_filter_options().await {
                Ok(options) => self.filter_options = options,
                Err(e) => tracing::warn!(error = %e, "Keeping previous filter options"),
            }
        }
        applied
    }

    /// Start a reload whose response may arrive after later ones
    pub fn begin_reload(&mut self) -> Ticket {
        self.sequence.issue()
    }

    /// Apply a reload response unless a newer reload was started meanwhile
    pub fn finish_reload(&mut self, ticket: Ticket, result: ClientResult<Vec<InventoryRecord>>) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(?ticket, "Discarding stale inventory response");
            return false;
        }
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Inventory loaded");
                self.records = records;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Inventory reload failed");
                self.notice = Some(Notice::Error(format!("Failed to load inventory: {}", e)));
                false
            }
        }
    }

    /// Create, update or create variants, then reload
    ///
    /// Input is validated before any call; a validation failure leaves the
    /// records and grid state as they were.
    pub async fn save(&mut self, intent: SaveIntent) -> ClientResult<Saved> {
        let result = match intent {
            SaveIntent::Create(form) => match parse_record_form(&form) {
                Ok(input) => match validate_input(&input) {
                    Ok(()) => self.gateway.create_record(&input).await.map(Saved::One),
                    Err(errors) => Err(errors.into()),
                },
                Err(errors) => Err(errors.into()),
            },
            SaveIntent::Update { id, patch } => match validate_patch(&patch) {
                Ok(()) => self.gateway.update_record(id, &patch).await.map(Saved::One),
                Err(errors) => Err(errors.into()),
            },
            SaveIntent::CreateVariants(batch) => match validate_variant_batch(&batch) {
                Ok(_) => self.gateway.create_variants(&batch).await.map(Saved::Many),
                Err(errors) => Err(errors.into()),
            },
        };

        match result {
            Ok(saved) => {
                let message = match &saved {
                    Saved::One(record) => format!("Saved {}", record.sku),
                    Saved::Many(records) => format!("Created {} variants", records.len()),
                };
                self.notice = Some(Notice::Success(message));
                self.reload().await;
                Ok(saved)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn delete(&mut self, id: Uuid) -> ClientResult<()> {
        match self.gateway.delete_record(id).await {
            Ok(()) => {
                self.notice = Some(Notice::Success("Item deleted".to_string()));
                self.reload().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Upload a CSV file; rows that made it in are reloaded even when others failed
    pub async fn import(&mut self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport> {
        match self.gateway.import_records(file_name, bytes).await {
            Ok(report) => {
                self.notice = Some(if report.is_partial() {
                    Notice::PartialImport(report.clone())
                } else {
                    Notice::Success(format!(
                        "Imported {} new and {} updated items",
                        report.inserted, report.updated
                    ))
                });
                self.reload().await;
                Ok(report)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Export with the current brand and warehouse selectors; search and column filters stay local
    pub async fn export(&mut self, format: ExportFormat, fields: Vec<String>) -> ClientResult<ExportedFile> {
        let request = ExportRequest {
            format,
            fields,
            filters: ExportFilters::from_selectors(
                &self.state.filters.brand,
                &self.state.filters.warehouse,
            ),
        };
        self.gateway
            .export_records(&request)
            .await
            .map_err(|e| self.fail(e))
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        self.notice = Some(Notice::Error(error.to_string()));
        error
    }
}
