//! Export service: renders the selected columns of the selector-filtered inventory

use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use shared::{export_value, ExportFormat, ExportRequest, InventoryRecord, EXPORT_FIELDS};

#[derive(Clone)]
pub struct ExportService {
    inventory: InventoryService,
}

/// A rendered export ready to send as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub rows: usize,
}

/// Requested columns, or every export field when none are given
pub fn resolve_fields(requested: &[String]) -> AppResult<Vec<String>> {
    if requested.is_empty() {
        return Ok(EXPORT_FIELDS.iter().map(|f| f.to_string()).collect());
    }
    if let Some(unknown) = requested.iter().find(|f| !EXPORT_FIELDS.contains(&f.as_str())) {
        return Err(AppError::validation(
            "fields",
            format!("Unknown export field '{}'", unknown),
        ));
    }
    Ok(requested.to_vec())
}

/// CSV with a header row of field names, one column per field in order
pub fn render_csv(records: &[InventoryRecord], fields: &[String]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(fields)
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    for record in records {
        let row = fields
            .iter()
            .map(|field| export_value(record, field).unwrap_or_default());
        wtr.write_record(row)
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Internal(format!("CSV finalize error: {}", e)))
}

impl ExportService {
    pub fn new(db: PgPool) -> Self {
        Self {
            inventory: InventoryService::new(db),
        }
    }

    /// Only the brand and warehouse selectors narrow an export
    pub async fn export(&self, request: &ExportRequest) -> AppResult<ExportFile> {
        match request.format {
            ExportFormat::Excel => {}
            other => return Err(AppError::UnsupportedExportFormat(other.as_str().to_string())),
        }

        let fields = resolve_fields(&request.fields)?;
        let records: Vec<InventoryRecord> = self
            .inventory
            .all()
            .await?
            .into_iter()
            .filter(|r| request.filters.matches(r))
            .collect();

        let body = render_csv(&records, &fields)?;
        tracing::info!(rows = records.len(), columns = fields.len(), "Rendered inventory export");

        Ok(ExportFile {
            filename: format!("inventory_export_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S")),
            content_type: "text/csv; charset=utf-8",
            body,
            rows: records.len(),
        })
    }
}
