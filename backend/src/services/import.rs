//! CSV import: parse rows, validate each one, upsert by (sku, warehouse)

use chrono::Utc;
use sqlx::PgPool;

use crate::config::InventoryConfig;
use crate::error::{AppError, AppResult};
use crate::services::inventory::{InventoryService, UpsertOutcome};
use shared::{parse_record_form, validate_input, ImportReport, InventoryInput, RecordForm};

/// Row number of the first data row; the header is row 1
const FIRST_DATA_ROW: i64 = 2;

#[derive(Clone)]
pub struct ImportService {
    inventory: InventoryService,
    default_low_stock_threshold: i32,
    max_rows: usize,
}

/// One data row of an import file
#[derive(Debug)]
pub struct ImportRow {
    pub row: i64,
    pub form: Result<RecordForm, String>,
}

/// Header as written in the file to the form field name: `Selling Price` -> `selling_price`
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Split CSV bytes into numbered rows
///
/// A file that is not CSV at all fails as a whole; a single malformed row
/// only fails that row.
pub fn parse_csv(bytes: &[u8]) -> AppResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::validation("file", format!("Unreadable CSV header: {}", e)))?
        .iter()
        .map(normalize_header)
        .collect::<csv::StringRecord>();

    if !headers.iter().any(|h| h == "sku") {
        return Err(AppError::validation("file", "CSV header must include a 'sku' column"));
    }
    reader.set_headers(headers.clone());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = FIRST_DATA_ROW + index as i64;
        let form = result
            .and_then(|record| record.deserialize::<RecordForm>(Some(&headers)))
            .map_err(|e| format!("Malformed row: {}", e));
        rows.push(ImportRow { row, form });
    }
    Ok(rows)
}

/// Validated create payload for one row, or the message reported for it
pub fn row_input(form: &RecordForm, default_threshold: i32) -> Result<InventoryInput, String> {
    let mut input = parse_record_form(form).map_err(|e| e.to_string())?;
    input.low_stock_threshold.get_or_insert(default_threshold);
    validate_input(&input).map_err(|e| e.to_string())?;
    Ok(input)
}

/// Count one upsert result into the report
///
/// Database failures are reported against their row like validation
/// failures, so rows already written are never left out of the report.
pub fn tally(report: &mut ImportReport, row: i64, outcome: AppResult<UpsertOutcome>) {
    match outcome {
        Ok(UpsertOutcome::Inserted) => report.inserted += 1,
        Ok(UpsertOutcome::Updated) => report.updated += 1,
        Err(AppError::DatabaseError(e)) => {
            tracing::error!(row, error = %e, "Import row could not be saved");
            report.record_failure(row, "Database error while saving row");
        }
        Err(other) => report.record_failure(row, other.to_string()),
    }
}

impl ImportService {
    pub fn new(db: PgPool, config: &InventoryConfig) -> Self {
        Self {
            inventory: InventoryService::new(db),
            default_low_stock_threshold: config.default_low_stock_threshold,
            max_rows: config.import_max_rows,
        }
    }

    /// Import a CSV file
    ///
    /// Rows that fail validation or storage are listed in the report and
    /// skipped; the rest are applied.
    pub async fn import_csv(&self, bytes: &[u8], actor: &str) -> AppResult<ImportReport> {
        let rows = parse_csv(bytes)?;
        if rows.len() > self.max_rows {
            return Err(AppError::validation(
                "file",
                format!("Import is limited to {} rows, file has {}", self.max_rows, rows.len()),
            ));
        }

        let now = Utc::now();
        let mut report = ImportReport {
            total_rows: rows.len() as i64,
            ..Default::default()
        };

        for ImportRow { row, form } in rows {
            let input = match form.and_then(|f| row_input(&f, self.default_low_stock_threshold)) {
                Ok(input) => input,
                Err(message) => {
                    report.record_failure(row, message);
                    continue;
                }
            };

            let outcome = self.inventory.upsert(input, actor, now).await;
            tally(&mut report, row, outcome);
        }

        tracing::info!(
            inserted = report.inserted,
            updated = report.updated,
            failed = report.failed,
            total = report.total_rows,
            "Import finished"
        );
        Ok(report)
    }
}
