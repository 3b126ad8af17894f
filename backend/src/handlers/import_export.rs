//! CSV import and export endpoints

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::{ExportService, ImportService};
use crate::AppState;
use shared::{ExportRequest, ImportReport};

const FILE_FIELD: &str = "file";

/// Multipart upload with the CSV in the `file` field
pub async fn import_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportReport>> {
    current_user.0.require_write()?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("file", format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation("file", format!("Could not read upload: {}", e)))?;
            file = Some(bytes);
            break;
        }
    }
    let bytes = file.ok_or_else(|| AppError::validation("file", "No file uploaded"))?;

    let service = ImportService::new(state.db, &state.config.inventory);
    let report = service.import_csv(&bytes, &current_user.0.email).await?;
    Ok(Json(report))
}

/// Render the export and send it as an attachment
pub async fn export_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<ExportRequest>,
) -> AppResult<Response> {
    let service = ExportService::new(state.db);
    let file = service.export(&request).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}
