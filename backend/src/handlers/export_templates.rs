//! Export template endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ExportTemplateService;
use crate::AppState;
use shared::{ExportTemplate, ExportTemplateInput};

pub async fn list_templates(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ExportTemplate>>> {
    let service = ExportTemplateService::new(state.db);
    Ok(Json(service.list().await?))
}

pub async fn create_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ExportTemplateInput>,
) -> AppResult<(StatusCode, Json<ExportTemplate>)> {
    let service = ExportTemplateService::new(state.db);
    let template = service.create(input, &current_user.0.email).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let service = ExportTemplateService::new(state.db);
    service
        .delete(&id, &current_user.0.email, current_user.0.role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
