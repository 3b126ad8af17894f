//! HTTP handlers for inventory records

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{InventoryService, ListInventoryQuery};
use crate::AppState;
use shared::{
    BrandWarehouses, FilterOptions, InventoryInput, InventoryPatch, InventoryRecord,
    InventoryStats, VariantBatch,
};

/// List records, newest first
pub async fn list_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListInventoryQuery>,
) -> AppResult<Json<Vec<InventoryRecord>>> {
    let service = InventoryService::new(state.db);
    let records = service.list(&query).await?;
    Ok(Json(records))
}

pub async fn get_filter_options(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<FilterOptions>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.filter_options().await?))
}

pub async fn get_brand_warehouses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<BrandWarehouses>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.brand_warehouses().await?))
}

pub async fn get_stats_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<InventoryStats>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.stats().await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InventoryRecord>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.get(id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<InventoryInput>,
) -> AppResult<(StatusCode, Json<InventoryRecord>)> {
    current_user.0.require_write()?;
    let service = InventoryService::new(state.db);
    let record = service.create(input, &current_user.0.email).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Create one record per size in the batch
pub async fn create_variants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(batch): Json<VariantBatch>,
) -> AppResult<(StatusCode, Json<Vec<InventoryRecord>>)> {
    current_user.0.require_write()?;
    let service = InventoryService::new(state.db);
    let records = service.create_variants(batch, &current_user.0.email).await?;
    Ok((StatusCode::CREATED, Json(records)))
}

pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<InventoryPatch>,
) -> AppResult<Json<InventoryRecord>> {
    current_user.0.require_write()?;
    let service = InventoryService::new(state.db);
    let record = service.update(id, patch, &current_user.0.email).await?;
    Ok(Json(record))
}

pub async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    current_user.0.require_delete()?;
    let service = InventoryService::new(state.db);
    service.delete(id).await?;
    tracing::info!(%id, by = %current_user.0.email, "Deleted inventory item");
    Ok(StatusCode::NO_CONTENT)
}
