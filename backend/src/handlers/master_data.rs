//! Master data endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::master_data::{CategoryInput, MasterDataService, ProductNameInput};
use crate::AppState;
use shared::{MasterData, MasterDataKind, ProductHierarchy};

#[derive(Deserialize)]
pub struct ValueBody {
    pub value: String,
}

fn parse_kind(kind: &str) -> AppResult<MasterDataKind> {
    MasterDataKind::parse(kind)
        .ok_or_else(|| AppError::NotFound(format!("Master data list '{}'", kind)))
}

pub async fn get_master_data(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<MasterData>> {
    let service = MasterDataService::new(state.db);
    Ok(Json(service.get().await?))
}

pub async fn add_value(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(kind): Path<String>,
    Json(body): Json<ValueBody>,
) -> AppResult<Json<Vec<String>>> {
    current_user.0.require_write()?;
    let kind = parse_kind(&kind)?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.add(kind, &body.value).await?))
}

pub async fn rename_value(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((kind, value)): Path<(String, String)>,
    Json(body): Json<ValueBody>,
) -> AppResult<Json<Vec<String>>> {
    current_user.0.require_write()?;
    let kind = parse_kind(&kind)?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.rename(kind, &value, &body.value).await?))
}

pub async fn remove_value(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((kind, value)): Path<(String, String)>,
) -> AppResult<Json<Vec<String>>> {
    current_user.0.require_delete()?;
    let kind = parse_kind(&kind)?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.remove(kind, &value).await?))
}

pub async fn add_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<ProductHierarchy>> {
    current_user.0.require_write()?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.add_category(input).await?))
}

pub async fn remove_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<ProductHierarchy>> {
    current_user.0.require_delete()?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.remove_category(input).await?))
}

pub async fn add_product_name(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProductNameInput>,
) -> AppResult<Json<ProductHierarchy>> {
    current_user.0.require_write()?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.add_product_name(input).await?))
}

pub async fn remove_product_name(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProductNameInput>,
) -> AppResult<Json<ProductHierarchy>> {
    current_user.0.require_delete()?;
    let service = MasterDataService::new(state.db);
    Ok(Json(service.remove_product_name(input).await?))
}
