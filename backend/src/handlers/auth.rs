//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::RegisterInput;
use crate::services::AuthService;
use crate::AppState;
use shared::{AuthToken, User};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let service = AuthService::new(state.db, &state.config);
    let user = service.register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthToken>> {
    let service = AuthService::new(state.db, &state.config);
    let token = service.login(&body.email, &body.password).await?;
    Ok(Json(token))
}

/// The account behind the bearer token
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state.db, &state.config);
    let user = service.current_user(current_user.0.user_id).await?;
    Ok(Json(user))
}
