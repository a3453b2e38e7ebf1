use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::setting::{Setting, UpsertSettingRequest},
    repositories::settings,
    state::AppState,
};

pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<Setting>>, AppError> {
    let settings = settings::list_settings(&state.pool).await?;
    Ok(Json(settings))
}

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    let setting = settings::get_setting(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))?;
    Ok(Json(setting))
}

/// Creates or replaces a setting under the key from the path.
pub async fn upsert_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<Json<Setting>, AppError> {
    payload.validate()?;
    let setting = settings::upsert_setting(&state.pool, &key, &payload.value).await?;
    Ok(Json(setting))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = settings::delete_setting(&state.pool, &key).await?;
    if !deleted {
        return Err(AppError::NotFound("Setting not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
