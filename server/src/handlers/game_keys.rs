use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::game_key::{CreateKeysRequest, GameKey, KeyClientRequest, ReleaseResponse},
    repositories::{self, game_keys, games},
    state::AppState,
};

async fn ensure_game_exists(state: &AppState, game_id: i64) -> Result<(), AppError> {
    games::find_game_by_id(&state.pool, game_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
    Ok(())
}

pub async fn list_keys(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Vec<GameKey>>, AppError> {
    ensure_game_exists(&state, game_id).await?;
    let keys = game_keys::list_keys_for_game(&state.pool, game_id).await?;
    Ok(Json(keys))
}

pub async fn create_keys(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
    Json(payload): Json<CreateKeysRequest>,
) -> Result<(StatusCode, Json<Vec<GameKey>>), AppError> {
    payload.validate()?;
    ensure_game_exists(&state, game_id).await?;

    let keys = game_keys::create_keys(&state.pool, game_id, &payload.keys)
        .await
        .map_err(|err| {
            if repositories::is_unique_violation(&err) {
                AppError::Conflict("One or more keys already exist".to_string())
            } else {
                err.into()
            }
        })?;

    tracing::info!(game_id, count = keys.len(), "License keys added");
    Ok((StatusCode::CREATED, Json(keys)))
}

pub async fn delete_key(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = game_keys::delete_key(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Key not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Hands a free key to the calling machine. A machine that already holds a
/// key for the game gets the same key back, so launcher retries are safe.
/// When the pool is exhausted the caller gets a 404.
pub async fn reserve_key(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(game_id): Path<i64>,
    Json(payload): Json<KeyClientRequest>,
) -> Result<Json<GameKey>, AppError> {
    payload.validate()?;
    ensure_game_exists(&state, game_id).await?;

    if let Some(held) = game_keys::find_held_key(&state.pool, game_id, &payload.client_id).await? {
        return Ok(Json(held));
    }

    let ip = addr.ip().to_string();
    let claimed = game_keys::claim_next_key(&state.pool, game_id, &payload.client_id, &ip)
        .await?
        .ok_or_else(|| AppError::NotFound("No available keys".to_string()))?;

    tracing::info!(game_id, client_id = %payload.client_id, "License key reserved");
    Ok(Json(claimed))
}

/// Returns every key the machine holds for the game to the pool. Releasing
/// when nothing is held is not an error; the count says what happened.
pub async fn release_keys(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
    Json(payload): Json<KeyClientRequest>,
) -> Result<Json<ReleaseResponse>, AppError> {
    payload.validate()?;
    ensure_game_exists(&state, game_id).await?;

    let released = game_keys::release_keys(&state.pool, game_id, &payload.client_id).await?;
    if released > 0 {
        tracing::info!(game_id, client_id = %payload.client_id, released, "License keys released");
    }
    Ok(Json(ReleaseResponse { released }))
}
