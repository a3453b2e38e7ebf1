use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    middleware::auth::Principal,
    models::{
        game::{CreateGameRequest, Game, UpdateGameRequest, UpdateGameStatusRequest},
        user::Role,
    },
    repositories::{self, games},
    state::AppState,
};

/// Lists the catalog. Drafts stay hidden from everyone but admins.
pub async fn list_games(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Game>>, AppError> {
    let include_drafts = principal.role == Role::Admin;
    let games = games::list_games(&state.pool, include_drafts).await?;
    Ok(Json(games))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Game>, AppError> {
    let game = games::find_game_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
    Ok(Json(game))
}

pub async fn create_game(
    State(state): State<AppState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    payload.validate()?;

    let game = games::create_game(&state.pool, &payload, Utc::now())
        .await
        .map_err(|err| {
            if repositories::is_unique_violation(&err) {
                AppError::Conflict("A game with this gameId already exists".to_string())
            } else {
                err.into()
            }
        })?;

    tracing::info!(game_id = %game.game_id, "Game created");
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateGameRequest>,
) -> Result<Json<Game>, AppError> {
    payload.validate()?;

    let game = games::update_game(&state.pool, id, &payload, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
    Ok(Json(game))
}

/// Flips a catalog entry between draft and active.
pub async fn update_game_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateGameStatusRequest>,
) -> Result<Json<Game>, AppError> {
    let game = games::update_game_status(&state.pool, id, payload.status, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
    Ok(Json(game))
}

/// Removes a catalog entry; its key pool goes with it.
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = games::delete_game(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Game not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
