use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::game::{CreateGameRequest, Game, GameKind, GameStatus},
    repositories::{self, games},
    services::steam::OwnedGame,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
/// Payload selecting which owned app to import.
pub struct ImportSteamGameRequest {
    pub appid: i64,
}

/// Lists the configured house account's Steam library.
pub async fn list_owned_games(
    State(state): State<AppState>,
) -> Result<Json<Vec<OwnedGame>>, AppError> {
    let games = state.steam.owned_games().await?;
    Ok(Json(games))
}

/// Imports one Steam app as a draft catalog entry. Name and description come
/// from the storefront; artwork is linked straight to the Steam CDN.
pub async fn import_game(
    State(state): State<AppState>,
    Json(payload): Json<ImportSteamGameRequest>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    let game_id = payload.appid.to_string();
    if games::find_game_by_game_id(&state.pool, &game_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Game already added".to_string()));
    }

    let details = state.steam.app_details(payload.appid).await?;
    let artwork = state.steam.artwork(payload.appid).await;

    let request = CreateGameRequest {
        game_id,
        name: details.name,
        description: details.detailed_description,
        icon: artwork.icon,
        logo: Some(artwork.logo),
        header_image: Some(artwork.header_image),
        image_card: Some(artwork.image_card),
        hero_image: Some(artwork.hero_image),
        archives: None,
        kind: GameKind::Steam,
        needs_key: false,
        executable: None,
        executables: None,
        install_script: None,
        uninstall_script: None,
        play_script: None,
        status: GameStatus::Draft,
    };

    let game = games::create_game(&state.pool, &request, Utc::now())
        .await
        .map_err(|err| {
            if repositories::is_unique_violation(&err) {
                AppError::Conflict("Game already added".to_string())
            } else {
                err.into()
            }
        })?;

    tracing::info!(appid = payload.appid, name = %game.name, "Steam game imported");
    Ok((StatusCode::CREATED, Json(game)))
}
