use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    bus::{
        Channel, EVENTS_LIST_UPDATED, EVENT_CREATED, EVENT_DELETED, EVENT_STATUS_UPDATED,
        EVENT_UPDATED,
    },
    error::AppError,
    models::game_event::{
        CreateEventRequest, GameEventResponse, UpdateEventRequest, UpdateEventStatusRequest,
    },
    repositories::{game_events, games},
    state::AppState,
};

/// Pushes the whole schedule so subscribers can re-render without diffing.
async fn broadcast_events_list(state: &AppState) -> Result<(), AppError> {
    let now = Utc::now();
    let events: Vec<GameEventResponse> = game_events::list_events(&state.pool)
        .await?
        .into_iter()
        .map(|event| GameEventResponse::from_event(event, now))
        .collect();
    state
        .bus
        .publish(Channel::GameEvents, EVENTS_LIST_UPDATED, &events);
    Ok(())
}

/// Schedules an event, snapshotting the game's display name so later catalog
/// deletions don't blank the schedule.
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<GameEventResponse>), AppError> {
    payload.validate()?;
    if payload.end_time <= payload.start_time {
        return Err(AppError::BadRequest(
            "endTime must be after startTime".to_string(),
        ));
    }

    let game = games::find_game_by_id(&state.pool, payload.game_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

    let now = Utc::now();
    let event = game_events::create_event(
        &state.pool,
        payload.game_id,
        &game.name,
        payload.start_time,
        payload.end_time,
        payload.description.as_deref(),
        now,
    )
    .await?;
    let response = GameEventResponse::from_event(event, now);

    state
        .bus
        .publish(Channel::GameEvents, EVENT_CREATED, &response);
    broadcast_events_list(&state).await?;

    tracing::info!(game = %game.name, event_id = response.id, "Event scheduled");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameEventResponse>>, AppError> {
    let now = Utc::now();
    let events = game_events::list_events(&state.pool)
        .await?
        .into_iter()
        .map(|event| GameEventResponse::from_event(event, now))
        .collect();
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GameEventResponse>, AppError> {
    let event = game_events::find_event_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(Json(GameEventResponse::from_event(event, Utc::now())))
}

/// Partial update. The merged time window is re-validated, and pointing the
/// event at another game re-snapshots the name.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<GameEventResponse>, AppError> {
    payload.validate()?;

    let existing = game_events::find_event_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let start = payload.start_time.unwrap_or(existing.start_time);
    let end = payload.end_time.unwrap_or(existing.end_time);
    if end <= start {
        return Err(AppError::BadRequest(
            "endTime must be after startTime".to_string(),
        ));
    }

    let mut game_name: Option<String> = None;
    if let Some(game_id) = payload.game_id {
        if game_id != existing.game_id {
            let game = games::find_game_by_id(&state.pool, game_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
            game_name = Some(game.name);
        }
    }

    let now = Utc::now();
    let event = game_events::update_event(&state.pool, id, &payload, game_name.as_deref(), now)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let response = GameEventResponse::from_event(event, now);

    state
        .bus
        .publish(Channel::GameEvents, EVENT_UPDATED, &response);
    broadcast_events_list(&state).await?;

    Ok(Json(response))
}

/// Sets the stored lifecycle status. Cancellation overrides whatever the
/// schedule would otherwise derive.
pub async fn update_event_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventStatusRequest>,
) -> Result<Json<GameEventResponse>, AppError> {
    let now = Utc::now();
    let event = game_events::set_event_status(&state.pool, id, payload.status, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let response = GameEventResponse::from_event(event, now);

    state
        .bus
        .publish(Channel::GameEvents, EVENT_STATUS_UPDATED, &response);
    broadcast_events_list(&state).await?;

    Ok(Json(response))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = game_events::delete_event(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    state
        .bus
        .publish(Channel::GameEvents, EVENT_DELETED, &json!({ "id": id }));
    broadcast_events_list(&state).await?;

    Ok(StatusCode::NO_CONTENT)
}
