use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    bus::{
        Channel, ACTIVE_SESSIONS_UPDATED, CLIENT_SESSIONS_STOPPED, SESSION_DELETED, SESSION_ENDED,
        SESSION_STARTED, SESSION_UPDATED,
    },
    error::AppError,
    models::game_session::{
        GameSessionResponse, SessionRecord, SessionsQuery, StartSessionRequest,
        StopAllSessionsRequest,
    },
    repositories::{game_sessions, games},
    state::AppState,
};

async fn record_response(
    state: &AppState,
    session_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<GameSessionResponse>, AppError> {
    Ok(game_sessions::find_record_by_id(&state.pool, session_id)
        .await?
        .map(|record| GameSessionResponse::from_record(record, now)))
}

/// Pushes the full current active list so subscribers never have to diff.
async fn broadcast_active_sessions(state: &AppState) -> Result<(), AppError> {
    let now = Utc::now();
    let active: Vec<GameSessionResponse> = game_sessions::list_active(&state.pool)
        .await?
        .into_iter()
        .map(|record| GameSessionResponse::from_record(record, now))
        .collect();
    state
        .bus
        .publish(Channel::GameSessions, ACTIVE_SESSIONS_UPDATED, &active);
    Ok(())
}

/// Starts a session for a machine, force-ending whatever it was already
/// playing. Auto-ended sessions are announced as updates before the active
/// snapshot goes out.
pub async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<GameSessionResponse>), AppError> {
    payload.validate()?;

    let game = games::find_game_by_id(&state.pool, payload.game_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

    let now = Utc::now();
    let (started, ended) =
        game_sessions::start_session(&state.pool, &payload.client_id, payload.game_id, now).await?;

    let started_response = GameSessionResponse::from_record(
        SessionRecord {
            id: started.id,
            client_id: started.client_id.clone(),
            game_id: started.game_id,
            game_name: game.name.clone(),
            start_time: started.start_time,
            end_time: started.end_time,
            is_active: started.is_active,
        },
        now,
    );

    state
        .bus
        .publish(Channel::GameSessions, SESSION_STARTED, &started_response);
    for session in &ended {
        if let Some(response) = record_response(&state, session.id, now).await? {
            state
                .bus
                .publish(Channel::GameSessions, SESSION_UPDATED, &response);
        }
    }
    broadcast_active_sessions(&state).await?;

    tracing::info!(
        client_id = %payload.client_id,
        game = %game.name,
        auto_ended = ended.len(),
        "Session started"
    );
    Ok((StatusCode::CREATED, Json(started_response)))
}

/// Ends one session. Stopping an already-ended session returns it unchanged
/// and broadcasts nothing.
pub async fn stop_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GameSessionResponse>, AppError> {
    let now = Utc::now();
    let (session, just_stopped) = game_sessions::stop_session(&state.pool, id, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let response = record_response(&state, session.id, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    if just_stopped {
        state
            .bus
            .publish(Channel::GameSessions, SESSION_ENDED, &response);
        broadcast_active_sessions(&state).await?;
    }

    Ok(Json(response))
}

/// Force-ends every active session a machine holds, e.g. when its launcher
/// disconnects.
pub async fn stop_all_sessions(
    State(state): State<AppState>,
    Json(payload): Json<StopAllSessionsRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let now = Utc::now();
    let ended = game_sessions::stop_all_for_client(&state.pool, &payload.client_id, now).await?;
    let stopped = ended.len();

    if stopped > 0 {
        state.bus.publish(
            Channel::GameSessions,
            CLIENT_SESSIONS_STOPPED,
            &json!({ "clientId": payload.client_id, "stopped": stopped }),
        );
        broadcast_active_sessions(&state).await?;
        tracing::info!(client_id = %payload.client_id, stopped, "Client sessions stopped");
    }

    Ok(Json(json!({ "clientId": payload.client_id, "stopped": stopped })))
}

pub async fn active_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameSessionResponse>>, AppError> {
    let now = Utc::now();
    let active = game_sessions::list_active(&state.pool)
        .await?
        .into_iter()
        .map(|record| GameSessionResponse::from_record(record, now))
        .collect();
    Ok(Json(active))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionsQuery>,
) -> Result<Json<Vec<GameSessionResponse>>, AppError> {
    let now = Utc::now();
    let sessions = game_sessions::list_sessions(
        &state.pool,
        query.game_id,
        query.client_id.as_deref(),
        query.limit(),
    )
    .await?
    .into_iter()
    .map(|record| GameSessionResponse::from_record(record, now))
    .collect();
    Ok(Json(sessions))
}

/// Removes a session from the history outright.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = game_sessions::delete_session(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Session not found".to_string()));
    }

    state
        .bus
        .publish(Channel::GameSessions, SESSION_DELETED, &json!({ "id": id }));
    broadcast_active_sessions(&state).await?;

    Ok(StatusCode::NO_CONTENT)
}
