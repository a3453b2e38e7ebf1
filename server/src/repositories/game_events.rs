use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::game_event::{EventStatus, GameEvent, UpdateEventRequest};

const EVENT_COLUMNS: &str =
    "id, game_id, game_name, start_time, end_time, status, description, created_at, updated_at";

#[allow(clippy::too_many_arguments)]
pub async fn create_event(
    pool: &SqlitePool,
    game_id: i64,
    game_name: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: Option<&str>,
    now: DateTime<Utc>,
) -> Result<GameEvent, sqlx::Error> {
    sqlx::query_as::<_, GameEvent>(&format!(
        r#"
        INSERT INTO game_events
            (game_id, game_name, start_time, end_time, status, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, 'active', ?, ?, ?)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(game_id)
    .bind(game_name)
    .bind(start_time)
    .bind(end_time)
    .bind(description)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_event_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<GameEvent>, sqlx::Error> {
    sqlx::query_as::<_, GameEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM game_events WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_events(pool: &SqlitePool) -> Result<Vec<GameEvent>, sqlx::Error> {
    sqlx::query_as::<_, GameEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM game_events ORDER BY start_time, id"
    ))
    .fetch_all(pool)
    .await
}

/// Applies a partial update. `game_name` is re-snapshotted by the caller
/// when the game changes. Returns `None` when the event does not exist.
pub async fn update_event(
    pool: &SqlitePool,
    id: i64,
    payload: &UpdateEventRequest,
    game_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<GameEvent>, sqlx::Error> {
    let Some(existing) = find_event_by_id(pool, id).await? else {
        return Ok(None);
    };

    let event = sqlx::query_as::<_, GameEvent>(&format!(
        r#"
        UPDATE game_events
        SET game_id = ?, game_name = ?, start_time = ?, end_time = ?, description = ?,
            updated_at = ?
        WHERE id = ?
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(payload.game_id.unwrap_or(existing.game_id))
    .bind(game_name.unwrap_or(&existing.game_name))
    .bind(payload.start_time.unwrap_or(existing.start_time))
    .bind(payload.end_time.unwrap_or(existing.end_time))
    .bind(payload.description.as_ref().or(existing.description.as_ref()))
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(event))
}

pub async fn set_event_status(
    pool: &SqlitePool,
    id: i64,
    status: EventStatus,
    now: DateTime<Utc>,
) -> Result<Option<GameEvent>, sqlx::Error> {
    sqlx::query_as::<_, GameEvent>(&format!(
        r#"
        UPDATE game_events
        SET status = ?, updated_at = ?
        WHERE id = ?
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(status)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_event(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM game_events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
