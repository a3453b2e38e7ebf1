use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::game_session::{GameSession, SessionRecord};

const SESSION_COLUMNS: &str = "id, client_id, game_id, start_time, end_time, is_active";

const RECORD_COLUMNS: &str = "s.id, s.client_id, s.game_id, g.name AS game_name, \
     s.start_time, s.end_time, s.is_active";

/// Starts a session for a client, ending whatever it was playing before.
/// Both steps run in one transaction so the single-active-session rule
/// holds even when two starts race.
pub async fn start_session(
    pool: &SqlitePool,
    client_id: &str,
    game_id: i64,
    now: DateTime<Utc>,
) -> Result<(GameSession, Vec<GameSession>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let ended = sqlx::query_as::<_, GameSession>(&format!(
        r#"
        UPDATE game_sessions
        SET end_time = ?, is_active = 0
        WHERE client_id = ? AND is_active = 1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(now)
    .bind(client_id)
    .fetch_all(&mut *tx)
    .await?;

    let started = sqlx::query_as::<_, GameSession>(&format!(
        r#"
        INSERT INTO game_sessions (client_id, game_id, start_time, end_time, is_active)
        VALUES (?, ?, ?, NULL, 1)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(client_id)
    .bind(game_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((started, ended))
}

/// Ends a session. Already-ended sessions are returned unchanged so client
/// retries stay harmless; the flag reports whether this call did the ending.
pub async fn stop_session(
    pool: &SqlitePool,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Option<(GameSession, bool)>, sqlx::Error> {
    let stopped = sqlx::query_as::<_, GameSession>(&format!(
        r#"
        UPDATE game_sessions
        SET end_time = ?, is_active = 0
        WHERE id = ? AND is_active = 1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match stopped {
        Some(session) => Ok(Some((session, true))),
        None => Ok(find_session_by_id(pool, id)
            .await?
            .map(|session| (session, false))),
    }
}

pub async fn stop_all_for_client(
    pool: &SqlitePool,
    client_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<GameSession>, sqlx::Error> {
    sqlx::query_as::<_, GameSession>(&format!(
        r#"
        UPDATE game_sessions
        SET end_time = ?, is_active = 0
        WHERE client_id = ? AND is_active = 1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(now)
    .bind(client_id)
    .fetch_all(pool)
    .await
}

pub async fn find_session_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<GameSession>, sqlx::Error> {
    sqlx::query_as::<_, GameSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_record_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<SessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SessionRecord>(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM game_sessions s
        JOIN games g ON g.id = s.game_id
        WHERE s.id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_active(pool: &SqlitePool) -> Result<Vec<SessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SessionRecord>(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM game_sessions s
        JOIN games g ON g.id = s.game_id
        WHERE s.is_active = 1
        ORDER BY s.start_time DESC, s.id DESC
        "#
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_sessions(
    pool: &SqlitePool,
    game_id: Option<i64>,
    client_id: Option<&str>,
    limit: i64,
) -> Result<Vec<SessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SessionRecord>(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM game_sessions s
        JOIN games g ON g.id = s.game_id
        WHERE (? IS NULL OR s.game_id = ?)
          AND (? IS NULL OR s.client_id = ?)
        ORDER BY s.start_time DESC, s.id DESC
        LIMIT ?
        "#
    ))
    .bind(game_id)
    .bind(game_id)
    .bind(client_id)
    .bind(client_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn delete_session(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM game_sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
