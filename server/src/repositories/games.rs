use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::game::{CreateGameRequest, Game, GameStatus, UpdateGameRequest};

const GAME_COLUMNS: &str = "id, game_id, name, description, icon, logo, header_image, image_card, \
     hero_image, archives, kind, needs_key, executable, executables, install_script, \
     uninstall_script, play_script, status, created_at, updated_at";

fn executables_json(executables: &Option<Vec<String>>) -> String {
    executables
        .as_ref()
        .and_then(|list| serde_json::to_string(list).ok())
        .unwrap_or_else(|| "[]".to_string())
}

pub async fn list_games(pool: &SqlitePool, include_drafts: bool) -> Result<Vec<Game>, sqlx::Error> {
    let sql = if include_drafts {
        format!("SELECT {GAME_COLUMNS} FROM games ORDER BY name COLLATE NOCASE")
    } else {
        format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE status = 'active' ORDER BY name COLLATE NOCASE"
        )
    };
    sqlx::query_as::<_, Game>(&sql).fetch_all(pool).await
}

pub async fn find_game_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Game>, sqlx::Error> {
    sqlx::query_as::<_, Game>(&format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_game_by_game_id(
    pool: &SqlitePool,
    game_id: &str,
) -> Result<Option<Game>, sqlx::Error> {
    sqlx::query_as::<_, Game>(&format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE game_id = ?"
    ))
    .bind(game_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_game(
    pool: &SqlitePool,
    payload: &CreateGameRequest,
    now: DateTime<Utc>,
) -> Result<Game, sqlx::Error> {
    sqlx::query_as::<_, Game>(&format!(
        r#"
        INSERT INTO games
            (game_id, name, description, icon, logo, header_image, image_card, hero_image,
             archives, kind, needs_key, executable, executables, install_script,
             uninstall_script, play_script, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {GAME_COLUMNS}
        "#
    ))
    .bind(&payload.game_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.icon)
    .bind(&payload.logo)
    .bind(&payload.header_image)
    .bind(&payload.image_card)
    .bind(&payload.hero_image)
    .bind(&payload.archives)
    .bind(payload.kind)
    .bind(payload.needs_key)
    .bind(&payload.executable)
    .bind(executables_json(&payload.executables))
    .bind(&payload.install_script)
    .bind(&payload.uninstall_script)
    .bind(&payload.play_script)
    .bind(payload.status)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Applies a partial update on top of the stored row. Returns `None` when
/// the game does not exist.
pub async fn update_game(
    pool: &SqlitePool,
    id: i64,
    payload: &UpdateGameRequest,
    now: DateTime<Utc>,
) -> Result<Option<Game>, sqlx::Error> {
    let Some(existing) = find_game_by_id(pool, id).await? else {
        return Ok(None);
    };

    let executables = match &payload.executables {
        Some(list) => executables_json(&Some(list.clone())),
        None => existing.executables,
    };

    let game = sqlx::query_as::<_, Game>(&format!(
        r#"
        UPDATE games
        SET name = ?, description = ?, icon = ?, logo = ?, header_image = ?, image_card = ?,
            hero_image = ?, archives = ?, kind = ?, needs_key = ?, executable = ?,
            executables = ?, install_script = ?, uninstall_script = ?, play_script = ?,
            status = ?, updated_at = ?
        WHERE id = ?
        RETURNING {GAME_COLUMNS}
        "#
    ))
    .bind(payload.name.as_ref().unwrap_or(&existing.name))
    .bind(payload.description.as_ref().unwrap_or(&existing.description))
    .bind(payload.icon.as_ref().or(existing.icon.as_ref()))
    .bind(payload.logo.as_ref().or(existing.logo.as_ref()))
    .bind(payload.header_image.as_ref().or(existing.header_image.as_ref()))
    .bind(payload.image_card.as_ref().or(existing.image_card.as_ref()))
    .bind(payload.hero_image.as_ref().or(existing.hero_image.as_ref()))
    .bind(payload.archives.as_ref().or(existing.archives.as_ref()))
    .bind(payload.kind.unwrap_or(existing.kind))
    .bind(payload.needs_key.unwrap_or(existing.needs_key))
    .bind(payload.executable.as_ref().or(existing.executable.as_ref()))
    .bind(executables)
    .bind(payload.install_script.as_ref().or(existing.install_script.as_ref()))
    .bind(payload.uninstall_script.as_ref().or(existing.uninstall_script.as_ref()))
    .bind(payload.play_script.as_ref().or(existing.play_script.as_ref()))
    .bind(payload.status.unwrap_or(existing.status))
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(game))
}

pub async fn update_game_status(
    pool: &SqlitePool,
    id: i64,
    status: GameStatus,
    now: DateTime<Utc>,
) -> Result<Option<Game>, sqlx::Error> {
    sqlx::query_as::<_, Game>(&format!(
        r#"
        UPDATE games
        SET status = ?, updated_at = ?
        WHERE id = ?
        RETURNING {GAME_COLUMNS}
        "#
    ))
    .bind(status)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_game(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
