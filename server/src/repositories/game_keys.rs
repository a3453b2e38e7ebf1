use sqlx::SqlitePool;

use crate::models::game_key::GameKey;

const KEY_COLUMNS: &str = "id, key, game_id, ip_address, client_id";

pub async fn list_keys_for_game(
    pool: &SqlitePool,
    game_id: i64,
) -> Result<Vec<GameKey>, sqlx::Error> {
    sqlx::query_as::<_, GameKey>(&format!(
        "SELECT {KEY_COLUMNS} FROM game_keys WHERE game_id = ? ORDER BY id"
    ))
    .bind(game_id)
    .fetch_all(pool)
    .await
}

/// Inserts a batch of keys for one game. Runs in a transaction so a
/// duplicate anywhere in the batch leaves the pool untouched.
pub async fn create_keys(
    pool: &SqlitePool,
    game_id: i64,
    keys: &[String],
) -> Result<Vec<GameKey>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(keys.len());

    for key in keys {
        let row = sqlx::query_as::<_, GameKey>(&format!(
            r#"
            INSERT INTO game_keys (key, game_id, ip_address, client_id)
            VALUES (?, ?, '', NULL)
            RETURNING {KEY_COLUMNS}
            "#
        ))
        .bind(key)
        .bind(game_id)
        .fetch_one(&mut *tx)
        .await?;
        created.push(row);
    }

    tx.commit().await?;
    Ok(created)
}

/// Returns the key this client already holds for the game, if any.
pub async fn find_held_key(
    pool: &SqlitePool,
    game_id: i64,
    client_id: &str,
) -> Result<Option<GameKey>, sqlx::Error> {
    sqlx::query_as::<_, GameKey>(&format!(
        "SELECT {KEY_COLUMNS} FROM game_keys WHERE game_id = ? AND client_id = ?"
    ))
    .bind(game_id)
    .bind(client_id)
    .fetch_optional(pool)
    .await
}

/// Claims the lowest-numbered free key for the game. The guard on the
/// holder columns makes the claim a compare-and-set: when two clients race
/// for the last key, one statement matches zero rows and returns `None`.
pub async fn claim_next_key(
    pool: &SqlitePool,
    game_id: i64,
    client_id: &str,
    ip_address: &str,
) -> Result<Option<GameKey>, sqlx::Error> {
    sqlx::query_as::<_, GameKey>(&format!(
        r#"
        UPDATE game_keys
        SET ip_address = ?, client_id = ?
        WHERE id = (
            SELECT id FROM game_keys
            WHERE game_id = ? AND ip_address = '' AND client_id IS NULL
            ORDER BY id
            LIMIT 1
        )
          AND ip_address = '' AND client_id IS NULL
        RETURNING {KEY_COLUMNS}
        "#
    ))
    .bind(ip_address)
    .bind(client_id)
    .bind(game_id)
    .fetch_optional(pool)
    .await
}

/// Clears every key the client holds for the game. Safe to call when the
/// client holds nothing.
pub async fn release_keys(
    pool: &SqlitePool,
    game_id: i64,
    client_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE game_keys
        SET ip_address = '', client_id = NULL
        WHERE game_id = ? AND client_id = ?
        "#,
    )
    .bind(game_id)
    .bind(client_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_key(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM game_keys WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
