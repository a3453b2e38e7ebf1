use sqlx::SqlitePool;

use crate::models::setting::Setting;

pub async fn list_settings(pool: &SqlitePool) -> Result<Vec<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT id, key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await
}

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT id, key, value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

pub async fn upsert_setting(
    pool: &SqlitePool,
    key: &str,
    value: &str,
) -> Result<Setting, sqlx::Error> {
    sqlx::query_as::<_, Setting>(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        RETURNING id, key, value
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await
}

pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
