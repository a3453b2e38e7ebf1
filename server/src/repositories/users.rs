use sqlx::SqlitePool;

use crate::models::user::{Role, UpdateUserRequest, User};

const USER_COLUMNS: &str = "id, name, client_id, password_hash, role, avatar";

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY name COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_client_id(
    pool: &SqlitePool,
    client_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE client_id = ?"
    ))
    .bind(client_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    client_id: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (name, client_id, role)
        VALUES (?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(client_id)
    .bind(role)
    .fetch_one(pool)
    .await
}

/// Applies a partial update. Returns `None` when the account does not
/// exist.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    payload: &UpdateUserRequest,
) -> Result<Option<User>, sqlx::Error> {
    let Some(existing) = find_user_by_id(pool, id).await? else {
        return Ok(None);
    };

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = ?, client_id = ?, avatar = ?, role = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(payload.name.as_ref().unwrap_or(&existing.name))
    .bind(payload.client_id.as_ref().or(existing.client_id.as_ref()))
    .bind(payload.avatar.as_ref().or(existing.avatar.as_ref()))
    .bind(payload.role.unwrap_or(existing.role))
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(user))
}

pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
