use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::auth::Principal,
    models::user::{RegisterUserRequest, Role, UpdateUserRequest, User},
    repositories::{self, users},
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = users::list_users(&state.pool).await?;
    Ok(Json(users))
}

/// Launcher self-registration. New accounts always come in as plain users;
/// a machine identifier can only ever belong to one account.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;

    let user = users::create_user(&state.pool, &payload.name, &payload.client_id, Role::User)
        .await
        .map_err(|err| {
            if repositories::is_unique_violation(&err) {
                AppError::Conflict("A user with this name or clientId already exists".to_string())
            } else {
                err.into()
            }
        })?;

    tracing::info!(name = %user.name, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = users::find_user_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn get_user_by_client_id(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = users::find_user_by_client_id(&state.pool, &client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

async fn apply_user_update(
    state: &AppState,
    id: i64,
    payload: &UpdateUserRequest,
) -> Result<User, AppError> {
    users::update_user(&state.pool, id, payload)
        .await
        .map_err(|err| {
            if repositories::is_unique_violation(&err) {
                AppError::Conflict("A user with this name or clientId already exists".to_string())
            } else {
                err.into()
            }
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Partial account update. Role changes stay an admin-only affair no matter
/// which permission let the caller in.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;
    if payload.role.is_some() && principal.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins can change roles".to_string(),
        ));
    }

    let user = apply_user_update(&state, id, &payload).await?;
    Ok(Json(user))
}

/// Self-service update addressed by machine identifier. Restricted to the
/// profile fields a launcher may touch.
pub async fn update_user_by_client_id(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let user = users::find_user_by_client_id(&state.pool, &client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let filtered = UpdateUserRequest {
        name: payload.name,
        avatar: payload.avatar,
        client_id: None,
        role: None,
    };
    let user = apply_user_update(&state, user.id, &filtered).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = users::delete_user(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
