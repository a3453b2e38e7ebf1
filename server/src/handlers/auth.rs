use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::auth::Principal,
    models::user::{LoginRequest, LoginResponse, MeResponse, Role},
    permissions,
    state::AppState,
    utils::{jwt, password},
};

/// Admin console login. There is exactly one admin account whose password
/// comes from the environment; everything else authenticates as a guest.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let matches = password::verify_password(&payload.password, state.admin_password_hash())?;
    if !matches {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let (token, expires_at) = jwt::issue_token(
        "admin".to_string(),
        Role::Admin.as_str().to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    tracing::info!("Admin login succeeded");
    Ok(Json(LoginResponse {
        token,
        expires_at,
        role: Role::Admin,
    }))
}

/// Reports the caller's resolved identity and granted permissions.
/// Anonymous callers see the guest grant set rather than an error.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    let permissions = permissions::role_permissions(principal.role)
        .iter()
        .map(|p| (*p).to_string())
        .collect();

    Json(MeResponse {
        name: principal.name,
        role: principal.role,
        permissions,
    })
}
