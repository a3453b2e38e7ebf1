use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    middleware::auth::Principal,
    permissions::{self, Require},
};

/// Route guard that rejects callers whose role does not satisfy `rule`.
///
/// Layered per route group with `middleware::from_fn_with_state(rule, permit)`,
/// always inside the [`identify`](super::auth::identify) layer so the principal
/// extension is present. A request with no principal is treated as a guest.
pub async fn permit(
    State(rule): State<Require>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = request
        .extensions()
        .get::<Principal>()
        .map(|principal| principal.role)
        .unwrap_or(crate::models::user::Role::Guest);

    if !permissions::check(role, &rule) {
        return Err(AppError::Forbidden(format!(
            "Missing permission: {}",
            permissions::describe(&rule)
        )));
    }

    Ok(next.run(request).await)
}
