use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{models::user::Role, state::AppState, utils::jwt};

/// Identity attached to every request before routing decisions are made.
///
/// Requests without a usable bearer token run as a guest instead of being
/// rejected, so public routes stay reachable from unauthenticated launchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn guest() -> Self {
        Self {
            name: "guest".to_string(),
            role: Role::Guest,
        }
    }
}

/// Resolves the caller identity from the `Authorization` header and stores it
/// as a request extension. Invalid or expired tokens degrade to guest.
pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = bearer_token(request.headers())
        .and_then(|token| jwt::verify_token(token, &state.config.jwt_secret).ok())
        .and_then(|claims| {
            let role = Role::parse(&claims.role)?;
            Some(Principal {
                name: claims.sub,
                role,
            })
        })
        .unwrap_or_else(Principal::guest);

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    parse_bearer_token(header)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(rest) = header.strip_prefix("bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}
