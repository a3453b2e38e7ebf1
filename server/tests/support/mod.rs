#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use lan_nexus_server::{
    config::Config,
    db::create_pool_in_memory,
    models::game::{CreateGameRequest, Game, GameKind, GameStatus},
    models::user::Role,
    repositories::games,
    router::build_router,
    state::AppState,
    utils::jwt::issue_token,
};
use serde_json::Value;

pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";
pub const JWT_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        http_port: 8080,
        database_path: ":memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 12,
        admin_password: ADMIN_PASSWORD.to_string(),
        discovery_port: 50000,
        steam_api_key: String::new(),
        steam_user_id: String::new(),
        update_feed_repo: "Lan-Nexus/Client".to_string(),
    }
}

pub async fn test_state() -> AppState {
    let pool = create_pool_in_memory().await.expect("in-memory pool");
    AppState::new(pool, test_config()).expect("build state")
}

/// The full application router plus the state behind it, so tests can seed
/// the database and subscribe to the bus directly.
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (build_router(state.clone()), state)
}

pub fn admin_token(state: &AppState) -> String {
    let (token, _expires_at) = issue_token(
        "admin".to_string(),
        Role::Admin.as_str().to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )
    .expect("issue token");
    token
}

pub fn user_token(state: &AppState, name: &str) -> String {
    let (token, _expires_at) = issue_token(
        name.to_string(),
        Role::User.as_str().to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )
    .expect("issue token");
    token
}

/// Request builder that mirrors what the real listener provides: a JSON
/// body when given one and a peer address in the extensions.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    request_from(method, uri, token, body, ([127, 0, 0, 1], 40000).into())
}

pub fn request_from(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    peer: SocketAddr,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let mut request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Seeds one ready-to-play game and returns it.
pub async fn seed_game(state: &AppState, game_id: &str, name: &str) -> Game {
    let request = CreateGameRequest {
        game_id: game_id.to_string(),
        name: name.to_string(),
        description: String::new(),
        icon: None,
        logo: None,
        header_image: None,
        image_card: None,
        hero_image: None,
        archives: None,
        kind: GameKind::Archive,
        needs_key: false,
        executable: None,
        executables: None,
        install_script: None,
        uninstall_script: None,
        play_script: None,
        status: GameStatus::Active,
    };
    games::create_game(&state.pool, &request, Utc::now())
        .await
        .expect("seed game")
}
