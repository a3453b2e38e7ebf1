use axum::http::{Method, StatusCode};
use lan_nexus_server::bus::Channel;
use serde_json::json;
use tower::ServiceExt;

mod support;

async fn start_session(
    app: &axum::Router,
    game_id: i64,
    client_id: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(support::request(
            Method::POST,
            "/api/sessions/start",
            None,
            Some(json!({ "gameId": game_id, "clientId": client_id })),
        ))
        .await
        .expect("start session")
}

#[tokio::test]
async fn starting_twice_auto_ends_the_first_session() {
    let (app, state) = support::test_app().await;
    let quake = support::seed_game(&state, "3001", "Quake III").await;
    let doom = support::seed_game(&state, "3002", "Doom II").await;

    let first = start_session(&app, quake.id, "machine-a").await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = support::response_json(first).await;
    assert_eq!(first["isActive"], true);

    let second = start_session(&app, doom.id, "machine-a").await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second = support::response_json(second).await;
    assert_eq!(second["gameName"], "Doom II");

    // Exactly one session is still active for the machine.
    let response = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/sessions/active",
            None,
            None,
        ))
        .await
        .expect("active list");
    let active = support::response_json(response).await;
    let active = active.as_array().expect("array");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second["id"]);

    // The first one is closed with an end time.
    let response = app
        .oneshot(support::request(
            Method::GET,
            "/api/sessions?clientId=machine-a",
            None,
            None,
        ))
        .await
        .expect("history");
    let history = support::response_json(response).await;
    let closed = history
        .as_array()
        .expect("array")
        .iter()
        .find(|s| s["id"] == first["id"])
        .expect("first session in history")
        .clone();
    assert_eq!(closed["isActive"], false);
    assert!(closed["endTime"].as_str().is_some());
}

#[tokio::test]
async fn stopping_twice_returns_the_row_unchanged() {
    let (app, state) = support::test_app().await;
    let game = support::seed_game(&state, "3003", "Tetris").await;

    let started = start_session(&app, game.id, "machine-a").await;
    let started = support::response_json(started).await;
    let id = started["id"].as_i64().expect("id");

    let stop = |app: &axum::Router| {
        app.clone().oneshot(support::request(
            Method::POST,
            &format!("/api/sessions/{id}/stop"),
            None,
            None,
        ))
    };

    let response = stop(&app).await.expect("stop");
    assert_eq!(response.status(), StatusCode::OK);
    let stopped = support::response_json(response).await;
    assert_eq!(stopped["isActive"], false);
    let end_time = stopped["endTime"].as_str().expect("endTime").to_string();

    let mut rx = state.bus.subscribe(Channel::GameSessions);
    let response = stop(&app).await.expect("stop again");
    assert_eq!(response.status(), StatusCode::OK);
    let again = support::response_json(response).await;
    assert_eq!(again["endTime"].as_str(), Some(end_time.as_str()));

    // The idempotent stop broadcast nothing.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn full_play_cycle_broadcasts_in_order() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "3004", "Left 4 Dead 2").await;

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            &format!("/api/games/{}/keys", game.id),
            Some(&token),
            Some(json!({ "keys": ["GGGG-0001"] })),
        ))
        .await
        .expect("seed keys");
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut rx = state.bus.subscribe(Channel::GameSessions);

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            &format!("/api/games/{}/keys/reserve", game.id),
            None,
            Some(json!({ "clientId": "machine-a" })),
        ))
        .await
        .expect("reserve");
    assert_eq!(response.status(), StatusCode::OK);

    let started = start_session(&app, game.id, "machine-a").await;
    let started = support::response_json(started).await;
    let id = started["id"].as_i64().expect("id");

    let envelope = rx.recv().await.expect("started envelope");
    assert_eq!(envelope.event, "session_started");
    assert_eq!(envelope.data["id"], id);
    let envelope = rx.recv().await.expect("snapshot envelope");
    assert_eq!(envelope.event, "active_sessions_updated");
    assert_eq!(envelope.data.as_array().expect("array").len(), 1);

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            &format!("/api/sessions/{id}/stop"),
            None,
            None,
        ))
        .await
        .expect("stop");
    assert_eq!(response.status(), StatusCode::OK);
    let stopped = support::response_json(response).await;
    assert!(stopped["durationSeconds"].as_i64().expect("duration") >= 0);

    let envelope = rx.recv().await.expect("ended envelope");
    assert_eq!(envelope.event, "session_ended");
    let envelope = rx.recv().await.expect("snapshot envelope");
    assert_eq!(envelope.event, "active_sessions_updated");
    assert!(envelope.data.as_array().expect("array").is_empty());

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            &format!("/api/games/{}/keys/release", game.id),
            None,
            Some(json!({ "clientId": "machine-a" })),
        ))
        .await
        .expect("release");
    let body = support::response_json(response).await;
    assert_eq!(body["released"], 1);

    // The key is free for the next machine.
    let response = app
        .oneshot(support::request(
            Method::POST,
            &format!("/api/games/{}/keys/reserve", game.id),
            None,
            Some(json!({ "clientId": "machine-b" })),
        ))
        .await
        .expect("re-reserve");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stop_all_ends_every_session_of_the_machine() {
    let (app, state) = support::test_app().await;
    let game = support::seed_game(&state, "3005", "Trackmania").await;

    start_session(&app, game.id, "machine-a").await;
    start_session(&app, game.id, "machine-b").await;

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            "/api/sessions/stop-all",
            None,
            Some(json!({ "clientId": "machine-a" })),
        ))
        .await
        .expect("stop all");
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::response_json(response).await;
    assert_eq!(body["clientId"], "machine-a");
    assert_eq!(body["stopped"], 1);

    // machine-b is untouched.
    let response = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/sessions/active",
            None,
            None,
        ))
        .await
        .expect("active list");
    let active = support::response_json(response).await;
    let active = active.as_array().expect("array");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["clientId"], "machine-b");

    // Nothing left to stop; no broadcast for the no-op.
    let mut rx = state.bus.subscribe(Channel::GameSessions);
    let response = app
        .oneshot(support::request(
            Method::POST,
            "/api/sessions/stop-all",
            None,
            Some(json!({ "clientId": "machine-a" })),
        ))
        .await
        .expect("stop all again");
    let body = support::response_json(response).await;
    assert_eq!(body["stopped"], 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn history_filters_by_game_and_client() {
    let (app, state) = support::test_app().await;
    let quake = support::seed_game(&state, "3006", "Quake Live").await;
    let chess = support::seed_game(&state, "3007", "Chess Ultra").await;

    start_session(&app, quake.id, "machine-a").await;
    start_session(&app, chess.id, "machine-b").await;

    let response = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            &format!("/api/sessions?gameId={}", quake.id),
            None,
            None,
        ))
        .await
        .expect("filter by game");
    let sessions = support::response_json(response).await;
    let sessions = sessions.as_array().expect("array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["gameName"], "Quake Live");

    let response = app
        .oneshot(support::request(
            Method::GET,
            "/api/sessions?clientId=machine-b&limit=5",
            None,
            None,
        ))
        .await
        .expect("filter by client");
    let sessions = support::response_json(response).await;
    let sessions = sessions.as_array().expect("array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["clientId"], "machine-b");
}

#[tokio::test]
async fn deleting_a_session_removes_it_and_broadcasts() {
    let (app, state) = support::test_app().await;
    let game = support::seed_game(&state, "3008", "Rocket League").await;

    let started = start_session(&app, game.id, "machine-a").await;
    let started = support::response_json(started).await;
    let id = started["id"].as_i64().expect("id");

    let mut rx = state.bus.subscribe(Channel::GameSessions);
    let response = app
        .clone()
        .oneshot(support::request(
            Method::DELETE,
            &format!("/api/sessions/{id}"),
            None,
            None,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let envelope = rx.recv().await.expect("deleted envelope");
    assert_eq!(envelope.event, "session_deleted");
    assert_eq!(envelope.data["id"], id);

    let response = app
        .oneshot(support::request(
            Method::DELETE,
            &format!("/api/sessions/{id}"),
            None,
            None,
        ))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
