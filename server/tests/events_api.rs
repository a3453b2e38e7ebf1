use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use lan_nexus_server::bus::Channel;
use serde_json::{json, Value};
use tower::ServiceExt;

mod support;

async fn create_event(
    app: &axum::Router,
    token: &str,
    game_id: i64,
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
) -> axum::response::Response {
    app.clone()
        .oneshot(support::request(
            Method::POST,
            "/api/events",
            Some(token),
            Some(json!({
                "gameId": game_id,
                "startTime": start.to_rfc3339(),
                "endTime": end.to_rfc3339(),
                "description": "Friday night bracket",
            })),
        ))
        .await
        .expect("create event")
}

#[tokio::test]
async fn create_rejects_inverted_windows_and_unknown_games() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "4001", "Unreal Tournament").await;
    let now = Utc::now();

    let inverted = create_event(&app, &token, game.id, now, now - Duration::hours(1)).await;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
    let body = support::response_json(inverted).await;
    assert_eq!(body["error"], "endTime must be after startTime");

    let orphan = create_event(&app, &token, 9999, now, now + Duration::hours(1)).await;
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);
    let body = support::response_json(orphan).await;
    assert_eq!(body["error"], "Game not found");
}

#[tokio::test]
async fn created_events_snapshot_the_game_name_and_derive_status() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "4002", "Age of Empires II").await;
    let now = Utc::now();

    let running = create_event(
        &app,
        &token,
        game.id,
        now - Duration::minutes(30),
        now + Duration::hours(2),
    )
    .await;
    assert_eq!(running.status(), StatusCode::CREATED);
    let running = support::response_json(running).await;
    assert_eq!(running["gameName"], "Age of Empires II");
    assert_eq!(running["status"], "active");
    assert_eq!(running["effectiveStatus"], "active");

    let upcoming = create_event(
        &app,
        &token,
        game.id,
        now + Duration::days(1),
        now + Duration::days(1) + Duration::hours(3),
    )
    .await;
    let upcoming = support::response_json(upcoming).await;
    assert_eq!(upcoming["effectiveStatus"], "upcoming");

    let finished = create_event(
        &app,
        &token,
        game.id,
        now - Duration::days(1),
        now - Duration::hours(20),
    )
    .await;
    let finished = support::response_json(finished).await;
    assert_eq!(finished["effectiveStatus"], "completed");

    // The list derives against the same clock and is readable without a token.
    let list = app
        .clone()
        .oneshot(support::request(Method::GET, "/api/events", None, None))
        .await
        .expect("list events");
    assert_eq!(list.status(), StatusCode::OK);
    let list = support::response_json(list).await;
    let statuses: Vec<&str> = list
        .as_array()
        .expect("array body")
        .iter()
        .map(|event| event["effectiveStatus"].as_str().expect("status"))
        .collect();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.contains(&"active"));
    assert!(statuses.contains(&"upcoming"));
    assert!(statuses.contains(&"completed"));
}

#[tokio::test]
async fn cancelling_inside_the_window_overrides_the_schedule() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "4003", "StarCraft").await;
    let mut rx = state.bus.subscribe(Channel::GameEvents);
    let now = Utc::now();

    let created = create_event(
        &app,
        &token,
        game.id,
        now - Duration::minutes(10),
        now + Duration::hours(1),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = support::response_json(created).await;
    assert_eq!(created["effectiveStatus"], "active");
    let event_id = created["id"].as_i64().expect("event id");

    let envelope: Value = serde_json::to_value(rx.recv().await.expect("event_created envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "event_created");
    assert_eq!(envelope["data"]["id"], event_id);
    let envelope: Value = serde_json::to_value(rx.recv().await.expect("resync envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "events_list_updated");
    assert_eq!(envelope["data"].as_array().map(Vec::len), Some(1));

    let cancelled = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            &format!("/api/events/{event_id}/status"),
            Some(&token),
            Some(json!({ "status": "cancelled" })),
        ))
        .await
        .expect("cancel event");
    assert_eq!(cancelled.status(), StatusCode::OK);
    let cancelled = support::response_json(cancelled).await;
    assert_eq!(cancelled["status"], "cancelled");
    // Still inside the time window, but cancellation wins.
    assert_eq!(cancelled["effectiveStatus"], "cancelled");

    let envelope: Value = serde_json::to_value(rx.recv().await.expect("status envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "event_status_updated");
    assert_eq!(envelope["data"]["effectiveStatus"], "cancelled");
    let envelope: Value = serde_json::to_value(rx.recv().await.expect("resync envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "events_list_updated");

    let fetched = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            &format!("/api/events/{event_id}"),
            None,
            None,
        ))
        .await
        .expect("get event");
    let fetched = support::response_json(fetched).await;
    assert_eq!(fetched["effectiveStatus"], "cancelled");

    // Flipping back to active restores schedule-derived status.
    let restored = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            &format!("/api/events/{event_id}/status"),
            Some(&token),
            Some(json!({ "status": "active" })),
        ))
        .await
        .expect("restore event");
    let restored = support::response_json(restored).await;
    assert_eq!(restored["effectiveStatus"], "active");
}

#[tokio::test]
async fn update_revalidates_the_merged_window() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "4004", "Warcraft III").await;
    let other = support::seed_game(&state, "4005", "Diablo II").await;
    let now = Utc::now();

    let created = create_event(
        &app,
        &token,
        game.id,
        now + Duration::hours(1),
        now + Duration::hours(3),
    )
    .await;
    let created = support::response_json(created).await;
    let event_id = created["id"].as_i64().expect("event id");

    // Only endTime supplied; it must be checked against the stored startTime.
    let inverted = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            &format!("/api/events/{event_id}"),
            Some(&token),
            Some(json!({ "endTime": now.to_rfc3339() })),
        ))
        .await
        .expect("update event");
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
    let body = support::response_json(inverted).await;
    assert_eq!(body["error"], "endTime must be after startTime");

    // Re-pointing at another game refreshes the snapshotted name.
    let moved = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            &format!("/api/events/{event_id}"),
            Some(&token),
            Some(json!({
                "gameId": other.id,
                "description": "Moved to the Diablo bracket",
            })),
        ))
        .await
        .expect("update event");
    assert_eq!(moved.status(), StatusCode::OK);
    let moved = support::response_json(moved).await;
    assert_eq!(moved["gameName"], "Diablo II");
    assert_eq!(moved["description"], "Moved to the Diablo bracket");

    let missing_game = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            &format!("/api/events/{event_id}"),
            Some(&token),
            Some(json!({ "gameId": 9999 })),
        ))
        .await
        .expect("update event");
    assert_eq!(missing_game.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_broadcasts_and_removes_the_event() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);
    let game = support::seed_game(&state, "4006", "Counter-Strike 1.6").await;
    let now = Utc::now();

    let created = create_event(
        &app,
        &token,
        game.id,
        now + Duration::hours(2),
        now + Duration::hours(4),
    )
    .await;
    let created = support::response_json(created).await;
    let event_id = created["id"].as_i64().expect("event id");

    let mut rx = state.bus.subscribe(Channel::GameEvents);
    let deleted = app
        .clone()
        .oneshot(support::request(
            Method::DELETE,
            &format!("/api/events/{event_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete event");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let envelope: Value = serde_json::to_value(rx.recv().await.expect("delete envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "event_deleted");
    assert_eq!(envelope["data"]["id"], event_id);
    let envelope: Value = serde_json::to_value(rx.recv().await.expect("resync envelope"))
        .expect("envelope json");
    assert_eq!(envelope["event"], "events_list_updated");
    assert_eq!(envelope["data"].as_array().map(Vec::len), Some(0));

    let missing = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            &format!("/api/events/{event_id}"),
            None,
            None,
        ))
        .await
        .expect("get event");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = support::response_json(missing).await;
    assert_eq!(body["error"], "Event not found");

    let again = app
        .clone()
        .oneshot(support::request(
            Method::DELETE,
            &format!("/api/events/{event_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete event");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scheduling_requires_permission() {
    let (app, state) = support::test_app().await;
    let game = support::seed_game(&state, "4007", "Team Fortress Classic").await;
    let now = Utc::now();

    let denied = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            "/api/events",
            None,
            Some(json!({
                "gameId": game.id,
                "startTime": now.to_rfc3339(),
                "endTime": (now + Duration::hours(1)).to_rfc3339(),
            })),
        ))
        .await
        .expect("create event");
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    let body = support::response_json(denied).await;
    assert!(body["error"]
        .as_str()
        .expect("error text")
        .contains("events:create"));

    // Reading the schedule stays open to guests.
    let list = app
        .clone()
        .oneshot(support::request(Method::GET, "/api/events", None, None))
        .await
        .expect("list events");
    assert_eq!(list.status(), StatusCode::OK);
}
