use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod support;

#[tokio::test]
async fn settings_round_trip_through_upsert() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);

    let created = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            "/api/settings/banner_message",
            Some(&token),
            Some(json!({ "value": "Doors open at 18:00" })),
        ))
        .await
        .expect("upsert setting");
    assert_eq!(created.status(), StatusCode::OK);
    let body = support::response_json(created).await;
    assert_eq!(body["key"], "banner_message");
    assert_eq!(body["value"], "Doors open at 18:00");

    // A second write to the same key replaces the value in place.
    let replaced = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            "/api/settings/banner_message",
            Some(&token),
            Some(json!({ "value": "Doors open at 19:00" })),
        ))
        .await
        .expect("upsert setting");
    let replaced = support::response_json(replaced).await;
    assert_eq!(replaced["value"], "Doors open at 19:00");
    assert_eq!(replaced["id"], body["id"]);

    let listed = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/settings",
            Some(&token),
            None,
        ))
        .await
        .expect("list settings");
    let listed = support::response_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let fetched = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/settings/banner_message",
            Some(&token),
            None,
        ))
        .await
        .expect("get setting");
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = support::response_json(fetched).await;
    assert_eq!(fetched["value"], "Doors open at 19:00");
}

#[tokio::test]
async fn deleting_a_setting_removes_it() {
    let (app, state) = support::test_app().await;
    let token = support::admin_token(&state);

    app.clone()
        .oneshot(support::request(
            Method::PUT,
            "/api/settings/motd",
            Some(&token),
            Some(json!({ "value": "bring your own chair" })),
        ))
        .await
        .expect("upsert setting");

    let deleted = app
        .clone()
        .oneshot(support::request(
            Method::DELETE,
            "/api/settings/motd",
            Some(&token),
            None,
        ))
        .await
        .expect("delete setting");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/settings/motd",
            Some(&token),
            None,
        ))
        .await
        .expect("get setting");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = support::response_json(missing).await;
    assert_eq!(body["error"], "Setting not found");

    let again = app
        .clone()
        .oneshot(support::request(
            Method::DELETE,
            "/api/settings/motd",
            Some(&token),
            None,
        ))
        .await
        .expect("delete setting");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_are_closed_to_guests() {
    let (app, _state) = support::test_app().await;

    let read = app
        .clone()
        .oneshot(support::request(Method::GET, "/api/settings", None, None))
        .await
        .expect("list settings");
    assert_eq!(read.status(), StatusCode::FORBIDDEN);
    let body = support::response_json(read).await;
    assert!(body["error"]
        .as_str()
        .expect("error text")
        .contains("settings:read"));

    let write = app
        .clone()
        .oneshot(support::request(
            Method::PUT,
            "/api/settings/banner_message",
            None,
            Some(json!({ "value": "nope" })),
        ))
        .await
        .expect("upsert setting");
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
}
