use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod support;

#[tokio::test]
async fn login_issues_admin_token() {
    let (app, _state) = support::test_app().await;

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "password": support::ADMIN_PASSWORD })),
        ))
        .await
        .expect("call login");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-ratelimit-limit")
            .and_then(|v| v.to_str().ok()),
        Some("10")
    );

    let body = support::response_json(response).await;
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(body["role"], "admin");
    assert!(body["expiresAt"].as_str().is_some());

    let response = app
        .oneshot(support::request(
            Method::GET,
            "/auth/me",
            Some(&token),
            None,
        ))
        .await
        .expect("call me");
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::response_json(response).await;
    assert_eq!(body["name"], "admin");
    assert_eq!(body["role"], "admin");
    assert!(body["permissions"]
        .as_array()
        .expect("permissions")
        .iter()
        .any(|p| p == "games:create"));
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _state) = support::test_app().await;

    let response = app
        .oneshot(support::request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "password": "not-the-password" })),
        ))
        .await
        .expect("call login");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = support::response_json(response).await;
    assert_eq!(body["error"], "Invalid password");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_rejects_empty_password() {
    let (app, _state) = support::test_app().await;

    let response = app
        .oneshot(support::request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "password": "" })),
        ))
        .await
        .expect("call login");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = support::response_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn eleventh_login_attempt_in_window_is_rate_limited() {
    let (app, _state) = support::test_app().await;

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(support::request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "password": "wrong" })),
            ))
            .await
            .expect("call login");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .clone()
        .oneshot(support::request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "password": "wrong" })),
        ))
        .await
        .expect("call login");

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok()),
        Some("0")
    );
    let body = support::response_json(response).await;
    assert_eq!(body["error"], "Too many requests, please try again later.");
    assert!(body["retryAfter"].as_i64().expect("retryAfter") >= 1);

    // Another machine is unaffected.
    let response = app
        .oneshot(support::request_from(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "password": support::ADMIN_PASSWORD })),
            ([10, 0, 0, 7], 39000).into(),
        ))
        .await
        .expect("call login");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbage_bearer_degrades_to_guest() {
    let (app, state) = support::test_app().await;
    support::seed_game(&state, "1001", "Quake III").await;

    // Guest-permitted route still works.
    let response = app
        .clone()
        .oneshot(support::request(
            Method::GET,
            "/api/games",
            Some("not-a-jwt"),
            None,
        ))
        .await
        .expect("call games");
    assert_eq!(response.status(), StatusCode::OK);

    // Admin route answers 403, not 401.
    let response = app
        .oneshot(support::request(
            Method::GET,
            "/api/users",
            Some("not-a-jwt"),
            None,
        ))
        .await
        .expect("call users");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = support::response_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("users:list"));
}

#[tokio::test]
async fn me_reports_guest_without_token() {
    let (app, _state) = support::test_app().await;

    let response = app
        .oneshot(support::request(Method::GET, "/auth/me", None, None))
        .await
        .expect("call me");

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::response_json(response).await;
    assert_eq!(body["name"], "guest");
    assert_eq!(body["role"], "guest");
    let permissions = body["permissions"].as_array().expect("permissions");
    assert!(permissions.iter().any(|p| p == "games:keys:reserve"));
    assert!(!permissions.iter().any(|p| p == "games:create"));
}
