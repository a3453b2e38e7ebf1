//! Route table and middleware stack, shared by the binary and the tests.

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers,
    middleware::{identify, log_error_responses, login_rate_limit, permit},
    permissions::Require,
    state::AppState,
};

/// One route with its permission guard attached.
fn guarded(path: &str, method_router: MethodRouter<AppState>, rule: Require) -> Router<AppState> {
    Router::new()
        .route(path, method_router)
        .route_layer(axum_middleware::from_fn_with_state(rule, permit))
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/ip", get(handlers::ip))
        .route("/auth/me", get(handlers::me))
        .route("/api/updates/{platform}/latest", get(handlers::latest))
        .route("/ws", get(handlers::ws_handler));

    let login = Router::new()
        .route("/auth/login", post(handlers::login))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let games = Router::new()
        .merge(guarded(
            "/api/games",
            get(handlers::list_games),
            Require::Single("games:list"),
        ))
        .merge(guarded(
            "/api/games",
            post(handlers::create_game),
            Require::Single("games:create"),
        ))
        .merge(guarded(
            "/api/games/{id}",
            get(handlers::get_game),
            Require::Single("games:read"),
        ))
        .merge(guarded(
            "/api/games/{id}",
            put(handlers::update_game),
            Require::Single("games:update"),
        ))
        .merge(guarded(
            "/api/games/{id}",
            delete(handlers::delete_game),
            Require::Single("games:delete"),
        ))
        .merge(guarded(
            "/api/games/{id}/status",
            put(handlers::update_game_status),
            Require::Single("games:update"),
        ));

    let keys = Router::new()
        .merge(guarded(
            "/api/games/{id}/keys",
            get(handlers::list_keys),
            Require::Single("games:keys:list"),
        ))
        .merge(guarded(
            "/api/games/{id}/keys",
            post(handlers::create_keys),
            Require::Single("games:keys:create"),
        ))
        .merge(guarded(
            "/api/keys/{id}",
            delete(handlers::delete_key),
            Require::Single("games:keys:delete"),
        ))
        .merge(guarded(
            "/api/games/{id}/keys/reserve",
            post(handlers::reserve_key),
            Require::Single("games:keys:reserve"),
        ))
        .merge(guarded(
            "/api/games/{id}/keys/release",
            post(handlers::release_keys),
            Require::Single("games:keys:release"),
        ));

    let sessions = Router::new()
        .merge(guarded(
            "/api/sessions",
            get(handlers::list_sessions),
            Require::Single("game-sessions:read"),
        ))
        .merge(guarded(
            "/api/sessions/active",
            get(handlers::active_sessions),
            Require::Single("game-sessions:read"),
        ))
        .merge(guarded(
            "/api/sessions/start",
            post(handlers::start_session),
            Require::Single("game-sessions:start"),
        ))
        .merge(guarded(
            "/api/sessions/{id}/stop",
            post(handlers::stop_session),
            Require::Any(&["game-sessions:stop", "game-sessions:update"]),
        ))
        .merge(guarded(
            "/api/sessions/stop-all",
            post(handlers::stop_all_sessions),
            Require::Any(&["game-sessions:stop", "game-sessions:delete"]),
        ))
        .merge(guarded(
            "/api/sessions/{id}",
            delete(handlers::delete_session),
            Require::Single("game-sessions:delete"),
        ));

    let events = Router::new()
        .merge(guarded(
            "/api/events",
            get(handlers::list_events),
            Require::Single("events:list"),
        ))
        .merge(guarded(
            "/api/events",
            post(handlers::create_event),
            Require::Single("events:create"),
        ))
        .merge(guarded(
            "/api/events/{id}",
            get(handlers::get_event),
            Require::Single("events:read"),
        ))
        .merge(guarded(
            "/api/events/{id}",
            put(handlers::update_event),
            Require::Single("events:update"),
        ))
        .merge(guarded(
            "/api/events/{id}",
            delete(handlers::delete_event),
            Require::Single("events:delete"),
        ))
        .merge(guarded(
            "/api/events/{id}/status",
            put(handlers::update_event_status),
            Require::Single("events:update"),
        ));

    let users = Router::new()
        .merge(guarded(
            "/api/users",
            get(handlers::list_users),
            Require::Single("users:list"),
        ))
        .merge(guarded(
            "/api/users",
            post(handlers::register_user),
            Require::Single("users:create"),
        ))
        .merge(guarded(
            "/api/users/by-client-id/{client_id}",
            get(handlers::get_user_by_client_id),
            Require::All(&["users:read", "users:read:by-client-id"]),
        ))
        .merge(guarded(
            "/api/users/by-client-id/{client_id}",
            put(handlers::update_user_by_client_id),
            Require::All(&["users:update", "users:update:by-client-id"]),
        ))
        .merge(guarded(
            "/api/users/{id}",
            get(handlers::get_user),
            Require::Single("users:read"),
        ))
        .merge(guarded(
            "/api/users/{id}",
            put(handlers::update_user),
            Require::Single("users:update"),
        ))
        .merge(guarded(
            "/api/users/{id}",
            delete(handlers::delete_user),
            Require::Single("users:delete"),
        ));

    let settings = Router::new()
        .merge(guarded(
            "/api/settings",
            get(handlers::list_settings),
            Require::Single("settings:read"),
        ))
        .merge(guarded(
            "/api/settings/{key}",
            get(handlers::get_setting),
            Require::Single("settings:read"),
        ))
        .merge(guarded(
            "/api/settings/{key}",
            put(handlers::upsert_setting),
            Require::Single("settings:update"),
        ))
        .merge(guarded(
            "/api/settings/{key}",
            delete(handlers::delete_setting),
            Require::Single("settings:delete"),
        ));

    let steam = Router::new()
        .merge(guarded(
            "/api/steam",
            get(handlers::list_owned_games),
            Require::Single("steam:list"),
        ))
        .merge(guarded(
            "/api/steam",
            post(handlers::import_game),
            Require::Single("steam:create"),
        ));

    let updates = Router::new().merge(guarded(
        "/api/updates/sync",
        get(handlers::sync),
        Require::Single("updates:sync"),
    ));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(games)
        .merge(keys)
        .merge(sessions)
        .merge(events)
        .merge(users)
        .merge(settings)
        .merge(steam)
        .merge(updates)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(state.clone(), identify))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                )
                .layer(axum_middleware::from_fn(log_error_responses)),
        )
        .with_state(state)
}
