#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::{
        steam::ImportSteamGameRequest,
        updates::{SyncAsset, SyncResponse},
    },
    models::{
        game::{Game, GameKind, GameStatus, CreateGameRequest, UpdateGameRequest, UpdateGameStatusRequest},
        game_event::{
            CreateEventRequest, EffectiveStatus, EventStatus, GameEventResponse,
            UpdateEventRequest, UpdateEventStatusRequest,
        },
        game_key::{CreateKeysRequest, GameKey, KeyClientRequest, ReleaseResponse},
        game_session::{
            GameSessionResponse, SessionsQuery, StartSessionRequest, StopAllSessionsRequest,
        },
        setting::{Setting, UpsertSettingRequest},
        user::{LoginRequest, LoginResponse, MeResponse, RegisterUserRequest, Role, UpdateUserRequest, User},
    },
    services::steam::OwnedGame,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        me_doc,
        health_doc,
        ip_doc,
        list_games_doc,
        get_game_doc,
        create_game_doc,
        update_game_doc,
        update_game_status_doc,
        delete_game_doc,
        list_keys_doc,
        create_keys_doc,
        delete_key_doc,
        reserve_key_doc,
        release_keys_doc,
        list_sessions_doc,
        active_sessions_doc,
        start_session_doc,
        stop_session_doc,
        stop_all_sessions_doc,
        delete_session_doc,
        list_events_doc,
        get_event_doc,
        create_event_doc,
        update_event_doc,
        update_event_status_doc,
        delete_event_doc,
        list_users_doc,
        register_user_doc,
        get_user_doc,
        get_user_by_client_id_doc,
        update_user_doc,
        update_user_by_client_id_doc,
        delete_user_doc,
        list_settings_doc,
        get_setting_doc,
        upsert_setting_doc,
        delete_setting_doc,
        steam_library_doc,
        steam_import_doc,
        updates_latest_doc,
        updates_sync_doc,
        ws_doc
    ),
    components(
        schemas(
            // auth
            LoginRequest,
            LoginResponse,
            MeResponse,
            // users
            User,
            Role,
            RegisterUserRequest,
            UpdateUserRequest,
            // games
            Game,
            GameKind,
            GameStatus,
            CreateGameRequest,
            UpdateGameRequest,
            UpdateGameStatusRequest,
            // keys
            GameKey,
            CreateKeysRequest,
            KeyClientRequest,
            ReleaseResponse,
            // sessions
            GameSessionResponse,
            StartSessionRequest,
            StopAllSessionsRequest,
            SessionsQuery,
            // events
            GameEventResponse,
            EventStatus,
            EffectiveStatus,
            CreateEventRequest,
            UpdateEventRequest,
            UpdateEventStatusRequest,
            // settings
            Setting,
            UpsertSettingRequest,
            // steam & updates
            OwnedGame,
            ImportSteamGameRequest,
            SyncResponse,
            SyncAsset
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Admin login and identity"),
        (name = "System", description = "Health and caller info"),
        (name = "Games", description = "Game catalog"),
        (name = "Keys", description = "License key pools"),
        (name = "Sessions", description = "Play session tracking"),
        (name = "Events", description = "Scheduled party events"),
        (name = "Users", description = "LAN party members"),
        (name = "Settings", description = "Server settings"),
        (name = "Steam", description = "Steam library import"),
        (name = "Updates", description = "Launcher update feed")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Wrong password"),
        (status = 429, description = "Too many attempts")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses((status = 200, description = "Caller identity, guest when unauthenticated", body = MeResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = serde_json::Value)),
    tag = "System",
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    get,
    path = "/api/ip",
    responses((status = 200, description = "Caller address as the server sees it", body = serde_json::Value)),
    tag = "System",
    security(())
)]
fn ip_doc() {}

#[utoipa::path(
    get,
    path = "/api/games",
    responses((status = 200, description = "Catalog, drafts only for admins", body = [Game])),
    tag = "Games"
)]
fn list_games_doc() {}

#[utoipa::path(
    get,
    path = "/api/games/{id}",
    params(("id" = i64, Path, description = "Game id")),
    responses(
        (status = 200, body = Game),
        (status = 404, description = "Game not found")
    ),
    tag = "Games"
)]
fn get_game_doc() {}

#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = Game),
        (status = 409, description = "Duplicate gameId")
    ),
    tag = "Games"
)]
fn create_game_doc() {}

#[utoipa::path(
    put,
    path = "/api/games/{id}",
    params(("id" = i64, Path, description = "Game id")),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, body = Game),
        (status = 404, description = "Game not found")
    ),
    tag = "Games"
)]
fn update_game_doc() {}

#[utoipa::path(
    put,
    path = "/api/games/{id}/status",
    params(("id" = i64, Path, description = "Game id")),
    request_body = UpdateGameStatusRequest,
    responses(
        (status = 200, body = Game),
        (status = 404, description = "Game not found")
    ),
    tag = "Games"
)]
fn update_game_status_doc() {}

#[utoipa::path(
    delete,
    path = "/api/games/{id}",
    params(("id" = i64, Path, description = "Game id")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Game not found")
    ),
    tag = "Games"
)]
fn delete_game_doc() {}

#[utoipa::path(
    get,
    path = "/api/games/{id}/keys",
    params(("id" = i64, Path, description = "Game id")),
    responses(
        (status = 200, description = "Key pool with holder info", body = [GameKey]),
        (status = 404, description = "Game not found")
    ),
    tag = "Keys"
)]
fn list_keys_doc() {}

#[utoipa::path(
    post,
    path = "/api/games/{id}/keys",
    params(("id" = i64, Path, description = "Game id")),
    request_body = CreateKeysRequest,
    responses(
        (status = 201, description = "Keys added", body = [GameKey]),
        (status = 409, description = "Duplicate key text")
    ),
    tag = "Keys"
)]
fn create_keys_doc() {}

#[utoipa::path(
    delete,
    path = "/api/keys/{id}",
    params(("id" = i64, Path, description = "Key id")),
    responses(
        (status = 204, description = "Key removed"),
        (status = 404, description = "Key not found")
    ),
    tag = "Keys"
)]
fn delete_key_doc() {}

#[utoipa::path(
    post,
    path = "/api/games/{id}/keys/reserve",
    params(("id" = i64, Path, description = "Game id")),
    request_body = KeyClientRequest,
    responses(
        (status = 200, description = "Key reserved for the machine", body = GameKey),
        (status = 404, description = "No available keys")
    ),
    tag = "Keys"
)]
fn reserve_key_doc() {}

#[utoipa::path(
    post,
    path = "/api/games/{id}/keys/release",
    params(("id" = i64, Path, description = "Game id")),
    request_body = KeyClientRequest,
    responses((status = 200, description = "Keys returned to the pool", body = ReleaseResponse)),
    tag = "Keys"
)]
fn release_keys_doc() {}

#[utoipa::path(
    get,
    path = "/api/sessions",
    params(SessionsQuery),
    responses((status = 200, description = "Session history, newest first", body = [GameSessionResponse])),
    tag = "Sessions"
)]
fn list_sessions_doc() {}

#[utoipa::path(
    get,
    path = "/api/sessions/active",
    responses((status = 200, description = "Currently running sessions", body = [GameSessionResponse])),
    tag = "Sessions"
)]
fn active_sessions_doc() {}

#[utoipa::path(
    post,
    path = "/api/sessions/start",
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session started", body = GameSessionResponse),
        (status = 404, description = "Game not found")
    ),
    tag = "Sessions"
)]
fn start_session_doc() {}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/stop",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session stopped, idempotent", body = GameSessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
fn stop_session_doc() {}

#[utoipa::path(
    post,
    path = "/api/sessions/stop-all",
    request_body = StopAllSessionsRequest,
    responses((status = 200, description = "Active sessions ended for the machine", body = serde_json::Value)),
    tag = "Sessions"
)]
fn stop_all_sessions_doc() {}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session removed from history"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions"
)]
fn delete_session_doc() {}

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "All events with derived status", body = [GameEventResponse])),
    tag = "Events"
)]
fn list_events_doc() {}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, body = GameEventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
fn get_event_doc() {}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event scheduled", body = GameEventResponse),
        (status = 400, description = "endTime must be after startTime"),
        (status = 404, description = "Game not found")
    ),
    tag = "Events"
)]
fn create_event_doc() {}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, body = GameEventResponse),
        (status = 400, description = "Invalid time window"),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
fn update_event_doc() {}

#[utoipa::path(
    put,
    path = "/api/events/{id}/status",
    params(("id" = i64, Path, description = "Event id")),
    request_body = UpdateEventStatusRequest,
    responses(
        (status = 200, description = "Stored status replaced", body = GameEventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
fn update_event_status_doc() {}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
fn delete_event_doc() {}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, body = [User])),
    tag = "Users"
)]
fn list_users_doc() {}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Member registered", body = User),
        (status = 409, description = "Name or clientId already taken")
    ),
    tag = "Users"
)]
fn register_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
fn get_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/by-client-id/{clientId}",
    params(("clientId" = String, Path, description = "Machine identifier")),
    responses(
        (status = 200, body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
fn get_user_by_client_id_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, body = User),
        (status = 403, description = "Role change needs an admin"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
fn update_user_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/by-client-id/{clientId}",
    params(("clientId" = String, Path, description = "Machine identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile fields updated", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
fn update_user_by_client_id_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
fn delete_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, body = [Setting])),
    tag = "Settings"
)]
fn list_settings_doc() {}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, body = Setting),
        (status = 404, description = "Setting not found")
    ),
    tag = "Settings"
)]
fn get_setting_doc() {}

#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpsertSettingRequest,
    responses((status = 200, description = "Setting stored", body = Setting)),
    tag = "Settings"
)]
fn upsert_setting_doc() {}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 204, description = "Setting removed"),
        (status = 404, description = "Setting not found")
    ),
    tag = "Settings"
)]
fn delete_setting_doc() {}

#[utoipa::path(
    get,
    path = "/api/steam",
    responses(
        (status = 200, description = "Owned games of the configured account", body = [OwnedGame]),
        (status = 502, description = "Steam unreachable")
    ),
    tag = "Steam"
)]
fn steam_library_doc() {}

#[utoipa::path(
    post,
    path = "/api/steam",
    request_body = ImportSteamGameRequest,
    responses(
        (status = 201, description = "Imported as a draft catalog entry", body = Game),
        (status = 409, description = "Game already added"),
        (status = 502, description = "Steam unreachable")
    ),
    tag = "Steam"
)]
fn steam_import_doc() {}

#[utoipa::path(
    get,
    path = "/api/updates/{platform}/latest",
    params(("platform" = String, Path, description = "win32, darwin or linux")),
    responses(
        (status = 200, description = "electron-updater feed", content_type = "text/plain", body = String),
        (status = 400, description = "Unknown platform"),
        (status = 404, description = "No release asset for the platform"),
        (status = 502, description = "Release feed unreachable")
    ),
    tag = "Updates",
    security(())
)]
fn updates_latest_doc() {}

#[utoipa::path(
    get,
    path = "/api/updates/sync",
    responses(
        (status = 200, description = "Latest release summary", body = SyncResponse),
        (status = 502, description = "Release feed unreachable")
    ),
    tag = "Updates"
)]
fn updates_sync_doc() {}

#[utoipa::path(
    get,
    path = "/ws",
    responses((status = 101, description = "Switching protocols to WebSocket")),
    tag = "System",
    security(())
)]
fn ws_doc() {}
