use std::net::SocketAddr;

use axum::{extract::ConnectInfo, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

/// Liveness probe. Intentionally unauthenticated and unthrottled.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "service": "lan-nexus-server",
    }))
}

/// Echoes the caller's address so launchers can learn their own LAN IP.
pub async fn ip(ConnectInfo(addr): ConnectInfo<SocketAddr>) -> Json<Value> {
    Json(json!({ "ip": addr.ip().to_string() }))
}
