//! Models for play-session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Database representation of one play session.
pub struct GameSession {
    pub id: i64,
    /// Machine the session was started from.
    pub client_id: String,
    /// Catalog entry being played.
    pub game_id: i64,
    pub start_time: DateTime<Utc>,
    /// Set when the session ends; open sessions have no end time.
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
/// Session row joined with the game's display name.
pub struct SessionRecord {
    pub id: i64,
    pub client_id: String,
    pub game_id: i64,
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Elapsed whole seconds between start and end, using `now` for open
/// sessions. Truncates fractional seconds.
pub fn duration_seconds(
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let end = end_time.unwrap_or(now);
    (end - start_time).num_seconds().max(0)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Play session as returned by the API, with derived duration.
pub struct GameSessionResponse {
    pub id: i64,
    pub client_id: String,
    pub game_id: i64,
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub duration_seconds: i64,
}

impl GameSessionResponse {
    pub fn from_record(record: SessionRecord, now: DateTime<Utc>) -> Self {
        let duration = duration_seconds(record.start_time, record.end_time, now);
        Self {
            id: record.id,
            client_id: record.client_id,
            game_id: record.game_id,
            game_name: record.game_name,
            start_time: record.start_time,
            end_time: record.end_time,
            is_active: record.is_active,
            duration_seconds: duration,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for starting a session.
pub struct StartSessionRequest {
    pub game_id: i64,
    #[validate(length(min = 1, max = 128))]
    pub client_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for force-ending every session a machine holds.
pub struct StopAllSessionsRequest {
    #[validate(length(min = 1, max = 128))]
    pub client_id: String,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Filters for the session history listing.
pub struct SessionsQuery {
    pub game_id: Option<i64>,
    pub client_id: Option<String>,
    /// Maximum number of records to return (default: 100, max: 500).
    pub limit: Option<i64>,
}

impl SessionsQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 500)
    }
}
