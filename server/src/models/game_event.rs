//! Models for scheduled game events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Database representation of a scheduled event.
pub struct GameEvent {
    pub id: i64,
    /// Catalog entry the event is played on.
    pub game_id: i64,
    /// Display name snapshotted at creation so deletions don't blank the
    /// schedule.
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Stored lifecycle state; only `active` and `cancelled` persist.
    pub status: EventStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameEvent {
    /// Derives the schedule-aware status. Cancellation always wins; the
    /// time window is inclusive on both ends.
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        if self.status == EventStatus::Cancelled {
            return EffectiveStatus::Cancelled;
        }
        if now < self.start_time {
            EffectiveStatus::Upcoming
        } else if now <= self.end_time {
            EffectiveStatus::Active
        } else {
            EffectiveStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema, Default)]
#[sqlx(rename_all = "lowercase")]
/// Stored lifecycle states.
pub enum EventStatus {
    #[default]
    Active,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl Serialize for EventStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "active" | "Active" | "ACTIVE" => Ok(EventStatus::Active),
            "cancelled" | "Cancelled" | "CANCELLED" => Ok(EventStatus::Cancelled),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["active", "cancelled"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
/// Derived, schedule-aware status. Never stored.
pub enum EffectiveStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Scheduled event as returned by the API, with derived status attached.
pub struct GameEventResponse {
    pub id: i64,
    pub game_id: i64,
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: EventStatus,
    pub effective_status: EffectiveStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameEventResponse {
    pub fn from_event(event: GameEvent, now: DateTime<Utc>) -> Self {
        let effective_status = event.effective_status(now);
        Self {
            id: event.id,
            game_id: event.game_id,
            game_name: event.game_name,
            start_time: event.start_time,
            end_time: event.end_time,
            status: event.status,
            effective_status,
            description: event.description,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for scheduling an event.
pub struct CreateEventRequest {
    pub game_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for partially updating an event's schedule or description.
pub struct UpdateEventRequest {
    pub game_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Payload for flipping an event between active and cancelled.
pub struct UpdateEventStatusRequest {
    pub status: EventStatus,
}
