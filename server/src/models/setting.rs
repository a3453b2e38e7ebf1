//! Models for server-wide key/value settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// One persisted setting.
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for writing a setting; the key comes from the path.
pub struct UpsertSettingRequest {
    #[validate(length(max = 65536))]
    pub value: String,
}
