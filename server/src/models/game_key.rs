//! Models for the shared license key pool.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Database representation of a single license key.
pub struct GameKey {
    pub id: i64,
    /// The license key text, unique across the pool.
    pub key: String,
    /// Catalog entry the key unlocks.
    pub game_id: i64,
    /// Address of the machine holding the key; empty string when free.
    pub ip_address: String,
    /// Machine identifier holding the key; NULL when free.
    pub client_id: Option<String>,
}

impl GameKey {
    /// A key is available when neither holder field is set.
    pub fn is_available(&self) -> bool {
        self.ip_address.is_empty() && self.client_id.is_none()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for bulk-adding keys to a game's pool.
pub struct CreateKeysRequest {
    #[validate(length(min = 1))]
    pub keys: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload identifying the requesting machine for reserve/release.
pub struct KeyClientRequest {
    #[validate(length(min = 1, max = 128))]
    pub client_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Outcome of a release call; counts keys returned to the pool.
pub struct ReleaseResponse {
    pub released: u64,
}
