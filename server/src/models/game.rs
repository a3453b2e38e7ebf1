//! Models for catalog entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Database representation of a catalog entry.
pub struct Game {
    /// Unique identifier for the entry.
    pub id: i64,
    /// External identity, e.g. `steam:440` or an archive slug. Unique.
    pub game_id: String,
    /// Display title.
    pub name: String,
    /// Long-form description shown on the detail page.
    pub description: String,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub header_image: Option<String>,
    pub image_card: Option<String>,
    pub hero_image: Option<String>,
    /// Archive file names, when the game ships as archives.
    pub archives: Option<String>,
    /// Distribution channel for the entry.
    pub kind: GameKind,
    /// Whether launching requires a license key from the pool.
    pub needs_key: bool,
    /// Primary executable, relative to the install directory.
    pub executable: Option<String>,
    /// JSON array of alternative executables.
    pub executables: String,
    pub install_script: Option<String>,
    pub uninstall_script: Option<String>,
    pub play_script: Option<String>,
    /// Visibility state; drafts are hidden from non-admin listings.
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema, Default)]
#[sqlx(rename_all = "lowercase")]
/// Visibility states stored in the database.
pub enum GameStatus {
    /// Published and visible to every client.
    Active,
    /// Hidden while an admin finishes the entry.
    #[default]
    Draft,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Draft => "draft",
        }
    }
}

impl Serialize for GameStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GameStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "active" | "Active" | "ACTIVE" => Ok(GameStatus::Active),
            "draft" | "Draft" | "DRAFT" => Ok(GameStatus::Draft),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["active", "draft"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema, Default)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
/// How a catalog entry is distributed to clients.
pub enum GameKind {
    /// Installed through the players' own Steam accounts.
    Steam,
    /// Served as downloadable archives.
    #[default]
    Archive,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for creating a catalog entry.
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 128))]
    pub game_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub header_image: Option<String>,
    pub image_card: Option<String>,
    pub hero_image: Option<String>,
    pub archives: Option<String>,
    #[serde(default)]
    pub kind: GameKind,
    #[serde(default)]
    pub needs_key: bool,
    pub executable: Option<String>,
    pub executables: Option<Vec<String>>,
    pub install_script: Option<String>,
    pub uninstall_script: Option<String>,
    pub play_script: Option<String>,
    #[serde(default)]
    pub status: GameStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for partially updating a catalog entry.
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub header_image: Option<String>,
    pub image_card: Option<String>,
    pub hero_image: Option<String>,
    pub archives: Option<String>,
    pub kind: Option<GameKind>,
    pub needs_key: Option<bool>,
    pub executable: Option<String>,
    pub executables: Option<Vec<String>>,
    pub install_script: Option<String>,
    pub uninstall_script: Option<String>,
    pub play_script: Option<String>,
    pub status: Option<GameStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Payload for flipping a catalog entry between draft and active.
pub struct UpdateGameStatusRequest {
    pub status: GameStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_tolerates_legacy_casings() {
        let a: GameStatus = serde_json::from_str("\"Active\"").unwrap();
        let d: GameStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(a, GameStatus::Active);
        assert_eq!(d, GameStatus::Draft);
        assert_eq!(
            serde_json::to_value(GameStatus::Draft).unwrap(),
            serde_json::json!("draft")
        );
    }

    #[test]
    fn create_request_defaults_to_hidden_draft() {
        let payload: CreateGameRequest = serde_json::from_value(serde_json::json!({
            "gameId": "steam:440",
            "name": "Team Fortress 2"
        }))
        .unwrap();
        assert_eq!(payload.status, GameStatus::Draft);
        assert_eq!(payload.kind, GameKind::Archive);
        assert!(!payload.needs_key);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn game_serializes_camel_case() {
        let now = Utc::now();
        let game = Game {
            id: 7,
            game_id: "steam:440".to_string(),
            name: "Team Fortress 2".to_string(),
            description: String::new(),
            icon: None,
            logo: None,
            header_image: Some("https://example/header.jpg".to_string()),
            image_card: None,
            hero_image: None,
            archives: None,
            kind: GameKind::Steam,
            needs_key: true,
            executable: None,
            executables: "[]".to_string(),
            install_script: None,
            uninstall_script: None,
            play_script: None,
            status: GameStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["gameId"], "steam:440");
        assert_eq!(json["headerImage"], "https://example/header.jpg");
        assert_eq!(json["needsKey"], true);
        assert_eq!(json["kind"], "steam");
    }
}
