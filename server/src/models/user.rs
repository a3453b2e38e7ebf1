//! Models for player accounts and role metadata.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Database representation of a player account.
pub struct User {
    /// Unique identifier for the account.
    pub id: i64,
    /// Display name, unique across the LAN.
    pub name: String,
    /// Machine identifier reported by the launcher, unique when present.
    pub client_id: Option<String>,
    /// Argon2 hash of the account password, absent for launcher-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Role describing the account's privileges.
    pub role: Role,
    /// Inline avatar image (data URL) or path.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema, Default)]
#[sqlx(rename_all = "lowercase")]
/// Privilege tiers recognized by the access control filter.
pub enum Role {
    /// Anonymous principal; never stored in the database.
    Guest,
    /// Registered player.
    #[default]
    User,
    /// Operator with full control of the library.
    Admin,
}

impl Role {
    /// Returns the canonical lowercase representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from a token claim, tolerating legacy casings.
    pub fn parse(value: &str) -> Option<Role> {
        match value.to_ascii_lowercase().as_str() {
            "guest" => Some(Role::Guest),
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "guest" | "Guest" | "GUEST" => Ok(Role::Guest),
            "user" | "User" | "USER" => Ok(Role::User),
            "admin" | "Admin" | "ADMIN" => Ok(Role::Admin),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["guest", "user", "admin"],
            )),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for the admin console login.
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Successful login: a signed bearer token and when it stops working.
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
/// Who the server thinks the caller is, with every permission granted.
pub struct MeResponse {
    pub name: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for self-service launcher registration.
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub client_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload for updating portions of an existing account.
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub client_id: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
}
