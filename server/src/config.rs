use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub http_port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub admin_password: String,
    pub discovery_port: u16,
    pub steam_api_key: String,
    pub steam_user_id: String,
    pub update_feed_repo: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let http_port = parse_port("HTTP_PORT", env::var("HTTP_PORT").ok(), 8080)?;
        let discovery_port = parse_port("DISCOVERY_PORT", env::var("DISCOVERY_PORT").ok(), 50000)?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "lan-nexus.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development fallback");
            "dev-secret-change-this-in-production".to_string()
        });

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);

        let admin_password = env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow!("ADMIN_PASSWORD must be set"))?;
        if admin_password.is_empty() {
            return Err(anyhow!("ADMIN_PASSWORD must not be empty"));
        }

        let steam_api_key = env::var("STEAM_API_KEY").unwrap_or_default();
        let steam_user_id = env::var("STEAM_USER_ID").unwrap_or_default();
        let update_feed_repo =
            env::var("UPDATE_FEED_REPO").unwrap_or_else(|_| "Lan-Nexus/Client".to_string());

        Ok(Config {
            http_port,
            database_path,
            jwt_secret,
            jwt_expiration_hours,
            admin_password,
            discovery_port,
            steam_api_key,
            steam_user_id,
            update_feed_repo,
        })
    }
}

fn parse_port(var: &str, raw: Option<String>, default: u16) -> anyhow::Result<u16> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", var, raw)),
        None => Ok(default),
    }
}
