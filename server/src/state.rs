use std::sync::Arc;

use crate::{
    bus::EventBus,
    config::Config,
    db::DbPool,
    middleware::rate_limit::RateLimiter,
    services::{steam::SteamService, updates::UpdateService},
    utils::password,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub bus: Arc<EventBus>,
    pub login_limiter: RateLimiter,
    pub steam: SteamService,
    pub updates: UpdateService,
    admin_password_hash: Arc<String>,
}

impl AppState {
    /// Builds the state, hashing the admin password once at startup so login
    /// requests only ever compare against the digest.
    pub fn new(pool: DbPool, config: Config) -> anyhow::Result<Self> {
        let admin_password_hash = Arc::new(password::hash_password(&config.admin_password)?);
        let steam = SteamService::new(config.steam_api_key.clone(), config.steam_user_id.clone())?;
        let updates = UpdateService::new(config.update_feed_repo.clone())?;

        Ok(Self {
            pool,
            config,
            bus: Arc::new(EventBus::default()),
            login_limiter: RateLimiter::login(),
            steam,
            updates,
            admin_password_hash,
        })
    }

    pub fn admin_password_hash(&self) -> &str {
        &self.admin_password_hash
    }
}
