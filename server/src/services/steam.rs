//! Steam Web API client for importing the house account's library.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::error::AppError;

const OWNED_GAMES_URL: &str = "https://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/";
const APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";
const CDN_BASE: &str = "https://steamcdn-a.akamaihd.net/steam/apps";
const ICON_BASE: &str = "https://media.steampowered.com/steamcommunity/public/images/apps";

const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// One entry of the configured account's library.
pub struct OwnedGame {
    pub appid: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img_icon_url: String,
    #[serde(default)]
    pub playtime_forever: i64,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    response: OwnedGamesBody,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesBody {
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct AppDetailsEntry {
    success: bool,
    data: Option<AppDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppDetails {
    pub steam_appid: i64,
    pub name: String,
    #[serde(default)]
    pub detailed_description: String,
}

/// Artwork locations derived for one app.
#[derive(Debug, Clone)]
pub struct AppArtwork {
    pub icon: Option<String>,
    pub logo: String,
    pub header_image: String,
    pub hero_image: String,
    pub image_card: String,
}

struct OwnedGamesCache {
    fetched_at: Instant,
    games: Vec<OwnedGame>,
}

/// Cheap to clone; the cache is shared behind an `Arc`.
#[derive(Clone)]
pub struct SteamService {
    client: reqwest::Client,
    api_key: String,
    user_id: String,
    cache: Arc<Mutex<Option<OwnedGamesCache>>>,
}

impl SteamService {
    pub fn new(api_key: String, user_id: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            user_id,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.api_key.is_empty() || self.user_id.is_empty() {
            return Err(AppError::BadRequest(
                "Steam is not configured; set STEAM_API_KEY and STEAM_USER_ID".to_string(),
            ));
        }
        Ok(())
    }

    /// Library of the configured account. Served from the in-process cache
    /// for five minutes to keep repeated admin page loads off the API.
    pub async fn owned_games(&self) -> Result<Vec<OwnedGame>, AppError> {
        self.ensure_configured()?;

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < CACHE_TTL {
                return Ok(cached.games.clone());
            }
        }

        let envelope: OwnedGamesEnvelope = self
            .client
            .get(OWNED_GAMES_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", self.user_id.as_str()),
                ("include_appinfo", "true"),
                ("include_played_free_games", "true"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let games = envelope
            .response
            .games
            .ok_or_else(|| AppError::NotFound("Steam account has no games".to_string()))?;

        *cache = Some(OwnedGamesCache {
            fetched_at: Instant::now(),
            games: games.clone(),
        });
        Ok(games)
    }

    /// Storefront metadata for one app. Unknown apps come back as 404.
    pub async fn app_details(&self, appid: i64) -> Result<AppDetails, AppError> {
        let body: serde_json::Value = self
            .client
            .get(APP_DETAILS_URL)
            .query(&[("appids", appid.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entry: AppDetailsEntry = serde_json::from_value(
            body.get(appid.to_string())
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Steam app {} not found", appid)))?,
        )
        .map_err(|e| AppError::Upstream(format!("Unexpected appdetails payload: {}", e)))?;

        match entry {
            AppDetailsEntry {
                success: true,
                data: Some(data),
            } => Ok(data),
            _ => Err(AppError::NotFound(format!("Steam app {} not found", appid))),
        }
    }

    /// Artwork URLs for an app. The icon needs the hash from the owned
    /// list, so it is only present when the app is in the library.
    pub async fn artwork(&self, appid: i64) -> AppArtwork {
        let icon = match self.owned_games().await {
            Ok(games) => games
                .iter()
                .find(|g| g.appid == appid && !g.img_icon_url.is_empty())
                .map(|g| format!("{}/{}/{}.jpg", ICON_BASE, appid, g.img_icon_url)),
            Err(err) => {
                tracing::warn!(appid, "Could not resolve icon from owned games: {:?}", err);
                None
            }
        };

        AppArtwork {
            icon,
            logo: format!("{}/{}/logo.png", CDN_BASE, appid),
            header_image: format!("{}/{}/header.jpg", CDN_BASE, appid),
            hero_image: format!("{}/{}/library_hero.jpg", CDN_BASE, appid),
            image_card: format!("{}/{}/library_600x900.jpg", CDN_BASE, appid),
        }
    }
}
