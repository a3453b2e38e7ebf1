//! Launcher update feed backed by GitHub releases.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::AppError;
use tokio::sync::Mutex;

const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Lan-Nexus-Update-Server";

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub published_at: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: i64,
}

impl Release {
    /// Version with the conventional `v` prefix stripped.
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }
}

/// Picks the release asset a platform's updater can install.
pub fn asset_for_platform<'a>(release: &'a Release, platform: &str) -> Option<&'a ReleaseAsset> {
    release.assets.iter().find(|asset| {
        let name = asset.name.to_lowercase();
        match platform {
            "win32" => name.ends_with(".exe"),
            "darwin" => name.ends_with(".dmg") || name.ends_with(".zip"),
            "linux" => name.ends_with(".appimage") || name.ends_with(".deb"),
            _ => false,
        }
    })
}

/// Renders the feed body the launcher's updater polls for.
pub fn render_feed(release: &Release, asset: &ReleaseAsset) -> String {
    format!(
        "version: {}\nreleaseDate: {}\npath: {}\nsha512: \"\"\nurl: {}\n",
        release.version(),
        release.published_at,
        asset.name,
        asset.browser_download_url
    )
}

pub fn is_known_platform(platform: &str) -> bool {
    matches!(platform, "win32" | "darwin" | "linux")
}

struct ReleaseCache {
    fetched_at: Instant,
    release: Release,
}

#[derive(Clone)]
pub struct UpdateService {
    client: reqwest::Client,
    repo: String,
    cache: Arc<Mutex<Option<ReleaseCache>>>,
}

impl UpdateService {
    pub fn new(repo: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            repo,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    /// Latest release of the configured repository, cached for five
    /// minutes.
    pub async fn latest_release(&self) -> Result<Release, AppError> {
        if self.repo.is_empty() {
            return Err(AppError::NotFound(
                "Update feed is not configured".to_string(),
            ));
        }

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < CACHE_TTL {
                return Ok(cached.release.clone());
            }
        }

        let release = self.fetch_release().await?;
        *cache = Some(ReleaseCache {
            fetched_at: Instant::now(),
            release: release.clone(),
        });
        Ok(release)
    }

    /// Fetches the latest release unconditionally and replaces the cache.
    pub async fn refresh_release(&self) -> Result<Release, AppError> {
        if self.repo.is_empty() {
            return Err(AppError::NotFound(
                "Update feed is not configured".to_string(),
            ));
        }

        let release = self.fetch_release().await?;
        let mut cache = self.cache.lock().await;
        *cache = Some(ReleaseCache {
            fetched_at: Instant::now(),
            release: release.clone(),
        });
        Ok(release)
    }

    async fn fetch_release(&self) -> Result<Release, AppError> {
        let url = format!("https://api.github.com/repos/{}/releases/latest", self.repo);
        let release = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(release)
    }
}
