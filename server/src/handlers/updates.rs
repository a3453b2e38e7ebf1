use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    services::updates::{asset_for_platform, is_known_platform, render_feed},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub version: String,
    pub assets: Vec<SyncAsset>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncAsset {
    pub name: String,
    pub url: String,
    pub size: i64,
}

/// Serves the electron-updater feed for one platform.
pub async fn latest(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Response, AppError> {
    if !is_known_platform(&platform) {
        return Err(AppError::BadRequest(format!(
            "Unknown platform: {platform}"
        )));
    }

    let release = state.updates.latest_release().await?;
    let asset = asset_for_platform(&release, &platform).ok_or_else(|| {
        AppError::NotFound(format!("No release asset for platform {platform}"))
    })?;

    let feed = render_feed(&release, asset);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        feed,
    )
        .into_response())
}

/// Refreshes the release cache and reports what the feed would serve.
pub async fn sync(State(state): State<AppState>) -> Result<Json<SyncResponse>, AppError> {
    let release = state.updates.refresh_release().await?;
    let assets = release
        .assets
        .iter()
        .map(|asset| SyncAsset {
            name: asset.name.clone(),
            url: asset.browser_download_url.clone(),
            size: asset.size,
        })
        .collect();

    Ok(Json(SyncResponse {
        message: "Update feed synced".to_string(),
        version: release.version().to_string(),
        assets,
    }))
}
