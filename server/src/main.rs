use std::net::SocketAddr;

use lan_nexus_server::{
    config::Config,
    db::create_pool,
    router::build_router,
    services::discovery::{self, DiscoveryResponse},
    state::AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lan_nexus_server=debug,tower_http=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        http_port = config.http_port,
        discovery_port = config.discovery_port,
        database_path = %config.database_path,
        jwt_secret = %mask_secret(&config.jwt_secret),
        jwt_expiration_hours = config.jwt_expiration_hours,
        update_feed_repo = %config.update_feed_repo,
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_path).await?;

    let state = AppState::new(pool, config.clone())?;

    // LAN discovery responder. Losing it degrades discovery, not the API.
    match discovery::bind(config.discovery_port).await {
        Ok(socket) => {
            tracing::info!(port = config.discovery_port, "Discovery responder listening");
            tokio::spawn(discovery::serve(
                socket,
                DiscoveryResponse::http(config.http_port),
            ));
        }
        Err(err) => {
            tracing::warn!(
                port = config.discovery_port,
                "Discovery responder unavailable: {}",
                err
            );
        }
    }

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutdown signal received");
}
