use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

pub type DbPool = SqlitePool;

/// Opens the on-disk database, creating the file on first start, and brings
/// the schema up to date.
pub async fn create_pool(database_path: &str) -> anyhow::Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", database_path))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    tracing::info!(path = %database_path, "Database ready");
    Ok(pool)
}

/// In-memory database for tests. A single connection keeps every query on
/// the same ephemeral database.
pub async fn create_pool_in_memory() -> anyhow::Result<DbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
