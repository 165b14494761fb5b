//! Database migration command.
//!
//! Applies the migrations embedded from `crates/shop/migrations/` to the
//! database named by `SHOP_DATABASE_URL` (falling back to `DATABASE_URL`).

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from the migrate command.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run shop database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to shop database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../shop/migrations").run(&pool).await?;

    tracing::info!("Shop migrations complete!");
    Ok(())
}

pub(crate) fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("SHOP_DATABASE_URL"))
}
