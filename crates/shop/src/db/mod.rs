//! Database operations for the shop `PostgreSQL` database.
//!
//! # Schema: `shop`
//!
//! - `category` - Product categories
//! - `product` - Products, each owned by a category
//! - `basket_item` - Per-user basket rows, unique per `(product, owner)`
//!
//! Session storage lives in the `tower_sessions` schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/shop/migrations/` and run via:
//! ```bash
//! cargo run -p copperpot-cli -- migrate
//! ```

pub mod basket;
pub mod categories;
pub mod products;

pub use basket::BasketRepository;
pub use categories::CategoryRepository;
pub use products::{NewProduct, ProductChanges, ProductOrder, ProductPage, ProductQuery, ProductRepository};

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors returned by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An update targeted a row that no longer exists.
    #[error("row not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
