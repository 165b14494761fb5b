//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ShopConfig;
use crate::db::{BasketRepository, CategoryRepository, ProductRepository};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, and the repositories built on top of the pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ShopConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Category repository over the shared pool.
    #[must_use]
    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self.pool())
    }

    /// Product repository over the shared pool.
    #[must_use]
    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.pool())
    }

    /// Basket repository over the shared pool.
    #[must_use]
    pub fn basket(&self) -> BasketRepository<'_> {
        BasketRepository::new(self.pool())
    }
}
