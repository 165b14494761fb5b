//! Basket repository for database operations.
//!
//! The add path is a single atomic upsert against the UNIQUE
//! `(product_id, owner_id)` constraint, so two concurrent adds of the same
//! product by the same user serialize into one row with `amount = 2` rather
//! than racing a read-check into duplicate rows.

use sqlx::PgPool;

use copperpot_core::{BasketItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{BasketItem, BasketLine};

const BASKET_COLUMNS: &str = "id, product_id, owner_id, amount, created_at";

/// Repository for basket database operations.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    /// Create a new basket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's basket rows joined with their products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<BasketLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, BasketLine>(
            "SELECT b.id, b.product_id, p.name AS product_name, \
                    p.price AS unit_price, b.amount \
             FROM shop.basket_item b \
             JOIN shop.product p ON p.id = b.product_id \
             WHERE b.owner_id = $1 \
             ORDER BY b.created_at, b.id",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to a user's basket, or bump the existing row's amount.
    ///
    /// Inserts with `amount = 1`; on conflict with the `(product, owner)`
    /// UNIQUE constraint, increments the existing amount by 1 instead.
    /// Returns the row after the upsert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (including a
    /// foreign-key violation for a product deleted in between).
    pub async fn add_or_increment(
        &self,
        product: ProductId,
        owner: UserId,
    ) -> Result<BasketItem, RepositoryError> {
        let item = sqlx::query_as::<_, BasketItem>(&format!(
            "INSERT INTO shop.basket_item (product_id, owner_id) \
             VALUES ($1, $2) \
             ON CONFLICT (product_id, owner_id) \
             DO UPDATE SET amount = basket_item.amount + 1 \
             RETURNING {BASKET_COLUMNS}"
        ))
        .bind(product)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Delete a basket row by its own ID, scoped to its owner.
    ///
    /// The owner scope means a user cannot remove another user's line item.
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_for_owner(
        &self,
        id: BasketItemId,
        owner: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.basket_item WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
