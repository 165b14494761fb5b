//! Catalog domain types.

use chrono::{DateTime, Utc};

use copperpot_core::{CategoryId, Price, ProductId};

/// A product category.
///
/// Categories are created from the index page and never updated or deleted
/// through this service. Deleting a category row cascades to its products.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// A product in the catalog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price, non-negative.
    pub price: Price,
    /// Units in stock, non-negative.
    pub amount: i32,
    /// Free-text description.
    pub description: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// A product joined with its category name, for the detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub amount: i32,
    pub description: String,
    pub category_id: CategoryId,
    pub category_name: String,
}
