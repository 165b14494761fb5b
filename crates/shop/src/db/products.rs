//! Product repository: CRUD plus the filtered/sorted/paginated listing query.

use sqlx::PgPool;

use copperpot_core::{CategoryId, Price, ProductId};

use super::RepositoryError;
use crate::models::{Product, ProductDetail};

/// Sort order for the product listing.
///
/// The accepted query-parameter values mirror the listing UI: `name`,
/// `-name`, `price`, `-price`. Anything else is rejected by [`parse`]
/// and callers fall back to the default.
///
/// [`parse`]: ProductOrder::parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductOrder {
    /// Parse a query-parameter value against the allow-list.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::NameAsc),
            "-name" => Some(Self::NameDesc),
            "price" => Some(Self::PriceAsc),
            "-price" => Some(Self::PriceDesc),
            _ => None,
        }
    }

    /// The query-parameter form, for echoing back into links and selects.
    #[must_use]
    pub const fn as_query_param(self) -> &'static str {
        match self {
            Self::NameAsc => "name",
            Self::NameDesc => "-name",
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
        }
    }

    /// The ORDER BY clause. `id` breaks ties so pagination is stable.
    const fn sql(self) -> &'static str {
        match self {
            Self::NameAsc => "name ASC, id ASC",
            Self::NameDesc => "name DESC, id DESC",
            Self::PriceAsc => "price ASC, id ASC",
            Self::PriceDesc => "price DESC, id DESC",
        }
    }
}

/// Parameters for the product listing query.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    /// Substring filter on the product name.
    pub name_contains: String,
    /// Inclusive lower price bound.
    pub min_price: Price,
    /// Inclusive upper price bound.
    pub max_price: Price,
    /// Sort order.
    pub order_by: ProductOrder,
    /// 1-based page index.
    pub page: u32,
    /// Page size, at least 1.
    pub size: u32,
}

/// One page of the product listing.
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// Products on this page, in query order.
    pub items: Vec<Product>,
    /// 1-based index of this page, clamped into range.
    pub page: u32,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Total number of products matching the filter.
    pub total_items: u64,
}

impl ProductPage {
    /// Page indices for the pagination links.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<u32> {
        (1..=self.total_pages).collect()
    }

    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Fields for inserting a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub amount: i32,
    pub description: String,
    pub category_id: CategoryId,
}

/// Partial update for a product.
///
/// `None` fields keep the stored value (the edit form treats a blank field
/// as "leave unchanged").
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub amount: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

const PRODUCT_COLUMNS: &str = "id, name, price, amount, description, category_id, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product joined with its category name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_detail(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let detail = sqlx::query_as::<_, ProductDetail>(
            "SELECT p.id, p.name, p.price, p.amount, p.description, p.category_id, \
                    c.name AS category_name \
             FROM shop.product p \
             JOIN shop.category c ON c.id = p.category_id \
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(detail)
    }

    /// List the products of one category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE category_id = $1 ORDER BY name, id"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// The highest price across all products, or `None` for an empty catalog.
    ///
    /// Used as the listing's default upper price bound.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn max_price(&self) -> Result<Option<Price>, RepositoryError> {
        let max: Option<Price> = sqlx::query_scalar("SELECT MAX(price) FROM shop.product")
            .fetch_one(self.pool)
            .await?;

        Ok(max)
    }

    /// Run the filtered/sorted/paginated listing query.
    ///
    /// A product matches when its name contains `name_contains` (store
    /// collation, case-sensitive LIKE) and its price lies in
    /// `[min_price, max_price]` inclusive. The requested page is clamped
    /// into `[1, total_pages]`, so an out-of-range page returns the last
    /// page rather than an empty one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError> {
        let pattern = like_pattern(&query.name_contains);
        let size = query.size.max(1);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shop.product \
             WHERE name LIKE $1 AND price >= $2 AND price <= $3",
        )
        .bind(&pattern)
        .bind(query.min_price)
        .bind(query.max_price)
        .fetch_one(self.pool)
        .await?;

        let total_items = u64::try_from(total).unwrap_or(0);
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
        let total_pages = total_pages.max(1);
        let page = query.page.clamp(1, total_pages);
        let offset = i64::from(page - 1) * i64::from(size);

        let items = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product \
             WHERE name LIKE $1 AND price >= $2 AND price <= $3 \
             ORDER BY {} LIMIT $4 OFFSET $5",
            query.order_by.sql()
        ))
        .bind(&pattern)
        .bind(query.min_price)
        .bind(query.max_price)
        .bind(i64::from(size))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(ProductPage {
            items,
            page,
            total_pages,
            total_items,
        })
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for an unknown category).
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO shop.product (name, price, amount, description, category_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.price)
        .bind(new.amount)
        .bind(&new.description)
        .bind(new.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// `None` fields keep their stored values (COALESCE against the bound
    /// NULLs). Returns the updated row, or `None` if the product no longer
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE shop.product \
             SET name = COALESCE($2, name), \
                 price = COALESCE($3, price), \
                 amount = COALESCE($4, amount), \
                 description = COALESCE($5, description), \
                 category_id = COALESCE($6, category_id) \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.price)
        .bind(changes.amount)
        .bind(changes.description.as_deref())
        .bind(changes.category_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product by its ID.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    /// Basket rows referencing the product cascade away.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Build a LIKE pattern matching the filter as a literal substring.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parse_accepts_only_the_allow_list() {
        assert_eq!(ProductOrder::parse("name"), Some(ProductOrder::NameAsc));
        assert_eq!(ProductOrder::parse("-name"), Some(ProductOrder::NameDesc));
        assert_eq!(ProductOrder::parse("price"), Some(ProductOrder::PriceAsc));
        assert_eq!(ProductOrder::parse("-price"), Some(ProductOrder::PriceDesc));
        assert_eq!(ProductOrder::parse("id"), None);
        assert_eq!(ProductOrder::parse("price; DROP TABLE"), None);
        assert_eq!(ProductOrder::parse(""), None);
    }

    #[test]
    fn order_roundtrips_through_query_param() {
        for order in [
            ProductOrder::NameAsc,
            ProductOrder::NameDesc,
            ProductOrder::PriceAsc,
            ProductOrder::PriceDesc,
        ] {
            assert_eq!(ProductOrder::parse(order.as_query_param()), Some(order));
        }
    }

    #[test]
    fn default_order_is_name_ascending() {
        assert_eq!(ProductOrder::default(), ProductOrder::NameAsc);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("widget"), "%widget%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }

    #[test]
    fn page_navigation_flags() {
        let page = ProductPage {
            items: Vec::new(),
            page: 2,
            total_pages: 3,
            total_items: 30,
        };
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.page_numbers(), vec![1, 2, 3]);

        let single = ProductPage {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_items: 0,
        };
        assert!(!single.has_previous());
        assert!(!single.has_next());
    }
}
