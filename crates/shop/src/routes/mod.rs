//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check
//!
//! # Catalog
//! GET  /                           - Category list + creation form
//! POST /                           - Create category
//! GET  /category/{id}              - Category detail + product creation form
//! POST /category/{id}              - Create product under category
//! GET  /products                   - Product listing (filter/sort/paginate)
//! GET  /product/{id}               - Product detail
//! GET  /product/{id}/edit          - Product edit form
//! POST /product/{id}/edit          - Apply product edit
//! POST /product/{id}/delete        - Delete product
//!
//! # Basket (requires auth)
//! GET  /basket                     - Basket page
//! POST /basket/add/{product_id}    - Add product / increment amount
//! POST /basket/remove/{id}         - Remove basket item
//! ```

pub mod basket;
pub mod categories;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/category/{id}",
            get(categories::show).post(categories::create_product),
        )
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        .route(
            "/product/{id}/edit",
            get(products::edit_form).post(products::edit),
        )
        .route("/product/{id}/delete", post(products::delete))
}

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/basket", get(basket::show))
        .route("/basket/add/{product_id}", post(basket::add))
        .route("/basket/remove/{basket_item_id}", post(basket::remove))
}

/// Create all routes for the shop.
pub fn routes() -> Router<AppState> {
    Router::new().merge(catalog_routes()).merge(basket_routes())
}
