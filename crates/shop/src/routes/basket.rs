//! Basket route handlers.
//!
//! Every handler here requires an authenticated session user via
//! [`RequireAuth`]; unauthenticated callers are redirected to the login
//! page before the handler runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use copperpot_core::{BasketItemId, Price, ProductId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::BasketLine;
use crate::models::basket::subtotal;
use crate::state::AppState;

/// Basket page template.
#[derive(Template, WebTemplate)]
#[template(path = "basket/show.html")]
pub struct BasketShowTemplate {
    pub lines: Vec<BasketLine>,
    pub subtotal: Price,
    pub username: String,
}

/// Display the caller's basket.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<BasketShowTemplate, AppError> {
    let lines = state.basket().list_for_owner(user.id).await?;
    let subtotal = subtotal(&lines);

    Ok(BasketShowTemplate {
        lines,
        subtotal,
        username: user.username,
    })
}

/// Add a product to the caller's basket, or bump its amount.
///
/// A single upsert per request: either a new row with amount 1 or an
/// increment of the existing row.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<i32>,
) -> Result<Redirect, AppError> {
    let product = state
        .products()
        .get(ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let item = state.basket().add_or_increment(product.id, user.id).await?;
    tracing::info!(
        product_id = %product.id,
        owner_id = %user.id,
        amount = item.amount,
        "basket item upserted"
    );

    Ok(Redirect::to("/basket"))
}

/// Remove a basket item by its own ID (not the product's).
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(basket_item_id): Path<i32>,
) -> Result<Redirect, AppError> {
    let removed = state
        .basket()
        .delete_for_owner(BasketItemId::new(basket_item_id), user.id)
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!(
            "basket item {basket_item_id}"
        )));
    }
    tracing::info!(basket_item_id, owner_id = %user.id, "basket item removed");

    Ok(Redirect::to("/basket"))
}
