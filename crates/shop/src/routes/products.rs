//! Product route handlers: listing, detail, edit, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use copperpot_core::{Price, ProductId};

use crate::db::{ProductOrder, ProductPage, ProductQuery};
use crate::error::AppError;
use crate::filters;
use crate::forms::{FormErrors, ProductInput};
use crate::middleware::flash;
use crate::models::{Category, Product, ProductDetail};
use crate::state::AppState;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 12;

/// Page sizes offered by the listing UI. Not server-enforced; any positive
/// size is accepted.
const PAGE_SIZES: [u32; 4] = [4, 8, 12, 24];

/// Listing query parameters.
///
/// Every field arrives as a raw string so a malformed value falls back to
/// its default instead of rejecting the whole request; the listing never
/// turns a bad filter into an error page.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub order_by: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: ProductPage,
    /// Page numbers paired with "is the current page".
    pub pages: Vec<(u32, bool)>,
    /// Size options paired with "is the selected size".
    pub sizes: Vec<(u32, bool)>,
    pub size: u32,
    pub name: String,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub order_by: &'static str,
    pub flash: Vec<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetail,
}

/// Product edit page template.
///
/// The form always shows the product's stored values: on GET they are the
/// prefill, and after a failed submit the invalid input is discarded and the
/// stored values are redisplayed alongside the errors.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub product: Product,
    pub categories: Vec<Category>,
    pub errors: FormErrors,
}

/// Display the product listing with filtering, sorting, and pagination.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    session: Session,
) -> Result<ProductsIndexTemplate, AppError> {
    let flash = flash::take_messages(&session).await;

    let name = query.name.unwrap_or_default();
    let min_price = query
        .min_price
        .as_deref()
        .and_then(|raw| Price::parse(raw).ok())
        .unwrap_or(Price::ZERO);
    let max_price = match query
        .max_price
        .as_deref()
        .and_then(|raw| Price::parse(raw).ok())
    {
        Some(price) => price,
        // Default upper bound: the most expensive product, or zero for an
        // empty catalog.
        None => state.products().max_price().await?.unwrap_or(Price::ZERO),
    };
    let order_by = query
        .order_by
        .as_deref()
        .and_then(ProductOrder::parse)
        .unwrap_or_default();
    let size = parse_or(query.size.as_deref(), DEFAULT_SIZE).max(1);

    let page = state
        .products()
        .search(&ProductQuery {
            name_contains: name.clone(),
            min_price,
            max_price,
            order_by,
            page: parse_or(query.page.as_deref(), DEFAULT_PAGE).max(1),
            size,
        })
        .await?;

    let pages = page
        .page_numbers()
        .into_iter()
        .map(|p| (p, p == page.page))
        .collect();
    let sizes = PAGE_SIZES.into_iter().map(|s| (s, s == size)).collect();

    Ok(ProductsIndexTemplate {
        page,
        pages,
        sizes,
        size,
        name,
        min_price: min_price.amount(),
        max_price: max_price.amount(),
        order_by: order_by.as_query_param(),
        flash,
    })
}

/// Parse an optional numeric query parameter, falling back on anything
/// absent or malformed.
fn parse_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Display the product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductShowTemplate, AppError> {
    let product = state
        .products()
        .get_detail(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate { product })
}

/// Display the product edit form, prefilled with the stored values.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductEditTemplate, AppError> {
    let product = state
        .products()
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let categories = state.categories().list_all().await?;

    Ok(ProductEditTemplate {
        product,
        categories,
        errors: FormErrors::default(),
    })
}

/// Apply a product edit.
///
/// Blank fields keep their stored values. On success the caller is
/// redirected to the listing; on validation failure the edit page is
/// re-rendered with the stored values and the error messages.
#[instrument(skip(state, form))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductInput>,
) -> Result<Response, AppError> {
    let id = ProductId::new(id);
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let changes = match form.validate_edit() {
        Ok(changes) => changes,
        Err(errors) => return render_edit(&state, product, errors).await,
    };

    // The selector only offers existing categories, but the id still comes
    // from the client.
    if let Some(category_id) = changes.category_id {
        if state.categories().get(category_id).await?.is_none() {
            let mut errors = FormErrors::default();
            errors.push("category", "Select a valid category.");
            return render_edit(&state, product, errors).await;
        }
    }

    let updated = state
        .products()
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    tracing::info!(product_id = %updated.id, "product updated");

    Ok(Redirect::to("/products").into_response())
}

async fn render_edit(
    state: &AppState,
    product: Product,
    errors: FormErrors,
) -> Result<Response, AppError> {
    let categories = state.categories().list_all().await?;
    Ok(ProductEditTemplate {
        product,
        categories,
        errors,
    }
    .into_response())
}

/// Delete a product and redirect to the listing.
///
/// Deleting a product that no longer exists is not a fault: the listing is
/// shown with a flash message instead.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let deleted = state.products().delete(ProductId::new(id)).await?;

    if deleted {
        tracing::info!(product_id = id, "product deleted");
    } else {
        tracing::warn!(product_id = id, "delete requested for missing product");
        if let Err(e) =
            flash::push_message(&session, "Could not delete product since it does not exist").await
        {
            tracing::error!("Failed to store flash message: {e}");
        }
    }

    Ok(Redirect::to("/products"))
}
