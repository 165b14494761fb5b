//! Category route handlers: the index page and the category detail page
//! with its product creation form.
//!
//! Both POST handlers re-render their page instead of redirecting, so a
//! failed submit keeps the entered values and error messages in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
};
use tracing::instrument;

use copperpot_core::CategoryId;

use crate::db::NewProduct;
use crate::error::AppError;
use crate::filters;
use crate::forms::{CategoryInput, FormErrors, ProductInput};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Category index page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<Category>,
    pub form: CategoryInput,
    pub errors: FormErrors,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: Category,
    pub products: Vec<Product>,
    pub form: ProductInput,
    pub errors: FormErrors,
}

/// Display the category list and an empty creation form.
pub async fn index(State(state): State<AppState>) -> Result<CategoriesIndexTemplate, AppError> {
    let categories = state.categories().list_all().await?;

    Ok(CategoriesIndexTemplate {
        categories,
        form: CategoryInput::default(),
        errors: FormErrors::default(),
    })
}

/// Create a category and re-render the index.
///
/// On success the refreshed list includes the new category and the form is
/// reset; on validation failure the submitted value is redisplayed with its
/// errors.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CategoryInput>,
) -> Result<CategoriesIndexTemplate, AppError> {
    match form.validate() {
        Ok(name) => {
            let category = state.categories().create(&name).await?;
            tracing::info!(category_id = %category.id, "category created");

            let categories = state.categories().list_all().await?;
            Ok(CategoriesIndexTemplate {
                categories,
                form: CategoryInput::default(),
                errors: FormErrors::default(),
            })
        }
        Err(errors) => {
            let categories = state.categories().list_all().await?;
            Ok(CategoriesIndexTemplate {
                categories,
                form,
                errors,
            })
        }
    }
}

/// Display a category with its products and an empty product form.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<CategoryShowTemplate, AppError> {
    let id = CategoryId::new(id);
    let category = state
        .categories()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    let products = state.products().list_by_category(id).await?;

    Ok(CategoryShowTemplate {
        category,
        products,
        form: ProductInput::default(),
        errors: FormErrors::default(),
    })
}

/// Create a product under a category and re-render the page.
///
/// On success the product list is refetched and the form reset; on
/// validation failure the page keeps the list fetched before validation and
/// redisplays the submitted values with their errors.
#[instrument(skip(state, form))]
pub async fn create_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductInput>,
) -> Result<CategoryShowTemplate, AppError> {
    let id = CategoryId::new(id);
    let category = state
        .categories()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    let products = state.products().list_by_category(id).await?;

    match form.validate_new() {
        Ok(valid) => {
            let product = state
                .products()
                .create(&NewProduct {
                    name: valid.name,
                    price: valid.price,
                    amount: valid.amount,
                    description: valid.description,
                    category_id: id,
                })
                .await?;
            tracing::info!(product_id = %product.id, category_id = %id, "product created");

            let products = state.products().list_by_category(id).await?;
            Ok(CategoryShowTemplate {
                category,
                products,
                form: ProductInput::default(),
                errors: FormErrors::default(),
            })
        }
        Err(errors) => Ok(CategoryShowTemplate {
            category,
            products,
            form,
            errors,
        }),
    }
}
