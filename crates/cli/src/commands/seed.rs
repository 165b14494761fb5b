//! Seed the database with demo categories and products.
//!
//! Drives the same repositories the web application uses, so seeded rows go
//! through identical insert paths.

use tracing::info;

use copperpot_core::Price;
use copperpot_shop::db::{self, CategoryRepository, NewProduct, ProductRepository};

/// Demo catalog: categories with (name, price, amount, description) rows.
const DEMO_CATALOG: &[(&str, &[(&str, &str, i32, &str)])] = &[
    (
        "Kitchen",
        &[
            ("Copper Pot", "49.99", 12, "A 2-quart copper pot with a tin lining."),
            ("Cast Iron Skillet", "34.50", 8, "Pre-seasoned 10-inch skillet."),
            ("Wooden Spoon", "4.25", 60, "Beechwood spoon, 30 cm."),
        ],
    ),
    (
        "Garden",
        &[
            ("Watering Can", "18.00", 15, "Galvanized steel, 5 litres."),
            ("Pruning Shears", "22.75", 9, "Bypass shears with ash handles."),
        ],
    ),
    (
        "Stationery",
        &[
            ("Field Notebook", "6.50", 40, "Dot grid, 64 pages."),
            ("Fountain Pen", "28.00", 5, "Fine nib, converter included."),
        ],
    ),
];

/// Insert the demo catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::migrate::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let mut product_count = 0usize;
    for (category_name, items) in DEMO_CATALOG {
        let category = categories.create(category_name).await?;
        info!(category_id = %category.id, name = category_name, "category created");

        for &(name, price, amount, description) in *items {
            products
                .create(&NewProduct {
                    name: name.to_owned(),
                    price: Price::parse(price)?,
                    amount,
                    description: description.to_owned(),
                    category_id: category.id,
                })
                .await?;
            product_count += 1;
        }
    }

    info!(
        categories = DEMO_CATALOG.len(),
        products = product_count,
        "Seeding complete!"
    );
    Ok(())
}
