//! Integration tests for category pages and product creation/editing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The shop server running (cargo run -p copperpot-shop)
//!
//! Run with: cargo test -p copperpot-integration-tests -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;

use copperpot_integration_tests::{base_url, client, no_redirect_client};

/// A name unlikely to collide across test runs.
fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{prefix}-{nanos}")
}

/// Find the id in the first `{needle}{id}` link of a rendered page whose
/// surrounding anchor mentions `name`.
fn extract_id(body: &str, needle: &str, name: &str) -> Option<i32> {
    for (idx, _) in body.match_indices(needle) {
        let tail = &body[idx + needle.len()..];
        let end = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
        let Ok(id) = tail[..end].parse::<i32>() else {
            continue;
        };
        // The anchor text follows shortly after the href.
        if tail[end..tail.len().min(end + 200)].contains(name) {
            return Some(id);
        }
    }
    None
}

/// Create a category via the index form and return its id.
async fn create_category(client: &reqwest::Client, base_url: &str, name: &str) -> i32 {
    let resp = client
        .post(format!("{base_url}/"))
        .form(&[("name", name)])
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(name), "new category missing from re-render");
    extract_id(&body, "href=\"/category/", name).expect("category id not found in page")
}

// ============================================================================
// Category index
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn category_creation_rerenders_with_new_category() {
    let client = client();
    let base_url = base_url();

    let name = unique_name("shoes");
    create_category(&client, &base_url, &name).await;

    // The category persists beyond the re-render.
    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to get index");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&name));
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn blank_category_name_rerenders_with_errors() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/"))
        .form(&[("name", "   ")])
        .send()
        .await
        .expect("Failed to post category form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("This field is required."));
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn missing_category_page_is_404() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/category/99999999"))
        .send()
        .await
        .expect("Failed to get category page");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Product creation under a category
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn product_creation_extends_the_category_page() {
    let client = client();
    let base_url = base_url();

    let category_id = create_category(&client, &base_url, &unique_name("tools")).await;

    let before = client
        .get(format!("{base_url}/category/{category_id}"))
        .send()
        .await
        .expect("Failed to get category page")
        .text()
        .await
        .expect("Failed to read response");
    let rows_before = before.matches("href=\"/product/").count();

    let product_name = unique_name("gadget");
    let resp = client
        .post(format!("{base_url}/category/{category_id}"))
        .form(&[
            ("name", product_name.as_str()),
            ("price", "5"),
            ("amount", "3"),
            ("description", "x"),
        ])
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&product_name));
    let rows_after = body.matches("href=\"/product/").count();
    assert!(rows_after > rows_before, "product list did not grow");
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn invalid_product_form_keeps_values_and_shows_errors() {
    let client = client();
    let base_url = base_url();

    let category_id = create_category(&client, &base_url, &unique_name("misc")).await;

    let resp = client
        .post(format!("{base_url}/category/{category_id}"))
        .form(&[
            ("name", "Halfway"),
            ("price", "not-a-number"),
            ("amount", "3"),
            ("description", "x"),
        ])
        .send()
        .await
        .expect("Failed to post product form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Enter a number."));
    // Submitted values are redisplayed in the form.
    assert!(body.contains("value=\"Halfway\""));
    assert!(body.contains("value=\"not-a-number\""));
}

// ============================================================================
// Product edit (partial update)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn editing_with_blank_amount_keeps_the_stored_amount() {
    let client = no_redirect_client();
    let base_url = base_url();

    let category_id = create_category(&client, &base_url, &unique_name("lamps")).await;
    let product_name = unique_name("desk-lamp");

    let body = client
        .post(format!("{base_url}/category/{category_id}"))
        .form(&[
            ("name", product_name.as_str()),
            ("price", "12.50"),
            ("amount", "7"),
            ("description", "warm light"),
        ])
        .send()
        .await
        .expect("Failed to create product")
        .text()
        .await
        .expect("Failed to read response");
    let product_id =
        extract_id(&body, "href=\"/product/", &product_name).expect("product id not found");

    // Rename, leave amount (and everything else) blank.
    let renamed = unique_name("arc-lamp");
    let resp = client
        .post(format!("{base_url}/product/{product_id}/edit"))
        .form(&[
            ("name", renamed.as_str()),
            ("price", ""),
            ("amount", ""),
            ("description", ""),
            ("category", ""),
        ])
        .send()
        .await
        .expect("Failed to post edit form");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/products")
    );

    let detail = client
        .get(format!("{base_url}/product/{product_id}"))
        .send()
        .await
        .expect("Failed to get product detail")
        .text()
        .await
        .expect("Failed to read response");
    assert!(detail.contains(&renamed), "name change was not applied");
    assert!(detail.contains("<dd>7</dd>"), "stored amount changed");
    assert!(detail.contains("$12.50"), "stored price changed");
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn invalid_edit_rerenders_with_stored_values() {
    let client = client();
    let base_url = base_url();

    let category_id = create_category(&client, &base_url, &unique_name("chairs")).await;
    let product_name = unique_name("stool");

    let body = client
        .post(format!("{base_url}/category/{category_id}"))
        .form(&[
            ("name", product_name.as_str()),
            ("price", "30"),
            ("amount", "2"),
            ("description", "three legs"),
        ])
        .send()
        .await
        .expect("Failed to create product")
        .text()
        .await
        .expect("Failed to read response");
    let product_id =
        extract_id(&body, "href=\"/product/", &product_name).expect("product id not found");

    let resp = client
        .post(format!("{base_url}/product/{product_id}/edit"))
        .form(&[("name", "Ignored"), ("price", "free"), ("amount", "")])
        .send()
        .await
        .expect("Failed to post edit form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Enter a number."));
    // Submitted data is discarded; the form shows the stored values.
    assert!(body.contains(&format!("value=\"{product_name}\"")));
    assert!(!body.contains("value=\"Ignored\""));
}
