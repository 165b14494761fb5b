//! Integration tests for Copperpot.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p copperpot-cli -- migrate
//!
//! # Seed demo data and start the server
//! cargo run -p copperpot-cli -- seed
//! cargo run -p copperpot-shop
//!
//! # Run integration tests
//! cargo test -p copperpot-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP; they are `#[ignore]`d so a
//! plain `cargo test` stays green without one.

/// Base URL for the shop (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store, following redirects.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// HTTP client that does NOT follow redirects, for asserting on them.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
