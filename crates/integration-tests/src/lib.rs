//! Integration tests for Stride.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stride-integration-tests
//! ```
//!
//! No external services are needed: the storefront runs against a fixture
//! catalog and writes visitor stores under a fresh temp directory.
//!
//! # Test Categories
//!
//! - `store_persistence` - Cart and wishlist stores over file storage
//! - `storefront_listing` - Listing and detail routes driven in-process
//! - `storefront_shopping` - Cart and wishlist flows over a real socket with
//!   the session cookie

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use rust_decimal::Decimal;
use uuid::Uuid;

use stride_core::ProductDocument;
use stride_core::pagination::DEFAULT_PAGE_SIZE;
use stride_storefront::catalog::FileCatalog;
use stride_storefront::config::{CatalogConfig, StorefrontConfig};
use stride_storefront::state::AppState;

/// A fresh directory under the system temp dir.
#[must_use]
pub fn temp_data_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stride-{prefix}-{}", Uuid::new_v4()))
}

/// A catalog record with every required field set.
#[must_use]
pub fn document(
    id: &str,
    name: &str,
    category: &str,
    price: i64,
    colors: &[&str],
) -> ProductDocument {
    ProductDocument {
        id: Some(id.to_string()),
        product_name: Some(name.to_string()),
        category: Some(category.to_string()),
        price: Some(Decimal::new(price, 0)),
        inventory: Some(10),
        colors: Some(colors.iter().map(|c| (*c).to_string()).collect()),
        status: Some("In Stock".to_string()),
        image_url: Some(format!("https://cdn.example.com/{id}.png")),
        description: Some(format!("{name} description")),
        slug: Some(id.to_string()),
    }
}

/// Twelve valid products across three categories, plus one record with no
/// image (`broken-record`) that fails validation.
#[must_use]
pub fn fixture_documents() -> Vec<ProductDocument> {
    vec![
        document("air-max-90", "Air Max 90", "Men's Shoes", 12995, &["Red", "White"]),
        document("air-force-1", "Air Force 1", "Men's Shoes", 7495, &["White"]),
        document("pegasus-40", "Pegasus 40", "Men's Shoes", 11895, &["Black", "Blue"]),
        document("blazer-mid", "Blazer Mid", "Men's Shoes", 8695, &["White", "Black"]),
        document("dunk-low", "Dunk Low", "Women's Shoes", 8295, &["Pink"]),
        document("cortez", "Cortez", "Women's Shoes", 6995, &["White", "Red"]),
        document("invincible-3", "Invincible 3", "Women's Shoes", 14995, &["Blue"]),
        document("metcon-9", "Metcon 9", "Women's Shoes", 10795, &["Black"]),
        document("club-tee", "Club Tee", "Women's T-Shirts", 1495, &["Black"]),
        document("essential-tee", "Essential Tee", "Women's T-Shirts", 1995, &["White"]),
        document("boxy-tee", "Boxy Tee", "Women's T-Shirts", 2495, &["Green"]),
        document("crop-tee", "Crop Tee", "Women's T-Shirts", 1795, &["Pink", "White"]),
        ProductDocument {
            image_url: None,
            ..document("broken-record", "Broken Record", "Men's Shoes", 5000, &[])
        },
    ]
}

/// Configuration pointing at `data_dir`, with a file catalog that is never
/// read (tests inject the catalog directly).
#[must_use]
pub fn test_config(data_dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        data_dir: data_dir.to_path_buf(),
        page_size: DEFAULT_PAGE_SIZE,
        catalog: CatalogConfig::File(data_dir.join("products.json")),
        sentry_dsn: None,
        sentry_environment: None,
        log_json: false,
    }
}

/// A storefront over the fixture catalog with its own data directory.
///
/// The directory is removed on drop.
pub struct TestApp {
    pub state: AppState,
    pub data_dir: PathBuf,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_documents(fixture_documents())
    }

    #[must_use]
    pub fn with_documents(documents: Vec<ProductDocument>) -> Self {
        let data_dir = temp_data_dir("app");
        let state = AppState::with_catalog(
            test_config(&data_dir),
            Arc::new(FileCatalog::new(documents)),
        );
        Self { state, data_dir }
    }

    /// The full router, ready for `oneshot` or `axum::serve`.
    #[must_use]
    pub fn router(&self) -> Router {
        stride_storefront::app(self.state.clone())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

/// A storefront served on an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub app: TestApp,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve a fresh [`TestApp`] on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let app = TestApp::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let router = app.router();

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            app,
            task,
        }
    }

    /// A client that keeps the session cookie, i.e. one visitor.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn visitor(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
