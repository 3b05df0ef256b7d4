//! # Product Service Contract
//!
//! The remote product/auth service as the dashboard sees it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation          HTTP                          Answer               │
//! │  ─────────          ────                          ──────               │
//! │  list_products      GET  /products?page&limit     Paginated | [..]     │
//! │  get_product        GET  /products/{id}           Product              │
//! │  create_product     POST /products                Product              │
//! │  login              POST /auth/login              ok / not ok          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`crate::HttpProductService`] is the production implementation; tests
//! substitute their own.

use async_trait::async_trait;

use inventory_core::{NewProduct, PageRequest, Product, ProductId, ProductListing};

use crate::error::ClientResult;

/// Operations the dashboard performs against the remote service.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// One page of the product list.
    async fn list_products(&self, page: PageRequest) -> ClientResult<ProductListing>;

    /// A single product. Any non-2xx answer is an error.
    async fn get_product(&self, id: &ProductId) -> ClientResult<Product>;

    /// Creates a product and returns it as stored.
    async fn create_product(&self, product: &NewProduct) -> ClientResult<Product>;

    /// Checks credentials. The response body is ignored; only the status
    /// matters. Session cookies set by the service are retained.
    async fn login(&self, email: &str, password: &str) -> ClientResult<()>;
}
