//! # Create Product Screen
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductForm ──validate──► NewProduct ──POST /products──► Product      │
//! │       │                                      │                          │
//! │       ▼ invalid                              ▼ failed                   │
//! │  field message, nothing sent          "Error creating product!"        │
//! │                                                                         │
//! │  On success: invalidate every `products` key so the list re-fetches,   │
//! │  then the navigator moves to /products.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{info, warn};

use inventory_client::key::PRODUCTS;
use inventory_client::QueryKey;
use inventory_core::validation::ProductForm;
use inventory_core::Product;

use crate::state::AppState;

/// Message shown when the service rejects or never answers the request.
pub const CREATE_FAILED: &str = "Error creating product!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductView {
    pub title: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
    pub error: Option<String>,
}

impl CreateProductView {
    /// Re-shows `form` with an error under it.
    pub fn with_error(form: &ProductForm, error: impl Into<String>) -> Self {
        CreateProductView {
            title: form.title.clone(),
            price: form.price.clone(),
            category: form.category.clone(),
            image_url: form.image_url.clone(),
            error: Some(error.into()),
        }
    }
}

/// Outcome of a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Product),
    /// The form did not validate; nothing was sent.
    Invalid(String),
    /// The service call failed.
    Failed,
}

/// Validates and submits the form. Invalidates the product list on success.
pub async fn submit(state: &AppState, form: &ProductForm) -> CreateOutcome {
    let body = match form.validate() {
        Ok(body) => body,
        Err(err) => return CreateOutcome::Invalid(err.to_string()),
    };

    match state.service.create_product(&body).await {
        Ok(product) => {
            let dropped = state.cache.invalidate(&QueryKey::new(PRODUCTS));
            info!(id = %product.id, dropped, "Product created");
            CreateOutcome::Created(product)
        }
        Err(err) => {
            warn!(error = %err, "Create product failed");
            CreateOutcome::Failed
        }
    }
}
