//! Single product view.

use std::sync::Arc;

use serde::Serialize;

use inventory_client::{QueryKey, QueryState};
use inventory_core::{Product, ProductId};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    /// Two decimals with the currency symbol, e.g. `$109.95`
    pub price: String,
    pub description: Option<String>,
    pub image: String,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProductDetailView {
    Loading,
    Error { message: String },
    Ready(ProductCard),
}

impl ProductDetailView {
    pub fn card(&self) -> Option<&ProductCard> {
        match self {
            ProductDetailView::Ready(card) => Some(card),
            _ => None,
        }
    }
}

pub async fn load(state: &AppState, id: &ProductId) -> ProductDetailView {
    let service = Arc::clone(&state.service);
    let product_id = id.clone();
    let result = state
        .cache
        .fetch(QueryKey::product(id), move || async move {
            service.get_product(&product_id).await
        })
        .await;

    let query = match result {
        Ok(product) => QueryState::Ready(product),
        Err(err) => QueryState::Failed(err),
    };
    build(state, &query)
}

pub fn peek(state: &AppState, id: &ProductId) -> ProductDetailView {
    build(state, &state.cache.peek::<Product>(&QueryKey::product(id)))
}

fn build(state: &AppState, query: &QueryState<Product>) -> ProductDetailView {
    match query {
        QueryState::Idle | QueryState::Loading => ProductDetailView::Loading,
        QueryState::Failed(err) => ProductDetailView::Error {
            message: format!("Error loading product: {}", err.user_message()),
        },
        QueryState::Ready(product) => ProductDetailView::Ready(ProductCard {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: state.config.format_currency(product.price),
            description: product.description.clone(),
            image: product.image.clone(),
            favorite: state.cart.with(|cart| cart.contains(&product.id)),
        }),
    }
}
