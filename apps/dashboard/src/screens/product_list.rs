//! # Product List Screen
//!
//! Paginated product table.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product List Flow                                    │
//! │                                                                         │
//! │  /products?page=2&limit=5                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  key = products[page=2, limit=5]                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cache.fetch(key, list_products) ── cached? ──► no network call        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  QueryState ─► Loading : placeholder rows                              │
//! │             ─► Failed  : "Error loading products: {message}"           │
//! │             ─► Ready   : rows + "Page {current} of {total}"            │
//! │                                                                         │
//! │  Previous enabled iff current > 1, Next iff current < total.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::Serialize;

use inventory_client::{QueryKey, QueryState};
use inventory_core::{PageMeta, PageRequest, ProductId, ProductListing};

use crate::state::AppState;

/// Placeholder rows shown while loading.
pub const PLACEHOLDER_ROWS: usize = 5;

/// Column headers, in order.
pub const COLUMNS: [&str; 4] = ["Name", "Category", "Price", "Favorite"];

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: String,
    pub favorite: bool,
}

/// Footer controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u64,
    pub total: u64,
    /// `Page {current} of {total}`
    pub label: String,
    /// Target of the Previous button; `None` when disabled.
    pub previous: Option<PageRequest>,
    /// Target of the Next button; `None` when disabled.
    pub next: Option<PageRequest>,
}

impl Pagination {
    pub fn from_meta(meta: &PageMeta, request: PageRequest) -> Self {
        let page_at = |n: u64| PageRequest::new(u32::try_from(n).unwrap_or(u32::MAX), request.limit);

        Pagination {
            current: meta.current_page,
            total: meta.total_pages,
            label: format!("Page {} of {}", meta.current_page, meta.total_pages),
            previous: meta
                .has_previous()
                .then(|| page_at(meta.current_page.saturating_sub(1).min(meta.total_pages))),
            next: meta.has_next().then(|| page_at(meta.current_page + 1)),
        }
    }

    pub fn previous_enabled(&self) -> bool {
        self.previous.is_some()
    }

    pub fn next_enabled(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProductListView {
    Loading {
        placeholder_rows: usize,
    },
    Error {
        message: String,
    },
    Ready {
        rows: Vec<ProductRow>,
        pagination: Pagination,
    },
}

impl ProductListView {
    pub fn pagination(&self) -> Option<&Pagination> {
        match self {
            ProductListView::Ready { pagination, .. } => Some(pagination),
            _ => None,
        }
    }

    pub fn rows(&self) -> &[ProductRow] {
        match self {
            ProductListView::Ready { rows, .. } => rows,
            _ => &[],
        }
    }
}

/// Fetches the page (through the cache) and builds the view.
pub async fn load(state: &AppState, request: PageRequest) -> ProductListView {
    let service = Arc::clone(&state.service);
    let result = state
        .cache
        .fetch(QueryKey::products(request), move || async move {
            service.list_products(request).await
        })
        .await;

    let query = match result {
        Ok(listing) => QueryState::Ready(listing),
        Err(err) => QueryState::Failed(err),
    };
    build(state, request, &query)
}

/// Builds the view from whatever the cache holds right now.
pub fn peek(state: &AppState, request: PageRequest) -> ProductListView {
    let query = state.cache.peek::<ProductListing>(&QueryKey::products(request));
    build(state, request, &query)
}

fn build(state: &AppState, request: PageRequest, query: &QueryState<ProductListing>) -> ProductListView {
    match query {
        QueryState::Idle | QueryState::Loading => ProductListView::Loading {
            placeholder_rows: PLACEHOLDER_ROWS,
        },
        QueryState::Failed(err) => ProductListView::Error {
            message: format!("Error loading products: {}", err.user_message()),
        },
        QueryState::Ready(listing) => {
            let rows = state.cart.with(|cart| {
                listing
                    .products()
                    .iter()
                    .map(|p| ProductRow {
                        id: p.id.clone(),
                        name: p.title.clone(),
                        category: p.category.clone(),
                        price: state.config.format_currency(p.price),
                        favorite: cart.contains(&p.id),
                    })
                    .collect()
            });
            ProductListView::Ready {
                rows,
                pagination: Pagination::from_meta(&listing.meta(), request),
            }
        }
    }
}
