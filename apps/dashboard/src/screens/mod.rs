//! # Screens
//!
//! Route components. Each one turns store and cache state into a plain view
//! model; rendering to text happens in [`crate::render`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route               Screen              Reads                          │
//! │  ─────               ──────              ─────                          │
//! │  Dashboard           home                cart                           │
//! │  Products(page)      product_list        cache products[..], cart       │
//! │  ProductDetail(id)   product_detail      cache product[id], cart        │
//! │  CreateProduct       create_product      (local form fields)            │
//! │  Login               login               (local form fields)            │
//! │                                                                         │
//! │  layout wraps all but Login: auth.username, cart.len                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod create_product;
pub mod home;
pub mod layout;
pub mod login;
pub mod product_detail;
pub mod product_list;

use serde::Serialize;

use inventory_client::QueryKey;
use inventory_core::Route;

use crate::state::AppState;

use create_product::CreateProductView;
use home::HomeView;
use login::LoginView;
use product_detail::ProductDetailView;
use product_list::ProductListView;

/// The view model of whatever is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "view", rename_all = "camelCase")]
pub enum Screen {
    Home(HomeView),
    ProductList(ProductListView),
    ProductDetail(ProductDetailView),
    CreateProduct(CreateProductView),
    Login(LoginView),
}

/// Cache key a route reads, if any.
pub fn query_key(route: &Route) -> Option<QueryKey> {
    match route {
        Route::Products(page) => Some(QueryKey::products(*page)),
        Route::ProductDetail(id) => Some(QueryKey::product(id)),
        _ => None,
    }
}

/// Loads data for `route` and builds its screen.
pub async fn load(state: &AppState, route: &Route) -> Screen {
    match route {
        Route::Products(page) => Screen::ProductList(product_list::load(state, *page).await),
        Route::ProductDetail(id) => Screen::ProductDetail(product_detail::load(state, id).await),
        _ => peek(state, route),
    }
}

/// Builds the screen for `route` from current state only, without fetching.
pub fn peek(state: &AppState, route: &Route) -> Screen {
    match route {
        Route::Dashboard => Screen::Home(home::view(state)),
        Route::Products(page) => Screen::ProductList(product_list::peek(state, *page)),
        Route::ProductDetail(id) => Screen::ProductDetail(product_detail::peek(state, id)),
        Route::CreateProduct => Screen::CreateProduct(CreateProductView::default()),
        Route::Login | Route::Logout => Screen::Login(LoginView::default()),
    }
}
