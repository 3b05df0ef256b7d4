//! Sidebar and header around every screen except the login form.

use serde::Serialize;

use inventory_core::Route;

use crate::state::AppState;

/// Brand shown at the top of the sidebar.
pub const BRAND: &str = "InventoryApp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutView {
    pub brand: &'static str,
    pub links: Vec<NavLink>,
    /// `Welcome back, {username}`
    pub greeting: String,
    /// `Cart ({n})`
    pub cart_badge: String,
    pub cart_count: usize,
}

/// Builds the layout for `current`.
pub fn view(state: &AppState, current: &Route) -> LayoutView {
    let section = current.section();
    let links = [
        ("Dashboard", Route::Dashboard.path()),
        ("Products", state.config.first_products_page().path()),
    ]
    .into_iter()
    .map(|(label, path)| NavLink {
        label,
        path,
        active: section == Some(label),
    })
    .collect();

    let greeting = state.auth.with(|auth| match auth.username() {
        Some(name) => format!("Welcome back, {}", name),
        None => "Welcome back".to_string(),
    });
    let cart_count = state.cart.with(|cart| cart.len());

    LayoutView {
        brand: BRAND,
        links,
        greeting,
        cart_badge: format!("Cart ({})", cart_count),
        cart_count,
    }
}
