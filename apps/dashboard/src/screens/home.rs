//! Dashboard home.

use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub heading: &'static str,
    pub body: &'static str,
    pub favorites: usize,
}

pub fn view(state: &AppState) -> HomeView {
    HomeView {
        heading: "Welcome to the Dashboard!",
        body: "This is the home page.",
        favorites: state.cart.with(|cart| cart.len()),
    }
}
