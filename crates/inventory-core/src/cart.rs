//! # Cart State
//!
//! The cart / favorites set: product ids in insertion order, no duplicates.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Screen Action          Transition          Effect                      │
//! │  ─────────────          ──────────          ──────                      │
//! │                                                                         │
//! │  Mark favorite ───────► add_item(id) ─────► push if absent              │
//! │                                                                         │
//! │  Unmark favorite ─────► remove_item(id) ──► retain != id                │
//! │                                                                         │
//! │  Toggle star ─────────► toggle(id) ───────► add or remove               │
//! │                                                                         │
//! │  Header badge ────────► len() ────────────► (read only)                 │
//! │                                                                         │
//! │  Every transition is total: no errors, unknown ids are no-ops.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::types::ProductId;

/// Ordered set of product ids.
///
/// ## Invariants
/// - Items are unique by id
/// - Iteration order is first-insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    items: Vec<ProductId>,
}

impl CartState {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cart with `id` added; unchanged if already present.
    pub fn add_item(mut self, id: ProductId) -> Self {
        if !self.items.contains(&id) {
            self.items.push(id);
        }
        self
    }

    /// Returns the cart without `id`; unchanged if absent.
    pub fn remove_item(mut self, id: &ProductId) -> Self {
        self.items.retain(|item| item != id);
        self
    }

    /// Adds `id` if absent, removes it if present.
    pub fn toggle(self, id: ProductId) -> Self {
        if self.contains(&id) {
            self.remove_item(&id)
        } else {
            self.add_item(id)
        }
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }

    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    /// Number of ids (the header badge count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
