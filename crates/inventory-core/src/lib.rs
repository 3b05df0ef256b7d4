//! # inventory-core: Pure Client Logic for the Inventory Dashboard
//!
//! This crate holds every piece of the dashboard that can be expressed as a
//! pure function: domain types, money, form validation, the two client-side
//! state containers (auth + cart), the observable store that publishes their
//! transitions, the route table and the route guard.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory Dashboard Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/dashboard (terminal front end)             │   │
//! │  │   Navigator ──► Screens ──► Render                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               inventory-client (network + cache)                │   │
//! │  │   ProductService ──► QueryCache                                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inventory-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌────────────┐  │   │
//! │  │   │  types  │ │  auth  │ │  cart  │ │ routes │ │   guard    │  │   │
//! │  │   │ Product │ │ login  │ │ add    │ │ parse  │ │  redirect  │  │   │
//! │  │   │ PageMeta│ │ logout │ │ remove │ │ path   │ │  to login  │  │   │
//! │  │   └─────────┘ └────────┘ └────────┘ └────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE TRANSITIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Product, PageMeta, Paginated, NewProduct)
//! - [`money`] - Integer-cent Money type used for product prices
//! - [`error`] - Domain error types
//! - [`validation`] - Create-product form validation
//! - [`auth`] - Authentication state and its transitions
//! - [`cart`] - Cart / favorites id set and its transitions
//! - [`store`] - Observable store wrapper (publish on mutation)
//! - [`routes`] - Route table: path parsing and formatting
//! - [`guard`] - Pre-navigation authentication check
//!
//! ## Example Usage
//!
//! ```rust
//! use inventory_core::{guard, AuthState, NavDecision, Route};
//!
//! let auth = AuthState::default();
//! let target = Route::parse("/products?page=2&limit=5").unwrap();
//!
//! // Logged out: everything but /login is redirected
//! assert!(matches!(guard::check(&auth, &target), NavDecision::Redirect { .. }));
//!
//! let auth = auth.login("ana@example.com");
//! assert!(matches!(guard::check(&auth, &target), NavDecision::Proceed(_)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod error;
pub mod guard;
pub mod money;
pub mod routes;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::AuthState;
pub use cart::CartState;
pub use error::{CoreError, CoreResult, ValidationError};
pub use guard::NavDecision;
pub use money::Money;
pub use routes::{Route, RouteError};
pub use store::{Store, SubscriptionId};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default number of products per list page.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size the list screen will request.
pub const MAX_PAGE_LIMIT: u32 = 100;
