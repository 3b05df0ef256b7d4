//! # inventory-client: Remote Service Client and Query Cache
//!
//! Everything in the dashboard that talks to the network lives here.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Layer Architecture                          │
//! │                                                                         │
//! │   Screen                                                                │
//! │     │  cache.fetch(QueryKey::products(page), || svc.list_products(..)) │
//! │     ▼                                                                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                          QueryCache                              │  │
//! │  │                                                                  │  │
//! │  │  Success ─► return cached value                                  │  │
//! │  │  Pending ─► join the in-flight request                           │  │
//! │  │  Error   ─► return cached error (sticky until invalidated)       │  │
//! │  │  absent  ─► start the request ─────────────────┐                 │  │
//! │  └────────────────────────────────────────────────┼─────────────────┘  │
//! │                                                   ▼                     │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │             ProductService (trait) / HttpProductService          │  │
//! │  │  GET /products   GET /products/{id}   POST /products             │  │
//! │  │  POST /auth/login (cookie store)                                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Mutations go straight to the service, then `invalidate` the keys      │
//! │  they make stale.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`cache`] - `QueryCache`, `QueryState`, `CacheEvent`, `QuerySubscription`
//! - [`config`] - `ClientConfig` (TOML + environment)
//! - [`error`] - `ClientError`, `QueryError`
//! - [`http`] - reqwest implementation of the service contract
//! - [`key`] - `QueryKey`
//! - [`service`] - `ProductService` trait

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod key;
pub mod service;

pub use cache::{CacheEvent, EntryStatus, QueryCache, QueryState, QuerySubscription};
pub use config::{ApiSettings, ClientConfig, UiSettings};
pub use error::{ClientError, ClientResult, QueryError};
pub use http::HttpProductService;
pub use key::QueryKey;
pub use service::ProductService;
