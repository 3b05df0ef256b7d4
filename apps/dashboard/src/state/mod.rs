//! # State Module
//!
//! The context every screen receives.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │ Store<AuthState> │ │ Store<CartState> │ │    ConfigState       │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  login / logout  │ │  add / remove /  │ │  currency symbol     │    │
//! │  │  read by guard   │ │  toggle favorite │ │  page size           │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────────────────────────────┐     │
//! │  │   QueryCache     │ │   Arc<dyn ProductService>                │     │
//! │  │  remote reads    │ │   HTTP in production, fakes in tests     │     │
//! │  └──────────────────┘ └──────────────────────────────────────────┘     │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Stores: RwLock inside, listeners called outside the lock            │
//! │  • QueryCache: Mutex inside, never held across .await                  │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is global. Tests build as many independent `AppState`s as
//! they like.

mod config;

use std::sync::Arc;

use inventory_client::{ClientConfig, ClientResult, HttpProductService, ProductService, QueryCache};
use inventory_core::{AuthState, CartState, Store};

pub use config::ConfigState;

/// Everything a screen may read or mutate.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Store<AuthState>>,
    pub cart: Arc<Store<CartState>>,
    pub cache: QueryCache,
    pub service: Arc<dyn ProductService>,
    pub config: ConfigState,
}

impl AppState {
    /// Fresh, logged-out state over the given service.
    pub fn new(service: Arc<dyn ProductService>, config: ConfigState) -> Self {
        AppState {
            auth: Arc::new(Store::default()),
            cart: Arc::new(Store::default()),
            cache: QueryCache::new(),
            service,
            config,
        }
    }

    /// State backed by the HTTP service described by `config`.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let service = HttpProductService::new(&config.api)?;
        Ok(AppState::new(Arc::new(service), ConfigState::from(config)))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("cart", &self.cart)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
