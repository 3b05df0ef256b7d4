//! # HTTP Product Service
//!
//! [`ProductService`] over reqwest.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  endpoint(base, "products") ─► send (timeout, cookie store)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status 2xx? ──no──► ClientError::Status (body discarded)              │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  bytes ─► serde_json ──err──► ClientError::Decode                      │
//! │                                                                         │
//! │  No retry. A timeout surfaces as ClientError::Timeout.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use inventory_core::{NewProduct, PageRequest, Product, ProductId, ProductListing};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::service::ProductService;

const USER_AGENT: &str = concat!("inventory-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Product service reached over HTTP.
///
/// Cloning is cheap and clones share the connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct HttpProductService {
    client: Client,
    base_url: Url,
    auth_url: Url,
}

impl HttpProductService {
    /// Builds a client from the API settings.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(HttpProductService {
            client,
            base_url: directory_url(&settings.base_url)?,
            auth_url: directory_url(&settings.auth_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn products_url(&self) -> ClientResult<Url> {
        Ok(self.base_url.join("products")?)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> ClientResult<Response> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, what, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        debug!(
            what,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Response body has an unexpected shape");
            ClientError::from(e)
        })
    }
}

/// Parses a base URL so that `join` appends rather than replaces the last
/// path segment.
fn directory_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl ProductService for HttpProductService {
    async fn list_products(&self, page: PageRequest) -> ClientResult<ProductListing> {
        let request = self
            .client
            .get(self.products_url()?)
            .query(&[("page", page.page), ("limit", page.limit)]);
        let response = self.send(request, "list_products").await?;
        Self::decode(response).await
    }

    async fn get_product(&self, id: &ProductId) -> ClientResult<Product> {
        let url = self.base_url.join(&format!("products/{}", id))?;
        let response = self.send(self.client.get(url), "get_product").await?;
        Self::decode(response).await
    }

    async fn create_product(&self, product: &NewProduct) -> ClientResult<Product> {
        let request = self.client.post(self.products_url()?).json(product);
        let response = self.send(request, "create_product").await?;
        Self::decode(response).await
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let url = self.auth_url.join("auth/login")?;
        let request = self.client.post(url).json(&LoginRequest { email, password });
        self.send(request, "login").await?;
        Ok(())
    }
}
