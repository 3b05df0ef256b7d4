//! # Route Table
//!
//! Maps navigation paths to typed routes and back.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Path                        Route                                      │
//! │  ────                        ─────                                      │
//! │  /                           Dashboard                                  │
//! │  /products?page=&limit=      Products(PageRequest)                      │
//! │  /products/create            CreateProduct   (checked before {id})      │
//! │  /products/{id}              ProductDetail(ProductId)                   │
//! │  /login                      Login           (only public route)        │
//! │  /logout                     Logout                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Route::parse(route.path())` round-trips for every route.

use std::fmt;

use thiserror::Error;
use url::form_urlencoded;

use crate::types::{PageRequest, ProductId};
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Path that unauthenticated navigation is redirected to.
pub const LOGIN_PATH: &str = "/login";

/// Errors produced while resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Invalid value '{value}' for query parameter '{param}'")]
    InvalidQuery { param: String, value: String },

    #[error("Invalid product id in path: {0}")]
    InvalidId(String),
}

/// A screen the dashboard can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Products(PageRequest),
    CreateProduct,
    ProductDetail(ProductId),
    Login,
    Logout,
}

impl Route {
    /// Resolves a path with optional query string.
    ///
    /// A product list path without `limit` gets [`DEFAULT_PAGE_LIMIT`].
    pub fn parse(input: &str) -> Result<Route, RouteError> {
        Route::parse_with_limit(input, DEFAULT_PAGE_LIMIT)
    }

    /// Like [`Route::parse`], with the page size used when the path has no
    /// `limit`.
    pub fn parse_with_limit(input: &str, default_limit: u32) -> Result<Route, RouteError> {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, q),
            None => (input, ""),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Dashboard),
            ["products"] => parse_page_request(query, default_limit).map(Route::Products),
            ["products", "create"] => Ok(Route::CreateProduct),
            ["products", id] => ProductId::parse(id)
                .map(Route::ProductDetail)
                .map_err(|_| RouteError::InvalidId((*id).to_string())),
            ["login"] => Ok(Route::Login),
            ["logout"] => Ok(Route::Logout),
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Products(req) => format!("/products?page={}&limit={}", req.page, req.limit),
            Route::CreateProduct => "/products/create".to_string(),
            Route::ProductDetail(id) => format!("/products/{}", id),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Logout => "/logout".to_string(),
        }
    }

    /// Whether the route may be shown without being logged in.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Sidebar section this route belongs to.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("Dashboard"),
            Route::Products(_) | Route::CreateProduct | Route::ProductDetail(_) => Some("Products"),
            Route::Login | Route::Logout => None,
        }
    }

    /// First page of the product list with the default page size.
    pub fn products() -> Route {
        Route::Products(PageRequest::default())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn parse_page_request(query: &str, default_limit: u32) -> Result<PageRequest, RouteError> {
    let mut page = 1;
    let mut limit = default_limit;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let (target, max) = match key.as_ref() {
            "page" => (&mut page, u32::MAX),
            "limit" => (&mut limit, MAX_PAGE_LIMIT),
            _ => continue,
        };
        *target = value
            .parse::<u32>()
            .ok()
            .filter(|v| (1..=max).contains(v))
            .ok_or_else(|| RouteError::InvalidQuery {
                param: key.to_string(),
                value: value.to_string(),
            })?;
    }

    Ok(PageRequest::new(page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Dashboard);
        assert_eq!(Route::parse("").unwrap(), Route::Dashboard);
        assert_eq!(Route::parse("/login").unwrap(), Route::Login);
        assert_eq!(Route::parse("/logout/").unwrap(), Route::Logout);
        assert_eq!(Route::parse("/products/create").unwrap(), Route::CreateProduct);
    }

    #[test]
    fn test_parse_products_query() {
        assert_eq!(
            Route::parse("/products?page=2&limit=5").unwrap(),
            Route::Products(PageRequest { page: 2, limit: 5 })
        );
        assert_eq!(Route::parse("/products").unwrap(), Route::products());
        assert_eq!(
            Route::parse("/products?utm=x&page=3").unwrap(),
            Route::Products(PageRequest { page: 3, limit: DEFAULT_PAGE_LIMIT })
        );
    }

    #[test]
    fn test_parse_rejects_bad_query() {
        assert_eq!(
            Route::parse("/products?page=zero"),
            Err(RouteError::InvalidQuery {
                param: "page".into(),
                value: "zero".into()
            })
        );
        assert!(Route::parse("/products?limit=0").is_err());
        assert_eq!(
            Route::parse("/products?limit=500"),
            Err(RouteError::InvalidQuery {
                param: "limit".into(),
                value: "500".into()
            })
        );
        assert_eq!(
            Route::parse("/products?limit=100").unwrap(),
            Route::Products(PageRequest { page: 1, limit: MAX_PAGE_LIMIT })
        );
    }

    #[test]
    fn test_missing_limit_uses_given_default() {
        assert_eq!(
            Route::parse_with_limit("/products", 5).unwrap(),
            Route::Products(PageRequest { page: 1, limit: 5 })
        );
        assert_eq!(
            Route::parse_with_limit("/products?page=2&limit=20", 5).unwrap(),
            Route::Products(PageRequest { page: 2, limit: 20 })
        );
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            Route::parse("/products/42").unwrap(),
            Route::ProductDetail(ProductId::from(42))
        );
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(
            Route::parse("/settings"),
            Err(RouteError::NotFound("/settings".into()))
        );
        assert!(Route::parse("/products/1/edit").is_err());
    }

    #[test]
    fn test_path_round_trips() {
        let routes = [
            Route::Dashboard,
            Route::Products(PageRequest::new(4, 25)),
            Route::CreateProduct,
            Route::ProductDetail(ProductId::from(9)),
            Route::Login,
            Route::Logout,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(Route::Login.is_public());
        assert!(!Route::Dashboard.is_public());
        assert!(!Route::products().is_public());
    }
}
