//! # Domain Types
//!
//! Wire and domain types shared by the client and the dashboard.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Paginated<T>   │   │   NewProduct    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ProductId) │   │  data: Vec<T>   │   │  title          │       │
//! │  │  title          │   │  meta: PageMeta │   │  price          │       │
//! │  │  price (Money)  │   └─────────────────┘   │  category       │       │
//! │  │  category       │                         │  imageUrl       │       │
//! │  │  image          │   ┌─────────────────┐   └─────────────────┘       │
//! │  └─────────────────┘   │ ProductListing  │                              │
//! │                        │  Paged | Flat   │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │  PageRequest    │       │
//! │                                              │  page, limit    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Product Identity
//! The product service has answered with integer ids in one version and string
//! ids in another. `ProductId` is the single canonical form: a string that
//! accepts either JSON shape on the way in.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

// =============================================================================
// Product Id
// =============================================================================

/// Canonical product identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Parses an id from a path segment or user input.
    ///
    /// Rejects empty ids and ids that would not survive being placed in a
    /// URL path segment.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(['/', '?', '#']) || raw.contains(char::is_whitespace) {
            return Err(CoreError::InvalidProductId(raw.to_string()));
        }
        Ok(ProductId(raw.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id.to_string())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = ProductId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a product id (integer or string)")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ProductId, E> {
                ProductId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    pub title: String,

    pub price: Money,

    pub category: String,

    /// Image URL. Some service versions call this field `imageUrl`.
    #[serde(alias = "imageUrl", default)]
    pub image: String,

    /// Long description; only the detail endpoint reliably sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /products`.
///
/// Only constructed from a validated form (see [`crate::validation`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub price: Money,
    pub category: String,
    pub image_url: String,
}

// =============================================================================
// Pagination
// =============================================================================

/// Pagination metadata produced by the service.
///
/// `current_page` is trusted as returned; it is not re-validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub item_count: u64,
    pub items_per_page: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

impl PageMeta {
    /// Metadata for a flat list presented as one page.
    pub fn single_page(len: usize) -> Self {
        let len = len as u64;
        PageMeta {
            total_items: len,
            item_count: len,
            items_per_page: len,
            total_pages: 1,
            current_page: 1,
        }
    }

    /// Whether a "Previous" control should be enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a "Next" control should be enabled.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Response of `GET /products`: paginated in newer service versions, a bare
/// array in older ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductListing {
    Paged(Paginated<Product>),
    Flat(Vec<Product>),
}

impl ProductListing {
    /// Products on this page.
    pub fn products(&self) -> &[Product] {
        match self {
            ProductListing::Paged(page) => &page.data,
            ProductListing::Flat(list) => list,
        }
    }

    /// Pagination metadata; a flat listing is one page.
    pub fn meta(&self) -> PageMeta {
        match self {
            ProductListing::Paged(page) => page.meta,
            ProductListing::Flat(list) => PageMeta::single_page(list.len()),
        }
    }

    /// Whether the list contains a product with the given id.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products().iter().any(|p| &p.id == id)
    }
}

/// Page number and page size for the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a request, clamping into the supported range.
    pub fn new(page: u32, limit: u32) -> Self {
        PageRequest {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// The following page with the same size.
    pub fn next(&self) -> Self {
        PageRequest::new(self.page.saturating_add(1), self.limit)
    }

    /// The preceding page with the same size (never below 1).
    pub fn previous(&self) -> Self {
        PageRequest::new(self.page.saturating_sub(1), self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, DEFAULT_PAGE_LIMIT)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_accepts_both_shapes() {
        let from_int: ProductId = serde_json::from_value(json!(7)).unwrap();
        let from_str: ProductId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(serde_json::to_value(&from_int).unwrap(), json!("7"));
    }

    #[test]
    fn test_product_id_parse_rejects_path_breakers() {
        assert!(ProductId::parse("abc-123").is_ok());
        assert!(ProductId::parse("").is_err());
        assert!(ProductId::parse("a/b").is_err());
        assert!(ProductId::parse("a b").is_err());
    }

    #[test]
    fn test_product_decodes_fake_store_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Backpack",
            "price": 109.95,
            "category": "men's clothing",
            "description": "Fits 15 inch laptops",
            "image": "https://example.com/1.jpg"
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.price.cents(), 10995);
        assert_eq!(product.description.as_deref(), Some("Fits 15 inch laptops"));
    }

    #[test]
    fn test_product_accepts_image_url_alias() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-9",
            "title": "Mouse",
            "price": 20,
            "category": "electronics",
            "imageUrl": "https://example.com/m.png"
        }))
        .unwrap();
        assert_eq!(product.image, "https://example.com/m.png");
    }

    #[test]
    fn test_new_product_body_is_camel_case() {
        let body = NewProduct {
            title: "Mouse".into(),
            price: Money::from_cents(1999),
            category: "electronics".into(),
            image_url: "https://example.com/m.png".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "title": "Mouse",
                "price": 19.99,
                "category": "electronics",
                "imageUrl": "https://example.com/m.png"
            })
        );
    }

    #[test]
    fn test_listing_decodes_paged_and_flat() {
        let item = json!({"id": 1, "title": "A", "price": 1, "category": "c", "image": "i"});

        let paged: ProductListing = serde_json::from_value(json!({
            "data": [item.clone()],
            "meta": {"totalItems": 11, "itemCount": 1, "itemsPerPage": 5,
                     "totalPages": 3, "currentPage": 2}
        }))
        .unwrap();
        assert!(matches!(paged, ProductListing::Paged(_)));
        assert_eq!(paged.meta().total_pages, 3);

        let flat: ProductListing = serde_json::from_value(json!([item])).unwrap();
        assert_eq!(flat.meta(), PageMeta::single_page(1));
        assert!(flat.contains(&ProductId::from(1)));
    }

    #[test]
    fn test_page_meta_controls() {
        let meta = PageMeta {
            total_items: 15,
            item_count: 5,
            items_per_page: 5,
            total_pages: 3,
            current_page: 2,
        };
        assert!(meta.has_previous());
        assert!(meta.has_next());

        let first = PageMeta { current_page: 1, ..meta };
        assert!(!first.has_previous());

        let last = PageMeta { current_page: 3, ..meta };
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(3, 500).limit, MAX_PAGE_LIMIT);
        assert_eq!(PageRequest::new(1, 5).previous().page, 1);
        assert_eq!(PageRequest::new(2, 5).next(), PageRequest { page: 3, limit: 5 });
    }
}
