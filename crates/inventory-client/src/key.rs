//! Cache keys: a resource name plus ordered parameters.
//!
//! `products[page=2, limit=5]` and `products` are different keys, but
//! `products` is a prefix of the first, so invalidating `products` discards
//! both.

use std::fmt;

use inventory_core::{PageRequest, ProductId};

/// Resource name for product list pages.
pub const PRODUCTS: &str = "products";

/// Resource name for single products.
pub const PRODUCT: &str = "product";

/// Identifies one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    /// A key with no parameters. Also the prefix that matches every key of
    /// this resource.
    pub fn new(resource: impl Into<String>) -> Self {
        QueryKey {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter. Order is significant.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Key for one page of the product list.
    pub fn products(page: PageRequest) -> Self {
        QueryKey::new(PRODUCTS)
            .with("page", page.page)
            .with("limit", page.limit)
    }

    /// Key for a single product.
    pub fn product(id: &ProductId) -> Self {
        QueryKey::new(PRODUCT).with("id", id)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Whether `prefix` names this key or a less specific form of it.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.resource == prefix.resource && self.params.starts_with(&prefix.params)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource)?;
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("]")
    }
}
