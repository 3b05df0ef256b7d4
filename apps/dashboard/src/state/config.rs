//! # Configuration State
//!
//! Display settings derived from [`ClientConfig`] at startup.
//!
//! Read-only after initialization, so no lock.

use serde::Serialize;

use inventory_client::ClientConfig;
use inventory_core::{Money, PageRequest, Route};

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Page size used when the dashboard picks the page itself
    pub page_limit: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for ConfigState {
    fn from(config: &ClientConfig) -> Self {
        ConfigState {
            currency_symbol: config.ui.currency_symbol.clone(),
            page_limit: config.ui.page_limit,
        }
    }
}

impl ConfigState {
    /// Formats a price for display.
    ///
    /// ## Example
    /// ```rust
    /// use inventory_core::Money;
    /// use inventory_dashboard::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(10995)), "$109.95");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    /// First page of the product list at the configured size.
    pub fn first_products_page(&self) -> Route {
        Route::Products(PageRequest::new(1, self.page_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(100)), "$1.00");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");

        let euro = ConfigState {
            currency_symbol: "€".into(),
            ..ConfigState::default()
        };
        assert_eq!(euro.format_currency(Money::from_cents(-550)), "-€5.50");
    }

    #[test]
    fn test_first_products_page_uses_limit() {
        let config = ConfigState {
            page_limit: 25,
            ..ConfigState::default()
        };
        assert_eq!(config.first_products_page().path(), "/products?page=1&limit=25");
    }
}
