//! # Validation Module
//!
//! Form validation for the create-product and login screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen form (raw strings as typed)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── required fields, lengths                                          │
//! │  ├── price: decimal string → Money (no floats)                         │
//! │  └── image URL: absolute http(s)                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Product service (authoritative, may still reject)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventory_core::validation::ProductForm;
//!
//! let form = ProductForm {
//!     title: "Mouse".into(),
//!     price: "19.99".into(),
//!     category: "electronics".into(),
//!     image_url: "https://example.com/mouse.png".into(),
//! };
//! let body = form.validate().unwrap();
//! assert_eq!(body.price.cents(), 1999);
//! ```

use url::Url;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_TITLE_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 60;
const MAX_URL_LEN: usize = 2048;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field and returns it trimmed.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product price typed by the user.
///
/// ## Rules
/// - Decimal with at most two fraction digits
/// - Zero is allowed, negative is not
pub fn validate_price(input: &str) -> ValidationResult<Money> {
    let price = Money::parse_decimal(input)?;

    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX / 100,
        });
    }

    Ok(price)
}

/// Validates an image URL: absolute, http or https.
pub fn validate_image_url(input: &str) -> ValidationResult<String> {
    let input = validate_required("image URL", input, MAX_URL_LEN)?;

    let parsed = Url::parse(&input).map_err(|e| ValidationError::InvalidFormat {
        field: "image URL".to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidFormat {
            field: "image URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    Ok(input)
}

/// Validates a login email (shape only, the service decides).
pub fn validate_email(input: &str) -> ValidationResult<String> {
    let email = validate_required("email", input, 254)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Raw create-product form fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
}

impl ProductForm {
    /// Validates every field and builds the request body.
    ///
    /// Fields are checked in form order; the first failure is returned.
    pub fn validate(&self) -> ValidationResult<NewProduct> {
        let title = validate_required("title", &self.title, MAX_TITLE_LEN)?;
        let price = validate_price(&self.price)?;
        let category = validate_required("category", &self.category, MAX_CATEGORY_LEN)?;
        let image_url = validate_image_url(&self.image_url)?;

        Ok(NewProduct {
            title,
            price,
            category,
            image_url,
        })
    }
}

/// Raw login form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns `(email, password)` when both are present.
    pub fn validate(&self) -> ValidationResult<(String, String)> {
        let email = validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            });
        }
        Ok((email, self.password.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            title: "  Mouse ".into(),
            price: "19.9".into(),
            category: "electronics".into(),
            image_url: "https://example.com/m.png".into(),
        }
    }

    #[test]
    fn test_valid_form_builds_body() {
        let body = valid_form().validate().unwrap();
        assert_eq!(body.title, "Mouse");
        assert_eq!(body.price.cents(), 1990);
        assert_eq!(body.image_url, "https://example.com/m.png");
    }

    #[test]
    fn test_missing_fields_report_first_in_form_order() {
        let form = ProductForm::default();
        assert_eq!(form.validate().unwrap_err().field(), "title");

        let form = ProductForm {
            category: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err().field(), "category");
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price("0").unwrap().cents(), 0);
        assert!(validate_price("-1").is_err());
        assert!(validate_price("ten").is_err());
        assert!(validate_price("1.005").is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("http://cdn.example.com/a.jpg").is_ok());
        assert!(validate_image_url("ftp://example.com/a.jpg").is_err());
        assert!(validate_image_url("/relative.png").is_err());
        assert!(validate_image_url("").is_err());
    }

    #[test]
    fn test_title_length_limit() {
        let form = ProductForm {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "ana@example.com".into(),
            password: "secret".into(),
        };
        assert_eq!(
            form.validate().unwrap(),
            ("ana@example.com".to_string(), "secret".to_string())
        );

        let no_at = LoginForm {
            email: "ana".into(),
            ..form.clone()
        };
        assert!(no_at.validate().is_err());

        let no_password = LoginForm {
            password: String::new(),
            ..form
        };
        assert_eq!(no_password.validate().unwrap_err().field(), "password");
    }
}
