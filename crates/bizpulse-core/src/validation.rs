//! # Validation Module
//!
//! Input validation utilities for BizPulse.
//!
//! Validation runs at the entry point, before any ledger mutation. The
//! ledger operations themselves are total: once an input passes this
//! module, the mutation cannot fail. Stock checks in particular happen
//! here (`validate_sale`), never inside `add_sale`.
//!
//! ## Usage
//! ```rust
//! use bizpulse_core::validation::{validate_username, validate_quantity};
//!
//! validate_username("mita_store").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BusinessData, MarginRate, Sale, SaleKind};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Username / Password
// =============================================================================

/// Normalizes a username to its canonical form: trimmed and lower-cased.
///
/// All registry entries, document keys, and comparisons use the normalized
/// form, so `"  Carol "` and `"carol"` are the same account.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 32 characters
/// - May contain letters, digits, `.`, `_` and `-`
///
/// ## Example
/// ```rust
/// use bizpulse_core::validation::validate_username;
///
/// assert!(validate_username("mita_store").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username("has space").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > 32 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 32,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Must be at least 4 characters
///
/// Passwords are not trimmed; whitespace is significant.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 4 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 4,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (company, customer, or stock item).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount for a sale, expense, or payment.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a price. Unlike amounts, zero is allowed (free samples,
/// promotional items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a target margin in basis points (0% to 100%).
pub fn validate_margin(rate: MarginRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "target_profit_margin".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Validation
// =============================================================================

/// Validates a sale against the current snapshot before it is recorded.
///
/// ## Rules
/// - Amount must be positive
/// - A stock-linked sale must name an existing item, carry a positive
///   quantity, and not exceed the stock on hand
/// - A credit sale must name an existing customer
///
/// Rejecting oversells here keeps `add_sale` total: by the time the
/// mutation runs, the clamp in `add_sale` is a safety net, not a policy.
pub fn validate_sale(data: &BusinessData, sale: &Sale) -> ValidationResult<()> {
    validate_amount(sale.amount)?;

    if let Some(item_id) = &sale.stock_item_id {
        let item = data
            .find_stock_item(item_id)
            .ok_or_else(|| ValidationError::UnknownStockItem {
                id: item_id.clone(),
            })?;

        let requested = sale.quantity.ok_or(ValidationError::Required {
            field: "quantity".to_string(),
        })?;
        validate_quantity(requested)?;

        if requested > item.current_quantity {
            return Err(ValidationError::InsufficientStock {
                name: item.name.clone(),
                available: item.current_quantity,
                requested,
            });
        }
    }

    if sale.kind == SaleKind::Credit {
        let customer_id = sale.customer_id.as_deref().ok_or(ValidationError::Required {
            field: "customer".to_string(),
        })?;
        if data.find_customer(customer_id).is_none() {
            return Err(ValidationError::UnknownCustomer {
                id: customer_id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Pricing Helpers
// =============================================================================

/// Suggests a selling price from a unit cost and target margin.
///
/// ## Example
/// ```rust
/// use bizpulse_core::money::Money;
/// use bizpulse_core::types::MarginRate;
/// use bizpulse_core::validation::suggest_selling_price;
///
/// let cost = Money::from_major(400);
/// let price = suggest_selling_price(cost, MarginRate::from_percent(20));
/// assert_eq!(price, Money::from_major(480));
/// ```
pub fn suggest_selling_price(cost: Money, margin: MarginRate) -> Money {
    cost + cost.apply_margin(margin)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{new_id, Customer, StockItem};
    use chrono::NaiveDate;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn cash_sale(amount: i64) -> Sale {
        Sale {
            id: new_id(),
            date: sample_date(),
            amount: Money::from_major(amount),
            kind: SaleKind::Cash,
            bill_number: None,
            stock_item_id: None,
            quantity: None,
            customer_id: None,
            customer_name: None,
            note: None,
        }
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Carol "), "carol");
        assert_eq!(normalize_username("ADMIN"), "admin");
        assert_eq!(normalize_username("mita_store"), "mita_store");
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("mita_store").is_ok());
        assert!(validate_username("carol.b-1").is_ok());
        // Unicode letters are allowed
        assert!(validate_username("দোকান").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("1234").is_ok());
        assert!(validate_password("longer password").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mita Store").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_amount_and_price() {
        assert!(validate_amount(Money::from_minor(1)).is_ok());
        assert!(validate_amount(Money::zero()).is_err());
        assert!(validate_amount(Money::from_minor(-100)).is_err());

        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999_999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1_000_000).is_err());
    }

    #[test]
    fn test_validate_margin() {
        assert!(validate_margin(MarginRate::from_percent(0)).is_ok());
        assert!(validate_margin(MarginRate::from_percent(100)).is_ok());
        assert!(validate_margin(MarginRate::from_bps(10001)).is_err());
    }

    #[test]
    fn test_validate_sale_rejects_oversell() {
        let mut data = BusinessData::default();
        data.stock_items.push(StockItem::new(
            "Rice 5kg",
            10,
            Money::from_major(400),
            Money::from_major(450),
        ));
        let item_id = data.stock_items[0].id.clone();

        let mut sale = cash_sale(450);
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(11);

        let err = validate_sale(&data, &sale).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InsufficientStock {
                available: 10,
                requested: 11,
                ..
            }
        ));

        sale.quantity = Some(10);
        assert!(validate_sale(&data, &sale).is_ok());
    }

    #[test]
    fn test_validate_sale_rejects_unknown_item() {
        let data = BusinessData::default();
        let mut sale = cash_sale(100);
        sale.stock_item_id = Some("ghost".to_string());
        sale.quantity = Some(1);

        assert!(matches!(
            validate_sale(&data, &sale),
            Err(ValidationError::UnknownStockItem { .. })
        ));
    }

    #[test]
    fn test_validate_sale_credit_requires_customer() {
        let mut data = BusinessData::default();
        data.customers.push(Customer::new("Rahim", None));
        let customer_id = data.customers[0].id.clone();

        let mut sale = cash_sale(500);
        sale.kind = SaleKind::Credit;
        assert!(matches!(
            validate_sale(&data, &sale),
            Err(ValidationError::Required { .. })
        ));

        sale.customer_id = Some("ghost".to_string());
        assert!(matches!(
            validate_sale(&data, &sale),
            Err(ValidationError::UnknownCustomer { .. })
        ));

        sale.customer_id = Some(customer_id);
        assert!(validate_sale(&data, &sale).is_ok());
    }

    #[test]
    fn test_suggest_selling_price() {
        let cost = Money::from_major(400);
        assert_eq!(
            suggest_selling_price(cost, MarginRate::from_percent(20)),
            Money::from_major(480)
        );
        assert_eq!(
            suggest_selling_price(cost, MarginRate::zero()),
            cost
        );
    }
}
