//! # Validation Module
//!
//! Input validation for the purchase form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Purchase form (TypeScript)                                   │
//! │  ├── Required markers, numeric inputs                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (door checks)                                    │
//! │  ├── product selected, quantity > 0, unit price > 0                    │
//! │  └── rejected drafts never reach the calculator                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reconciliation (not an error)                                │
//! │  └── mismatches become ValidationReport flags                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use procura_core::validation::{validate_quantity, validate_unit_price};
//! use procura_core::Money;
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_unit_price(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::LineItemDraft;
use rust_decimal::Decimal;

use crate::{MAX_AMOUNT_UNITS, MAX_ITEM_QUANTITY, MAX_LINE_ITEMS, MIN_EXPIRY_YEAR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of free-text labels (product, variant, batch).
pub const MAX_LABEL_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the selected product name.
///
/// ## Rules
/// - Must not be empty (a product must be selected)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    if name.len() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "product".to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text label such as the variant or batch.
fn validate_optional_label(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.trim().len() > MAX_LABEL_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LEN,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (1,000,000)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Rejects amounts above MAX_AMOUNT_UNITS.
fn validate_amount_ceiling(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.amount() > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT_UNITS,
        });
    }

    Ok(())
}

/// Validates a line item unit price.
///
/// ## Rules
/// - Must be positive (> 0). Free items are not entered on a purchase bill.
/// - Must not exceed MAX_AMOUNT_UNITS
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }

    validate_amount_ceiling("unit price", price)
}

/// Validates a line item VAT amount.
///
/// ## Rules
/// - Must be non-negative (>= 0). Zero is the default.
/// - Must not exceed MAX_AMOUNT_UNITS
pub fn validate_vat(vat: Money) -> ValidationResult<()> {
    if vat.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "VAT".to_string(),
        });
    }

    validate_amount_ceiling("VAT", vat)
}

/// Validates one of the header's calculation inputs.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Must not exceed MAX_AMOUNT_UNITS
pub fn validate_header_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    validate_amount_ceiling(field, amount)
}

/// Checks that one more row fits on an invoice holding `current_items`.
///
/// ## Rules
/// - Must not exceed MAX_LINE_ITEMS (1,000)
pub fn can_add_line_item(current_items: usize) -> bool {
    current_items < MAX_LINE_ITEMS
}

/// Validates the optional expiry month/year pair.
///
/// ## Rules
/// - Month in 1..=12
/// - Year no earlier than 2024
pub fn validate_expiry(end_month: Option<u32>, end_year: Option<i32>) -> ValidationResult<()> {
    if let Some(month) = end_month {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "end month".to_string(),
                min: 1,
                max: 12,
            });
        }
    }

    if let Some(year) = end_year {
        if year < MIN_EXPIRY_YEAR {
            return Err(ValidationError::OutOfRange {
                field: "end year".to_string(),
                min: MIN_EXPIRY_YEAR as i64,
                max: 9999,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Draft Validator
// =============================================================================

/// Validates a submitted product-entry draft.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product Entry: "Add Product"                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_draft(draft) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── no product?      → "product is required"                      │
/// │       ├── qty <= 0?        → "quantity must be positive"                │
/// │       ├── price <= 0?      → "unit price must be positive"              │
/// │       │                                                                 │
/// │       └── OK → add_line_item (discount redistributed over all rows)     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_draft(draft: &LineItemDraft) -> ValidationResult<()> {
    validate_product_name(&draft.product)?;
    validate_quantity(draft.quantity)?;
    validate_unit_price(draft.unit_price)?;
    validate_vat(draft.vat)?;
    validate_expiry(draft.end_month, draft.end_year)?;
    validate_optional_label("variant", draft.variant.as_deref())?;
    validate_optional_label("batch", draft.batch.as_deref())?;

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a line item id.
///
/// ## Example
/// ```rust
/// use procura_core::validation::validate_line_item_id;
///
/// assert!(validate_line_item_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_line_item_id("not-a-uuid").is_err());
/// ```
pub fn validate_line_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft() -> LineItemDraft {
        LineItemDraft::new(
            "cerave",
            2,
            Money::new(dec!(100)),
            Money::new(dec!(10)),
        )
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("cerave").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(9_000_000_000_000_000_000),
            Err(ValidationError::OutOfRange { max: MAX_ITEM_QUANTITY, .. })
        ));
    }

    #[test]
    fn test_amount_ceiling() {
        let ceiling = Money::new(Decimal::from(MAX_AMOUNT_UNITS));
        let above = Money::new(dec!(50000000000000000000000000000));

        assert!(validate_unit_price(ceiling).is_ok());
        assert!(matches!(
            validate_unit_price(above),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_vat(above).is_err());
        assert!(validate_header_amount("total VAT", Money::new(Decimal::MAX)).is_err());
        assert!(validate_header_amount("total VAT", ceiling).is_ok());
    }

    #[test]
    fn test_can_add_line_item() {
        assert!(can_add_line_item(0));
        assert!(can_add_line_item(MAX_LINE_ITEMS - 1));
        assert!(!can_add_line_item(MAX_LINE_ITEMS));
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::new(dec!(0.01))).is_ok());
        assert!(validate_unit_price(Money::zero()).is_err());
        assert!(validate_unit_price(Money::new(dec!(-3))).is_err());
    }

    #[test]
    fn test_validate_vat() {
        assert!(validate_vat(Money::zero()).is_ok());
        assert!(validate_vat(Money::new(dec!(10))).is_ok());
        assert!(validate_vat(Money::new(dec!(-0.5))).is_err());
    }

    #[test]
    fn test_validate_expiry() {
        assert!(validate_expiry(None, None).is_ok());
        assert!(validate_expiry(Some(12), Some(2026)).is_ok());
        assert!(validate_expiry(Some(0), None).is_err());
        assert!(validate_expiry(Some(13), None).is_err());
        assert!(validate_expiry(None, Some(2023)).is_err());
    }

    #[test]
    fn test_validate_draft() {
        assert!(validate_draft(&draft()).is_ok());

        let mut missing_product = draft();
        missing_product.product = String::new();
        assert!(matches!(
            validate_draft(&missing_product),
            Err(ValidationError::Required { .. })
        ));

        let mut zero_qty = draft();
        zero_qty.quantity = 0;
        assert!(validate_draft(&zero_qty).is_err());

        let mut zero_price = draft();
        zero_price.unit_price = Money::zero();
        assert!(validate_draft(&zero_price).is_err());
    }

    #[test]
    fn test_validate_line_item_id() {
        assert!(validate_line_item_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_line_item_id("").is_err());
        assert!(validate_line_item_id("123").is_err());
    }
}
