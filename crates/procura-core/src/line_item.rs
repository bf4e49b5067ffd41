//! # Line-Item Calculator
//!
//! Turns a submitted product-entry draft into a priced [`LineItem`].
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItemDraft { qty: 2, unit_price: 100, vat: 10 }                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_line_item()        trade_price = 2 × 100      = 200              │
//! │       │                   tax         = 200 × 5%     = 10               │
//! │       ▼                                                                 │
//! │  build_line_item()        id, labels, pack "2*1's pack"                 │
//! │       │                   discount fields = 0 (not yet distributed)     │
//! │       ▼                                                                 │
//! │  apply_discount_share(20) total_purchase_price = (200-10-20)+10+10 = 190│
//! │                           payable_to_vendor    = (200-10)-20       = 170│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::money::Money;
use crate::types::{LineItem, LineItemDraft};
use crate::validation::{validate_draft, ValidationResult};
use crate::{DEFAULT_BATCH, DEFAULT_MULTIPLIER, DEFAULT_STRENGTH_LABEL, DEFAULT_VARIANT_LABEL, TAX_RATE};

/// The creation-time prices of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    pub trade_price: Money,
    pub tax: Money,
    pub vat: Money,
}

/// Prices a line: trade price and the fixed 5% TAX.
///
/// Pure and exact. Non-positive inputs are the caller's problem; they are
/// rejected by [`validate_draft`] before a draft gets here.
///
/// ## Example
/// ```rust
/// use procura_core::line_item::price_line_item;
/// use procura_core::Money;
///
/// let pricing = price_line_item(2, Money::from_cents(10_000), Money::from_cents(1_000));
/// assert_eq!(pricing.trade_price, Money::from_cents(20_000));
/// assert_eq!(pricing.tax, Money::from_cents(1_000));
/// ```
pub fn price_line_item(quantity: i64, unit_price: Money, vat: Money) -> LinePricing {
    let trade_price = unit_price.multiply_quantity(quantity);
    LinePricing {
        trade_price,
        tax: trade_price.calculate_tax(TAX_RATE),
        vat,
    }
}

/// Looks up the strength label of a product, falling back to `"1 unit"`.
pub fn resolve_strength_label(catalog: &dyn ProductCatalog, product_name: &str) -> String {
    catalog
        .strength_of(product_name)
        .unwrap_or_else(|| DEFAULT_STRENGTH_LABEL.to_string())
}

/// Formats the pack column: `{quantity}*{multiplier}'s pack`.
pub fn pack_descriptor(quantity: i64, multiplier: &str) -> String {
    format!("{}*{}'s pack", quantity, multiplier)
}

/// Returns `value` trimmed, or `default` when it is absent or blank.
fn label_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Builds a priced line item from a draft.
///
/// The discount fields start at zero; the invoice reducers fill them in when
/// the item joins a collection.
pub fn build_line_item(draft: &LineItemDraft, catalog: &dyn ProductCatalog) -> ValidationResult<LineItem> {
    validate_draft(draft)?;

    let pricing = price_line_item(draft.quantity, draft.unit_price, draft.vat);
    let product_name = draft.product.trim().to_string();
    let multiplier = label_or(draft.multiplier.as_deref(), DEFAULT_MULTIPLIER);

    let mut item = LineItem {
        id: Uuid::new_v4().to_string(),
        strength_label: resolve_strength_label(catalog, &product_name),
        variant_label: label_or(draft.variant.as_deref(), DEFAULT_VARIANT_LABEL),
        pack_descriptor: pack_descriptor(draft.quantity, &multiplier),
        product_name,
        quantity: draft.quantity,
        unit: draft.unit,
        unit_price: draft.unit_price,
        trade_price: pricing.trade_price,
        vat: pricing.vat,
        tax: pricing.tax,
        discount_share: Money::zero(),
        total_purchase_price: Money::zero(),
        payable_to_vendor: Money::zero(),
        multiplier,
        batch: label_or(draft.batch.as_deref(), DEFAULT_BATCH),
        end_month: draft.end_month,
        end_year: draft.end_year,
        created_at: Utc::now(),
    };
    item.apply_discount_share(Money::zero());

    Ok(item)
}

impl LineItem {
    /// Trade price net of TAX.
    #[inline]
    pub fn net_trade_price(&self) -> Money {
        self.trade_price - self.tax
    }

    /// Sets this row's discount share and recomputes the two derived totals.
    ///
    /// The purchase price formula re-adds `tax` after subtracting it. It
    /// reduces to `trade_price - share + vat` but is kept term for term.
    pub fn apply_discount_share(&mut self, share: Money) {
        self.discount_share = share;
        self.total_purchase_price = (self.net_trade_price() - share) + self.tax + self.vat;
        self.payable_to_vendor = self.net_trade_price() - share;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
