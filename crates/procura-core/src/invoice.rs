//! # Invoice Aggregator
//!
//! Header-level derivations and the reducers that keep the line item
//! collection consistent with the header's discount pool.
//!
//! ## Discount Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For EVERY item, at ALL times:                                          │
//! │                                                                         │
//! │      item.discount_share == header.total_discount / items.len()         │
//! │                                                                         │
//! │  Each reducer returns a full replacement collection recomputed from     │
//! │  total_discount and the frozen trade price / tax / vat of each row.     │
//! │  Nothing incremental is carried between calls.                          │
//! │                                                                         │
//! │  add_line_item ───────┐                                                 │
//! │  remove_line_item ────┼──► redistribute_discount(items, total_discount) │
//! │  discount header edit ┘                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::line_item::build_line_item;
use crate::money::Money;
use crate::types::{InvoiceHeader, LineItem, LineItemDraft};
use crate::validation::can_add_line_item;
use crate::{MAX_LINE_ITEMS, TAX_RATE};

// =============================================================================
// Header Totals
// =============================================================================

/// Values derived from the header alone.
///
/// ```text
/// total_tp          = bill_amount - total_vat
/// total_tax         = total_tp × 5%
/// payable_to_vendor = (total_tp - total_tax) - total_discount
/// total_tds_vds     = total_vat + total_tax
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeaderTotals {
    #[serde(rename = "totalTP")]
    pub total_tp: Money,
    #[serde(rename = "totalTAX")]
    pub total_tax: Money,
    pub payable_to_vendor: Money,
    #[serde(rename = "totalTDSVDS")]
    pub total_tds_vds: Money,
}

impl HeaderTotals {
    /// Derives the totals from a header.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::{HeaderTotals, InvoiceHeader, Money};
    ///
    /// let header = InvoiceHeader::with_amounts(
    ///     Money::from_cents(100_000),
    ///     Money::from_cents(5_000),
    ///     Money::from_cents(2_000),
    /// );
    /// let totals = HeaderTotals::derive(&header);
    /// assert_eq!(totals.total_tp.to_string(), "950.00");
    /// assert_eq!(totals.payable_to_vendor.to_string(), "882.50");
    /// ```
    pub fn derive(header: &InvoiceHeader) -> Self {
        let total_tp = header.bill_amount - header.total_vat;
        let total_tax = total_tp.calculate_tax(TAX_RATE);
        HeaderTotals {
            total_tp,
            total_tax,
            payable_to_vendor: (total_tp - total_tax) - header.total_discount,
            total_tds_vds: header.total_vat + total_tax,
        }
    }
}

impl InvoiceHeader {
    /// Shorthand for [`HeaderTotals::derive`].
    pub fn totals(&self) -> HeaderTotals {
        HeaderTotals::derive(self)
    }
}

// =============================================================================
// Reducers
// =============================================================================

/// The equal share of `total_discount` for a collection of `count` items.
///
/// A count of zero is the single-item case and yields the whole pool.
pub fn discount_share_for(total_discount: Money, count: usize) -> Money {
    total_discount.split_evenly(count)
}

/// Reassigns the discount share of every item.
///
/// ## Example
/// ```rust
/// use procura_core::catalog::StaticCatalog;
/// use procura_core::invoice::{add_line_item, redistribute_discount};
/// use procura_core::{LineItemDraft, Money};
///
/// let catalog = StaticCatalog::builtin();
/// let draft = LineItemDraft::new("cerave", 2, Money::from_cents(10_000), Money::zero());
/// let items = add_line_item(&[], &draft, Money::zero(), &catalog).unwrap();
///
/// let items = redistribute_discount(items, Money::from_cents(2_000));
/// assert_eq!(items[0].discount_share, Money::from_cents(2_000));
/// ```
pub fn redistribute_discount(mut items: Vec<LineItem>, total_discount: Money) -> Vec<LineItem> {
    let share = discount_share_for(total_discount, items.len());
    for item in &mut items {
        item.apply_discount_share(share);
    }
    items
}

/// Adds a priced draft to the collection and redistributes the discount
/// across all rows, returning the replacement collection.
///
/// ## Behavior
/// - Invalid drafts are rejected; `existing` is untouched
/// - A full invoice (MAX_LINE_ITEMS rows) rejects further rows
/// - Existing rows keep their order, the new row is appended
/// - Every row ends with `total_discount / (existing.len() + 1)`
///
/// ## Example
/// ```rust
/// use procura_core::catalog::StaticCatalog;
/// use procura_core::invoice::add_line_item;
/// use procura_core::{LineItemDraft, Money};
///
/// let catalog = StaticCatalog::builtin();
/// let discount = Money::from_cents(2_000);
/// let draft = LineItemDraft::new("cerave", 2, Money::from_cents(10_000), Money::from_cents(1_000));
///
/// let items = add_line_item(&[], &draft, discount, &catalog).unwrap();
/// let items = add_line_item(&items, &draft, discount, &catalog).unwrap();
///
/// assert_eq!(items.len(), 2);
/// assert!(items.iter().all(|i| i.discount_share == Money::from_cents(1_000)));
/// ```
pub fn add_line_item(
    existing: &[LineItem],
    draft: &LineItemDraft,
    total_discount: Money,
    catalog: &dyn ProductCatalog,
) -> CoreResult<Vec<LineItem>> {
    if !can_add_line_item(existing.len()) {
        return Err(CoreError::TooManyLineItems {
            max: MAX_LINE_ITEMS,
        });
    }
    let new_item = build_line_item(draft, catalog)?;

    let mut items = Vec::with_capacity(existing.len() + 1);
    items.extend_from_slice(existing);
    items.push(new_item);

    debug!(
        product = %draft.product,
        count = items.len(),
        total_discount = %total_discount,
        "Line item added, redistributing discount"
    );

    Ok(redistribute_discount(items, total_discount))
}

/// Removes the row with `id` and redistributes the discount over the rest.
///
/// ## Errors
/// `CoreError::LineItemNotFound` if no row has that id; nothing changes.
pub fn remove_line_item(
    existing: &[LineItem],
    id: &str,
    total_discount: Money,
) -> CoreResult<Vec<LineItem>> {
    if !existing.iter().any(|item| item.id == id) {
        return Err(CoreError::LineItemNotFound(id.to_string()));
    }

    let items: Vec<LineItem> = existing
        .iter()
        .filter(|item| item.id != id)
        .cloned()
        .collect();

    debug!(id = %id, remaining = items.len(), "Line item removed, redistributing discount");

    Ok(redistribute_discount(items, total_discount))
}

// =============================================================================
// Unit Tests
// =============================================================================
