//! # Invoice Reconciliation
//!
//! Cross-checks the header against the product table.
//!
//! ## Checks
//! ```text
//! ┌──────────────────────┬──────────────────────────┬────────────────────────┐
//! │ Check                │ Input (header side)      │ Table (line items)     │
//! ├──────────────────────┼──────────────────────────┼────────────────────────┤
//! │ Total VAT            │ header.total_vat         │ Σ item.vat             │
//! │ Total TAX            │ totals.total_tax         │ Σ item.tax             │
//! │ Total Discount       │ header.total_discount    │ Σ item.discount_share  │
//! │ Payable to Vendor    │ totals.payable_to_vendor │ Σ item.payable_to_vendor│
//! └──────────────────────┴──────────────────────────┴────────────────────────┘
//! ```
//!
//! A pair matches when `|input - table| < 0.01`. The tolerance absorbs the
//! noise of repeated division; it is not a business allowance.
//!
//! A mismatch is a normal, first-class outcome. Nothing here returns an
//! error or mutates anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::invoice::HeaderTotals;
use crate::money::Money;
use crate::types::{InvoiceHeader, LineItem};
use crate::RECONCILIATION_TOLERANCE_CENTS;

/// Which header/table pair a check compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    TotalVat,
    TotalTax,
    TotalDiscount,
    PayableToVendor,
}

impl CheckKind {
    /// Label shown next to the check.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::TotalVat => "Total VAT",
            CheckKind::TotalTax => "Total TAX",
            CheckKind::TotalDiscount => "Total Discount",
            CheckKind::PayableToVendor => "Payable to Vendor",
        }
    }
}

/// Observable state of the invoice. Neither state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// At least one check failed.
    Unbalanced,
    /// All four checks match; the invoice is ready for processing.
    Balanced,
}

/// The result of comparing one header value with its table sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationCheck {
    pub kind: CheckKind,
    pub input_value: Money,
    pub table_value: Money,
    pub matches: bool,
}

impl ReconciliationCheck {
    /// Compares the two values under the fixed tolerance.
    pub fn compare(kind: CheckKind, input_value: Money, table_value: Money) -> Self {
        ReconciliationCheck {
            kind,
            input_value,
            table_value,
            matches: amounts_match(input_value, table_value),
        }
    }
}

/// `Total VAT: 50.00` when matching, `Total VAT: Input: 50.00 / Table: 10.00`
/// otherwise.
impl fmt::Display for ReconciliationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches {
            write!(f, "{}: {}", self.kind.label(), self.input_value)
        } else {
            write!(
                f,
                "{}: Input: {} / Table: {}",
                self.kind.label(),
                self.input_value,
                self.table_value
            )
        }
    }
}

/// Sums of the four reconciled columns of the product table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableTotals {
    pub vat: Money,
    pub tax: Money,
    pub discount: Money,
    pub payable_to_vendor: Money,
}

impl TableTotals {
    pub fn from_items(items: &[LineItem]) -> Self {
        items.iter().fold(TableTotals::default(), |mut acc, item| {
            acc.vat += item.vat;
            acc.tax += item.tax;
            acc.discount += item.discount_share;
            acc.payable_to_vendor += item.payable_to_vendor;
            acc
        })
    }
}

/// Read-only reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub checks: Vec<ReconciliationCheck>,
    pub status: InvoiceStatus,
}

impl ValidationReport {
    /// True when every check matches.
    pub fn is_ready(&self) -> bool {
        self.status == InvoiceStatus::Balanced
    }

    /// Looks up a single check.
    pub fn check(&self, kind: CheckKind) -> Option<&ReconciliationCheck> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    /// The checks that failed, in display order.
    pub fn mismatches(&self) -> impl Iterator<Item = &ReconciliationCheck> {
        self.checks.iter().filter(|c| !c.matches)
    }

    /// Banner text for the purchase form.
    pub fn summary(&self) -> &'static str {
        match self.status {
            InvoiceStatus::Balanced => "All values match! The invoice is ready for processing.",
            InvoiceStatus::Unbalanced => {
                "Some values don't match between your input and the product table calculations."
            }
        }
    }
}

/// Returns true when two amounts agree within the reconciliation tolerance.
pub fn amounts_match(a: Money, b: Money) -> bool {
    a.approx_eq(b, Money::from_cents(RECONCILIATION_TOLERANCE_CENTS))
}

/// Reconciles the header against the line items.
///
/// ## Example
/// ```rust
/// use procura_core::reconcile::{validate_invoice, InvoiceStatus};
/// use procura_core::InvoiceHeader;
///
/// // An empty invoice with an empty header is trivially balanced
/// let report = validate_invoice(&InvoiceHeader::default(), &[]);
/// assert_eq!(report.status, InvoiceStatus::Balanced);
/// ```
pub fn validate_invoice(header: &InvoiceHeader, items: &[LineItem]) -> ValidationReport {
    let totals = HeaderTotals::derive(header);
    let table = TableTotals::from_items(items);

    let checks = vec![
        ReconciliationCheck::compare(CheckKind::TotalVat, header.total_vat, table.vat),
        ReconciliationCheck::compare(CheckKind::TotalTax, totals.total_tax, table.tax),
        ReconciliationCheck::compare(
            CheckKind::TotalDiscount,
            header.total_discount,
            table.discount,
        ),
        ReconciliationCheck::compare(
            CheckKind::PayableToVendor,
            totals.payable_to_vendor,
            table.payable_to_vendor,
        ),
    ];

    let status = if checks.iter().all(|c| c.matches) {
        InvoiceStatus::Balanced
    } else {
        InvoiceStatus::Unbalanced
    };

    ValidationReport { checks, status }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::invoice::add_line_item;
    use crate::types::LineItemDraft;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    fn scenario_header() -> InvoiceHeader {
        InvoiceHeader::with_amounts(money(dec!(1000)), money(dec!(50)), money(dec!(20)))
    }

    fn scenario_items(count: usize) -> Vec<LineItem> {
        let catalog = StaticCatalog::builtin();
        let draft = LineItemDraft::new("cerave", 2, money(dec!(100)), money(dec!(10)));
        let mut items = Vec::new();
        for _ in 0..count {
            items = add_line_item(&items, &draft, money(dec!(20)), &catalog).unwrap();
        }
        items
    }

    #[test]
    fn test_vat_mismatch_reported_with_both_values() {
        let report = validate_invoice(&scenario_header(), &scenario_items(1));

        let vat = report.check(CheckKind::TotalVat).unwrap();
        assert!(!vat.matches);
        assert_eq!(vat.input_value, money(dec!(50)));
        assert_eq!(vat.table_value, money(dec!(10)));
        assert_eq!(vat.to_string(), "Total VAT: Input: 50.00 / Table: 10.00");

        assert_eq!(report.status, InvoiceStatus::Unbalanced);
        assert!(!report.is_ready());
    }

    #[test]
    fn test_single_item_scenario_checks() {
        let report = validate_invoice(&scenario_header(), &scenario_items(1));

        let tax = report.check(CheckKind::TotalTax).unwrap();
        assert_eq!(tax.input_value, money(dec!(47.5)));
        assert_eq!(tax.table_value, money(dec!(10)));
        assert!(!tax.matches);

        assert!(report.check(CheckKind::TotalDiscount).unwrap().matches);

        let payable = report.check(CheckKind::PayableToVendor).unwrap();
        assert_eq!(payable.input_value, money(dec!(882.5)));
        assert_eq!(payable.table_value, money(dec!(170)));
        assert!(!payable.matches);

        assert_eq!(report.mismatches().count(), 3);
    }

    #[test]
    fn test_second_item_discount_check_passes() {
        let report = validate_invoice(&scenario_header(), &scenario_items(2));

        let discount = report.check(CheckKind::TotalDiscount).unwrap();
        assert!(discount.matches);
        assert_eq!(discount.table_value, money(dec!(20)));
        assert_eq!(discount.to_string(), "Total Discount: 20.00");
    }

    #[test]
    fn test_discount_split_three_ways_still_matches() {
        let report = validate_invoice(&scenario_header(), &scenario_items(3));
        assert!(report.check(CheckKind::TotalDiscount).unwrap().matches);
    }

    #[test]
    fn test_balanced_invoice() {
        // One item: TP 1000, tax 50, vat 40, discount 20
        let catalog = StaticCatalog::builtin();
        let draft = LineItemDraft::new("cerave", 10, money(dec!(100)), money(dec!(40)));
        let items = add_line_item(&[], &draft, money(dec!(20)), &catalog).unwrap();
        let header = InvoiceHeader::with_amounts(money(dec!(1040)), money(dec!(40)), money(dec!(20)));

        let report = validate_invoice(&header, &items);

        assert_eq!(report.status, InvoiceStatus::Balanced);
        assert!(report.is_ready());
        assert_eq!(report.mismatches().count(), 0);
        assert_eq!(
            report.summary(),
            "All values match! The invoice is ready for processing."
        );
    }

    #[test]
    fn test_validate_invoice_is_idempotent() {
        let header = scenario_header();
        let items = scenario_items(2);

        let first = validate_invoice(&header, &items);
        let second = validate_invoice(&header, &items);
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_moves_both_ways() {
        let catalog = StaticCatalog::builtin();
        let draft = LineItemDraft::new("cerave", 10, money(dec!(100)), money(dec!(40)));
        let items = add_line_item(&[], &draft, money(dec!(20)), &catalog).unwrap();

        let mut header = InvoiceHeader::with_amounts(money(dec!(1040)), money(dec!(40)), money(dec!(20)));
        assert!(validate_invoice(&header, &items).is_ready());

        header.total_vat = money(dec!(41));
        assert!(!validate_invoice(&header, &items).is_ready());

        header.total_vat = money(dec!(40));
        assert!(validate_invoice(&header, &items).is_ready());
    }

    #[test]
    fn test_amounts_match_tolerance() {
        assert!(amounts_match(money(dec!(20)), money(dec!(20.009))));
        assert!(!amounts_match(money(dec!(20)), money(dec!(20.01))));
    }

    #[test]
    fn test_table_totals() {
        let totals = TableTotals::from_items(&scenario_items(2));
        assert_eq!(totals.vat, money(dec!(20)));
        assert_eq!(totals.tax, money(dec!(20)));
        assert_eq!(totals.discount, money(dec!(20)));
        assert_eq!(totals.payable_to_vendor, money(dec!(360)));
    }
}
