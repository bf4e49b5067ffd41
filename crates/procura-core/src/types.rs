//! # Domain Types
//!
//! Core domain types for a purchase invoice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │  InvoiceHeader   │   │  LineItemDraft   │   │    LineItem      │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  bill_amount     │   │  product         │   │  id (UUID)       │    │
//! │  │  total_vat       │   │  quantity        │   │  trade_price     │    │
//! │  │  total_discount  │   │  unit_price      │   │  tax             │    │
//! │  │  vendor, brand…  │   │  vat             │   │  discount_share  │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │   HeaderEdit     │   │    BillType      │   │  PurchaseType    │    │
//! │  │  field + value   │   │  4 tax/VAT modes │   │  PaymentMethod   │    │
//! │  └──────────────────┘   └──────────────────┘   │  PaymentTerms    │    │
//! │                                                │  Unit            │    │
//! │                                                └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Descriptive header fields (vendor, brand, bill type, payment terms) are
//! opaque to the calculation. They ride along for display only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_header_amount, ValidationResult};

// =============================================================================
// Descriptive Enumerations
// =============================================================================

/// Where the goods are purchased from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseType {
    OfficialLocal,
    OfficialImport,
    Personal,
}

/// How the vendor's bill treats TAX and VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum BillType {
    /// Bill amount includes both TAX and VAT.
    IncludingTaxVat,
    ExcludingTaxVat,
    IncludingTaxExcludingVat,
    ExcludingTaxIncludingVat,
}

impl BillType {
    /// Returns true if the financial header fields are captured for this
    /// bill type. Only bills including TAX and VAT expose them today.
    pub fn captures_financials(&self) -> bool {
        matches!(self, BillType::IncludingTaxVat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Check,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentTerms {
    Immediate,
    #[serde(rename = "net-30")]
    Net30,
    #[serde(rename = "net-60")]
    Net60,
    #[serde(rename = "net-90")]
    Net90,
}

/// Packaging unit of a purchased product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pcs,
    Box,
    Pack,
    Bottle,
}

// =============================================================================
// Invoice Header
// =============================================================================

/// The user-entered header of a purchase invoice.
///
/// Only `bill_amount`, `total_vat` and `total_discount` feed the
/// calculation. Everything else is descriptive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub purchase_type: Option<PurchaseType>,
    pub purchase_order: Option<String>,
    pub brand: Option<String>,
    pub vendor: Option<String>,
    pub bill_type: Option<BillType>,

    /// Total amount on the vendor's bill.
    pub bill_amount: Money,

    /// Total VAT stated on the vendor's bill.
    #[serde(rename = "totalVAT")]
    pub total_vat: Money,

    /// Discount pool shared equally across all line items.
    pub total_discount: Money,

    pub payment_method: Option<PaymentMethod>,
    pub payment_terms: Option<PaymentTerms>,
    pub note: String,
}

impl InvoiceHeader {
    /// Creates a header with the three calculation inputs set.
    pub fn with_amounts(bill_amount: Money, total_vat: Money, total_discount: Money) -> Self {
        InvoiceHeader {
            bill_amount,
            total_vat,
            total_discount,
            ..Default::default()
        }
    }

    /// Returns true if the selected bill type exposes the financial fields.
    pub fn financials_enabled(&self) -> bool {
        self.bill_type
            .map(|bill_type| bill_type.captures_financials())
            .unwrap_or(false)
    }

    /// Applies one field edit from the purchase form.
    ///
    /// Amount edits are rejected when negative; the header is unchanged on
    /// error.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::{HeaderEdit, InvoiceHeader, Money};
    ///
    /// let mut header = InvoiceHeader::default();
    /// header.apply_edit(HeaderEdit::BillAmount(Money::from_cents(100_000))).unwrap();
    /// assert_eq!(header.bill_amount, Money::from_cents(100_000));
    ///
    /// assert!(header.apply_edit(HeaderEdit::TotalVat(Money::from_cents(-1))).is_err());
    /// ```
    pub fn apply_edit(&mut self, edit: HeaderEdit) -> ValidationResult<()> {
        match edit {
            HeaderEdit::PurchaseType(value) => self.purchase_type = value,
            HeaderEdit::PurchaseOrder(value) => self.purchase_order = value,
            HeaderEdit::Brand(value) => self.brand = value,
            HeaderEdit::Vendor(value) => self.vendor = value,
            HeaderEdit::BillType(value) => self.bill_type = value,
            HeaderEdit::BillAmount(amount) => {
                validate_header_amount("bill amount", amount)?;
                self.bill_amount = amount;
            }
            HeaderEdit::TotalVat(amount) => {
                validate_header_amount("total VAT", amount)?;
                self.total_vat = amount;
            }
            HeaderEdit::TotalDiscount(amount) => {
                validate_header_amount("total discount", amount)?;
                self.total_discount = amount;
            }
            HeaderEdit::PaymentMethod(value) => self.payment_method = value,
            HeaderEdit::PaymentTerms(value) => self.payment_terms = value,
            HeaderEdit::Note(value) => self.note = value,
        }
        Ok(())
    }
}

/// A single key/value edit of an [`InvoiceHeader`] field.
///
/// ## Wire Form
/// ```json
/// { "field": "billAmount", "value": "1000" }
/// { "field": "vendor", "value": "vendor1" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum HeaderEdit {
    PurchaseType(Option<PurchaseType>),
    PurchaseOrder(Option<String>),
    Brand(Option<String>),
    Vendor(Option<String>),
    BillType(Option<BillType>),
    BillAmount(Money),
    #[serde(rename = "totalVAT")]
    TotalVat(Money),
    TotalDiscount(Money),
    PaymentMethod(Option<PaymentMethod>),
    PaymentTerms(Option<PaymentTerms>),
    Note(String),
}

impl HeaderEdit {
    /// Returns true if this edit changes the discount pool, which forces a
    /// redistribution over every line item.
    pub fn changes_discount_pool(&self) -> bool {
        matches!(self, HeaderEdit::TotalDiscount(_))
    }
}

// =============================================================================
// Line Item Draft
// =============================================================================

/// The product-entry form as submitted, before pricing.
///
/// `multiplier` and `batch` are passthrough placeholders; when absent the
/// crate defaults are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItemDraft {
    pub product: String,
    pub variant: Option<String>,
    pub quantity: i64,
    pub unit: Option<Unit>,
    pub unit_price: Money,
    pub vat: Money,
    pub end_month: Option<u32>,
    pub end_year: Option<i32>,
    pub multiplier: Option<String>,
    pub batch: Option<String>,
}

impl LineItemDraft {
    /// Creates a draft with the four fields the calculation needs.
    pub fn new(product: impl Into<String>, quantity: i64, unit_price: Money, vat: Money) -> Self {
        LineItemDraft {
            product: product.into(),
            quantity,
            unit_price,
            vat,
            ..Default::default()
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A priced row of the invoice's product table.
///
/// `trade_price` and `tax` are frozen at creation. The three discount
/// fields are rewritten by every redistribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub product_name: String,
    pub variant_label: String,
    pub strength_label: String,
    pub quantity: i64,
    /// `{quantity}*{multiplier}'s pack`
    pub pack_descriptor: String,
    pub unit: Option<Unit>,
    pub unit_price: Money,

    /// quantity × unit price.
    pub trade_price: Money,
    pub vat: Money,
    /// trade price × 5%.
    pub tax: Money,

    pub discount_share: Money,
    pub total_purchase_price: Money,
    pub payable_to_vendor: Money,

    pub multiplier: String,
    pub batch: String,
    pub end_month: Option<u32>,
    pub end_year: Option<i32>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_header_edit_wire_form() {
        let edit: HeaderEdit =
            serde_json::from_str(r#"{"field":"billAmount","value":"1000"}"#).unwrap();
        assert_eq!(edit, HeaderEdit::BillAmount(Money::new(dec!(1000))));

        let edit: HeaderEdit =
            serde_json::from_str(r#"{"field":"totalVAT","value":"50"}"#).unwrap();
        assert_eq!(edit, HeaderEdit::TotalVat(Money::new(dec!(50))));

        let edit: HeaderEdit =
            serde_json::from_str(r#"{"field":"billType","value":"including-tax-vat"}"#).unwrap();
        assert_eq!(edit, HeaderEdit::BillType(Some(BillType::IncludingTaxVat)));

        let edit: HeaderEdit =
            serde_json::from_str(r#"{"field":"paymentTerms","value":"net-30"}"#).unwrap();
        assert_eq!(edit, HeaderEdit::PaymentTerms(Some(PaymentTerms::Net30)));
    }

    #[test]
    fn test_apply_edit_rejects_negative_amounts() {
        let mut header = InvoiceHeader::with_amounts(
            Money::new(dec!(1000)),
            Money::new(dec!(50)),
            Money::new(dec!(20)),
        );

        assert!(header
            .apply_edit(HeaderEdit::TotalDiscount(Money::new(dec!(-5))))
            .is_err());
        assert_eq!(header.total_discount, Money::new(dec!(20)));
    }

    #[test]
    fn test_apply_edit_descriptive_fields() {
        let mut header = InvoiceHeader::default();
        header
            .apply_edit(HeaderEdit::Vendor(Some("vendor1".to_string())))
            .unwrap();
        header
            .apply_edit(HeaderEdit::PaymentMethod(Some(PaymentMethod::BankTransfer)))
            .unwrap();

        assert_eq!(header.vendor.as_deref(), Some("vendor1"));
        assert_eq!(header.payment_method, Some(PaymentMethod::BankTransfer));
    }

    #[test]
    fn test_financials_enabled_by_bill_type() {
        let mut header = InvoiceHeader::default();
        assert!(!header.financials_enabled());

        header.bill_type = Some(BillType::ExcludingTaxVat);
        assert!(!header.financials_enabled());

        header.bill_type = Some(BillType::IncludingTaxVat);
        assert!(header.financials_enabled());
    }

    #[test]
    fn test_changes_discount_pool() {
        assert!(HeaderEdit::TotalDiscount(Money::zero()).changes_discount_pool());
        assert!(!HeaderEdit::BillAmount(Money::zero()).changes_discount_pool());
    }

    #[test]
    fn test_draft_defaults_from_json() {
        let draft: LineItemDraft = serde_json::from_str(
            r#"{"product":"cerave","quantity":2,"unitPrice":"100","vat":"10"}"#,
        )
        .unwrap();
        assert_eq!(draft.variant, None);
        assert_eq!(draft.multiplier, None);
        assert_eq!(draft.unit_price, Money::new(dec!(100)));
    }
}
