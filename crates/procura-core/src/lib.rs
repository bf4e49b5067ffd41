//! # procura-core: Pure Purchase Invoice Engine
//!
//! This crate holds the calculation and reconciliation rules of the
//! purchase invoice as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Procura Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Purchase Form (TypeScript)                      │   │
//! │  │   Header fields ──► Product entry ──► Table ──► Summary         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    procura-session                              │   │
//! │  │   edit_header, add_product, remove_product, clear_invoice      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ procura-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌───────────┐ ┌───────┐  │   │
//! │  │  │  money  │ │ line_item │ │ invoice │ │ reconcile │ │catalog│  │   │
//! │  │  │  Money  │ │  pricing  │ │ reducers│ │  report   │ │ trait │  │   │
//! │  │  └─────────┘ └───────────┘ └─────────┘ └───────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Header, draft and line item types
//! - [`money`] - Fixed-point `Money` and `TaxRate`
//! - [`catalog`] - Product reference data behind a trait
//! - [`line_item`] - Line-Item Calculator
//! - [`invoice`] - Header derivations and discount redistribution
//! - [`reconcile`] - Header vs. table cross-validation
//! - [`validation`] - Door checks for submitted input
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use procura_core::catalog::StaticCatalog;
//! use procura_core::invoice::add_line_item;
//! use procura_core::reconcile::{validate_invoice, CheckKind};
//! use procura_core::{InvoiceHeader, LineItemDraft, Money};
//!
//! let catalog = StaticCatalog::builtin();
//! let header = InvoiceHeader::with_amounts(
//!     Money::from_cents(100_000), // bill amount 1000.00
//!     Money::from_cents(5_000),   // total VAT 50.00
//!     Money::from_cents(2_000),   // total discount 20.00
//! );
//!
//! let draft = LineItemDraft::new("cerave", 2, Money::from_cents(10_000), Money::from_cents(1_000));
//! let items = add_line_item(&[], &draft, header.total_discount, &catalog).unwrap();
//! assert_eq!(items[0].payable_to_vendor, Money::from_cents(17_000));
//!
//! let report = validate_invoice(&header, &items);
//! let vat = report.check(CheckKind::TotalVat).unwrap();
//! assert_eq!(vat.to_string(), "Total VAT: Input: 50.00 / Table: 10.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod invoice;
pub mod line_item;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogOption, ProductCatalog, StaticCatalog};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::HeaderTotals;
pub use money::{Money, TaxRate};
pub use reconcile::{InvoiceStatus, ValidationReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The purchase TAX levy: 5% of trade price. Not configurable.
pub const TAX_RATE: TaxRate = TaxRate::from_bps(500);

/// Reconciliation tolerance, in cents (0.01).
pub const RECONCILIATION_TOLERANCE_CENTS: i64 = 1;

/// Variant label used when the draft leaves it blank.
pub const DEFAULT_VARIANT_LABEL: &str = "Single Variant";

/// Strength label for products the catalog does not know.
pub const DEFAULT_STRENGTH_LABEL: &str = "1 unit";

/// Pack multiplier placeholder.
pub const DEFAULT_MULTIPLIER: &str = "1";

/// Batch placeholder until batches are assigned by the warehouse.
pub const DEFAULT_BATCH: &str = "AUTO-BATCH-001";

/// Earliest accepted expiry year.
pub const MIN_EXPIRY_YEAR: i32 = 2024;

/// Maximum quantity on a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// Maximum number of line items on one invoice.
pub const MAX_LINE_ITEMS: usize = 1_000;

/// Upper bound, in whole currency units, for unit prices, VAT and header
/// amounts.
///
/// With the quantity and line count caps every reachable product or sum
/// stays below 1e25, far inside `Decimal::MAX` (about 7.9e28).
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;
