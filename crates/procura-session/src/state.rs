//! # Invoice State
//!
//! Owns the invoice being edited in one session.
//!
//! ## Thread Safety
//! The invoice is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands read and modify the same invoice
//! 2. Adding a product computes `n = items.len() + 1` and rewrites every
//!    row; two additions working from a stale count would lose an update
//! 3. Holding the lock for the whole reducer call serializes them
//!
//! ## Invoice Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice State Operations                             │
//! │                                                                         │
//! │  Form Action              Command                 State Change          │
//! │  ───────────              ───────                 ────────────          │
//! │                                                                         │
//! │  Edit header field ──────► edit_header() ────────► header.apply_edit   │
//! │                                                    (+ redistribute if   │
//! │                                                     discount changed)   │
//! │                                                                         │
//! │  Add Product ────────────► add_product() ────────► add_line_item       │
//! │                                                                         │
//! │  Remove row ─────────────► remove_product() ─────► remove_line_item    │
//! │                                                                         │
//! │  Clear ──────────────────► clear_invoice() ──────► fresh invoice       │
//! │                                                                         │
//! │  NOTE: All write operations acquire the Mutex lock exclusively.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use procura_core::invoice::{add_line_item, redistribute_discount, remove_line_item};
use procura_core::reconcile::{validate_invoice, TableTotals};
use procura_core::{
    CoreResult, HeaderEdit, HeaderTotals, InvoiceHeader, InvoiceStatus, LineItem, LineItemDraft,
    ProductCatalog, ValidationReport,
};

use crate::config::SessionConfig;

/// The invoice of one editing session.
///
/// ## Invariants
/// - Every item's `discount_share` is `header.total_discount / items.len()`
/// - Items are only created by `add_item` and only destroyed by
///   `remove_item` or `clear`
#[derive(Debug, Clone)]
pub struct Invoice {
    /// Identifies the editing session; survives `clear`.
    pub session_id: String,

    pub header: InvoiceHeader,

    /// Product table rows, in insertion order.
    pub items: Vec<LineItem>,

    /// When the invoice was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new empty invoice.
    pub fn new() -> Self {
        Invoice {
            session_id: Uuid::new_v4().to_string(),
            header: InvoiceHeader::default(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Applies a header edit. A discount edit redistributes over all rows.
    pub fn apply_edit(&mut self, edit: HeaderEdit) -> CoreResult<()> {
        let redistribute = edit.changes_discount_pool();
        self.header.apply_edit(edit)?;

        if redistribute {
            let items = std::mem::take(&mut self.items);
            self.items = redistribute_discount(items, self.header.total_discount);
        }
        Ok(())
    }

    /// Prices and appends a product, returning the new row.
    pub fn add_item(
        &mut self,
        draft: &LineItemDraft,
        catalog: &dyn ProductCatalog,
    ) -> CoreResult<&LineItem> {
        self.items = add_line_item(&self.items, draft, self.header.total_discount, catalog)?;
        // add_line_item always appends exactly one row
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes a row by id.
    pub fn remove_item(&mut self, id: &str) -> CoreResult<()> {
        self.items = remove_line_item(&self.items, id, self.header.total_discount)?;
        Ok(())
    }

    /// Resets header and rows, keeping the session id.
    pub fn clear(&mut self) {
        self.header = InvoiceHeader::default();
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of rows.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the product table is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Header-derived totals.
    pub fn totals(&self) -> HeaderTotals {
        self.header.totals()
    }

    /// Column sums of the product table.
    pub fn table_totals(&self) -> TableTotals {
        TableTotals::from_items(&self.items)
    }

    /// Reconciles the header against the rows.
    pub fn report(&self) -> ValidationReport {
        validate_invoice(&self.header, &self.items)
    }

    pub fn status(&self) -> InvoiceStatus {
        self.report().status
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-managed invoice state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Invoice>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one command modifies the invoice at a time
///
/// The catalog is read-only after startup and shared without a lock.
#[derive(Clone)]
pub struct InvoiceState {
    invoice: Arc<Mutex<Invoice>>,
    catalog: Arc<dyn ProductCatalog>,
}

impl InvoiceState {
    /// Creates an empty invoice backed by `catalog`.
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        InvoiceState {
            invoice: Arc::new(Mutex::new(Invoice::new())),
            catalog,
        }
    }

    /// Creates the state with the catalog described by `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        let catalog = config.catalog.build_catalog();
        info!(
            products = config.catalog.products.len(),
            vendors = config.catalog.vendors.len(),
            "Invoice session initialized"
        );
        Self::new(Arc::new(catalog))
    }

    /// The product catalog of this session.
    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.catalog.as_ref()
    }

    /// Executes a function with read access to the invoice.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let report = state.with_invoice(|invoice| invoice.report());
    /// ```
    pub fn with_invoice<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Invoice) -> R,
    {
        let invoice = self.invoice.lock().expect("Invoice mutex poisoned");
        f(&invoice)
    }

    /// Executes a function with write access to the invoice and catalog.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_invoice_mut(|invoice, catalog| invoice.add_item(&draft, catalog).map(|_| ()))?;
    /// ```
    pub fn with_invoice_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Invoice, &dyn ProductCatalog) -> R,
    {
        let mut invoice = self.invoice.lock().expect("Invoice mutex poisoned");
        f(&mut invoice, self.catalog.as_ref())
    }
}

impl Default for InvoiceState {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
