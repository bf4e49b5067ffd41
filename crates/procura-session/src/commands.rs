//! # Invoice Commands
//!
//! Commands the purchase form calls. Every mutating command returns the
//! full recomputed invoice so the form can re-render header totals, the
//! product table and the reconciliation summary from one response.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌────────────┐     ┌──────────┐     │
//! │  │  Empty   │────►│ Editing  │────►│ Unbalanced │────►│ Balanced │     │
//! │  │ Invoice  │     │          │◄────│            │◄────│          │     │
//! │  └──────────┘     └──────────┘     └────────────┘     └──────────┘     │
//! │                        │                                                │
//! │                   edit_header                                           │
//! │                   add_product                                           │
//! │                   remove_product                                        │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_invoice ────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Hosts without typed bindings can go through [`dispatch_json`]:
//! ```json
//! { "command": "edit_header", "args": { "field": "billAmount", "value": "1000" } }
//! { "command": "add_product", "args": { "product": "cerave", "quantity": 2, "unitPrice": "100", "vat": "10" } }
//! { "command": "remove_product", "args": { "id": "550e8400-e29b-41d4-a716-446655440000" } }
//! { "command": "get_invoice" }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use procura_core::reconcile::TableTotals;
use procura_core::validation::validate_line_item_id;
use procura_core::{
    CatalogOption, HeaderEdit, HeaderTotals, InvoiceHeader, InvoiceStatus, LineItem,
    LineItemDraft, ValidationReport,
};

use crate::error::ApiError;
use crate::state::{Invoice, InvoiceState};

// =============================================================================
// Responses
// =============================================================================

/// Full invoice view: inputs, derived values and the reconciliation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub session_id: String,
    pub header: InvoiceHeader,
    pub totals: HeaderTotals,
    pub items: Vec<LineItem>,
    /// Column sums of `items`.
    pub table: TableTotals,
    pub report: ValidationReport,
    pub status: InvoiceStatus,
    /// Whether the amount fields are captured for the current bill type.
    pub financials_enabled: bool,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        let report = invoice.report();
        InvoiceResponse {
            session_id: invoice.session_id.clone(),
            header: invoice.header.clone(),
            totals: invoice.totals(),
            items: invoice.items.clone(),
            table: invoice.table_totals(),
            status: report.status,
            report,
            financials_enabled: invoice.header.financials_enabled(),
        }
    }
}

/// Dropdown options for the header and product-entry forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub products: Vec<CatalogOption>,
    pub brands: Vec<CatalogOption>,
    pub vendors: Vec<CatalogOption>,
    pub purchase_orders: Vec<CatalogOption>,
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current invoice.
pub fn get_invoice(state: &InvoiceState) -> InvoiceResponse {
    debug!("get_invoice command");
    // `From<&'a Invoice>` fixes the lifetime, so the higher-ranked bound needs a closure
    state.with_invoice(|invoice| InvoiceResponse::from(invoice))
}

/// Sets one header field.
///
/// Editing `totalDiscount` rewrites every row's discount share, payable
/// and total purchase price.
///
/// ## Errors
/// `VALIDATION_ERROR` for a negative amount; the header is unchanged.
pub fn edit_header(state: &InvoiceState, edit: HeaderEdit) -> Result<InvoiceResponse, ApiError> {
    debug!(?edit, "edit_header command");

    state.with_invoice_mut(|invoice, _| -> Result<InvoiceResponse, ApiError> {
        invoice.apply_edit(edit)?;
        Ok(InvoiceResponse::from(&*invoice))
    })
}

/// Prices a product and appends it to the table.
///
/// ## Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product entry: cerave × 2 @ 100.00, VAT 10.00, discount pool 20.00    │
/// │                                                                         │
/// │  1. Validate draft (product, quantity > 0, unit price > 0, VAT ≥ 0)    │
/// │  2. Trade price = 200.00, TAX = 10.00                                  │
/// │  3. n = rows + 1 → share = 20.00 / n for every row                      │
/// │  4. Payable = (200.00 − 10.00) − 20.00 = 170.00                        │
/// │                                                                         │
/// │  Rejected draft → VALIDATION_ERROR, table unchanged                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn add_product(
    state: &InvoiceState,
    draft: LineItemDraft,
) -> Result<InvoiceResponse, ApiError> {
    debug!(product = %draft.product, quantity = draft.quantity, "add_product command");

    state.with_invoice_mut(|invoice, catalog| -> Result<InvoiceResponse, ApiError> {
        let item = invoice.add_item(&draft, catalog)?;
        info!(
            id = %item.id,
            product = %item.product_name,
            trade_price = %item.trade_price,
            "Product added to invoice"
        );
        Ok(InvoiceResponse::from(&*invoice))
    })
}

/// Removes a row and redistributes the discount over the remaining rows.
///
/// ## Errors
/// - `VALIDATION_ERROR` if `id` is not a UUID
/// - `NOT_FOUND` if no row has that id
pub fn remove_product(state: &InvoiceState, id: &str) -> Result<InvoiceResponse, ApiError> {
    debug!(id = %id, "remove_product command");
    validate_line_item_id(id)?;

    state.with_invoice_mut(|invoice, _| -> Result<InvoiceResponse, ApiError> {
        invoice.remove_item(id)?;
        Ok(InvoiceResponse::from(&*invoice))
    })
}

/// Clears header and table. The session id is kept.
pub fn clear_invoice(state: &InvoiceState) -> InvoiceResponse {
    debug!("clear_invoice command");
    state.with_invoice_mut(|invoice, _| {
        invoice.clear();
        InvoiceResponse::from(&*invoice)
    })
}

/// Gets the dropdown options.
pub fn get_catalog(state: &InvoiceState) -> CatalogResponse {
    debug!("get_catalog command");
    let catalog = state.catalog();
    CatalogResponse {
        products: catalog.products(),
        brands: catalog.brands(),
        vendors: catalog.vendors(),
        purchase_orders: catalog.purchase_orders(),
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// A command as received over an untyped channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    GetInvoice,
    EditHeader(HeaderEdit),
    AddProduct(LineItemDraft),
    RemoveProduct { id: String },
    ClearInvoice,
    GetCatalog,
}

/// Runs a command and serializes its response.
pub fn dispatch(state: &InvoiceState, command: Command) -> Result<serde_json::Value, ApiError> {
    let value = match command {
        Command::GetInvoice => serde_json::to_value(get_invoice(state)),
        Command::EditHeader(edit) => serde_json::to_value(edit_header(state, edit)?),
        Command::AddProduct(draft) => serde_json::to_value(add_product(state, draft)?),
        Command::RemoveProduct { id } => serde_json::to_value(remove_product(state, &id)?),
        Command::ClearInvoice => serde_json::to_value(clear_invoice(state)),
        Command::GetCatalog => serde_json::to_value(get_catalog(state)),
    };

    value.map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}

/// Parses, runs and serializes a JSON command.
///
/// ## Errors
/// `INVALID_REQUEST` if the payload is not a known command.
pub fn dispatch_json(state: &InvoiceState, payload: &str) -> Result<String, ApiError> {
    let command: Command = serde_json::from_str(payload)?;
    let value = dispatch(state, command)?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use procura_core::reconcile::CheckKind;
    use procura_core::{BillType, Money};
    use rust_decimal_macros::dec;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::new(value)
    }

    fn cerave_draft() -> LineItemDraft {
        LineItemDraft::new("cerave", 2, money(dec!(100)), money(dec!(10)))
    }

    fn state_with_header() -> InvoiceState {
        let state = InvoiceState::default();
        edit_header(&state, HeaderEdit::BillAmount(money(dec!(1000)))).unwrap();
        edit_header(&state, HeaderEdit::TotalVat(money(dec!(50)))).unwrap();
        edit_header(&state, HeaderEdit::TotalDiscount(money(dec!(20)))).unwrap();
        state
    }

    #[test]
    fn test_header_totals() {
        let state = state_with_header();
        let response = get_invoice(&state);

        assert_eq!(response.totals.total_tp, money(dec!(950)));
        assert_eq!(response.totals.total_tax, money(dec!(47.5)));
        assert_eq!(response.totals.payable_to_vendor, money(dec!(882.5)));
        assert_eq!(response.totals.total_tds_vds, money(dec!(97.5)));
        assert_eq!(response.status, InvoiceStatus::Balanced);
    }

    #[test]
    fn test_add_product_single_row() {
        let state = state_with_header();
        let response = add_product(&state, cerave_draft()).unwrap();

        assert_eq!(response.items.len(), 1);
        let item = &response.items[0];
        assert_eq!(item.trade_price, money(dec!(200)));
        assert_eq!(item.tax, money(dec!(10)));
        assert_eq!(item.discount_share, money(dec!(20)));
        assert_eq!(item.payable_to_vendor, money(dec!(170)));
        assert_eq!(item.total_purchase_price, money(dec!(190)));
        assert_eq!(item.strength_label, "355ml");

        assert_eq!(response.status, InvoiceStatus::Unbalanced);
        let vat = response.report.check(CheckKind::TotalVat).unwrap();
        assert!(!vat.matches);
        let discount = response.report.check(CheckKind::TotalDiscount).unwrap();
        assert!(discount.matches);
    }

    #[test]
    fn test_second_product_halves_share() {
        let state = state_with_header();
        add_product(&state, cerave_draft()).unwrap();
        let response = add_product(&state, cerave_draft()).unwrap();

        assert_eq!(response.items.len(), 2);
        for item in &response.items {
            assert_eq!(item.discount_share, money(dec!(10)));
            assert_eq!(item.payable_to_vendor, money(dec!(180)));
        }
        assert_eq!(response.table.discount, money(dec!(20)));
    }

    #[test]
    fn test_rejected_draft_keeps_table() {
        let state = state_with_header();
        add_product(&state, cerave_draft()).unwrap();

        let mut draft = cerave_draft();
        draft.quantity = 0;
        let err = add_product(&state, draft).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(get_invoice(&state).items.len(), 1);
    }

    #[test]
    fn test_negative_header_amount_rejected() {
        let state = state_with_header();
        let err = edit_header(&state, HeaderEdit::BillAmount(money(dec!(-1)))).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_invoice(&state).header.bill_amount, money(dec!(1000)));
    }

    #[test]
    fn test_discount_edit_redistributes() {
        let state = state_with_header();
        add_product(&state, cerave_draft()).unwrap();
        add_product(&state, cerave_draft()).unwrap();

        let response =
            edit_header(&state, HeaderEdit::TotalDiscount(money(dec!(60)))).unwrap();

        for item in &response.items {
            assert_eq!(item.discount_share, money(dec!(30)));
            assert_eq!(item.payable_to_vendor, money(dec!(160)));
        }
        let discount = response.report.check(CheckKind::TotalDiscount).unwrap();
        assert!(discount.matches);
    }

    #[test]
    fn test_remove_product() {
        let state = state_with_header();
        add_product(&state, cerave_draft()).unwrap();
        let response = add_product(&state, cerave_draft()).unwrap();
        let id = response.items[0].id.clone();

        let response = remove_product(&state, &id).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].discount_share, money(dec!(20)));

        let err = remove_product(&state, &id).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = remove_product(&state, "not-a-uuid").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_clear_invoice() {
        let state = state_with_header();
        add_product(&state, cerave_draft()).unwrap();
        let session_id = get_invoice(&state).session_id;

        let response = clear_invoice(&state);

        assert!(response.items.is_empty());
        assert_eq!(response.header, InvoiceHeader::default());
        assert_eq!(response.session_id, session_id);
    }

    #[test]
    fn test_financials_follow_bill_type() {
        let state = InvoiceState::default();
        let response =
            edit_header(&state, HeaderEdit::BillType(Some(BillType::IncludingTaxVat))).unwrap();
        assert!(response.financials_enabled);

        let response =
            edit_header(&state, HeaderEdit::BillType(Some(BillType::ExcludingTaxVat))).unwrap();
        assert!(!response.financials_enabled);
    }

    #[test]
    fn test_get_catalog() {
        let catalog = get_catalog(&InvoiceState::default());
        assert_eq!(catalog.products.len(), 3);
        assert_eq!(catalog.purchase_orders.len(), 3);
    }

    #[test]
    fn test_dispatch_json() {
        let state = InvoiceState::default();

        dispatch_json(
            &state,
            r#"{"command":"edit_header","args":{"field":"totalDiscount","value":"20"}}"#,
        )
        .unwrap();
        let body = dispatch_json(
            &state,
            r#"{"command":"add_product","args":{"product":"cerave","quantity":2,"unitPrice":"100","vat":"10"}}"#,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let payable: Money = serde_json::from_value(json["items"][0]["payableToVendor"].clone()).unwrap();
        assert_eq!(payable, money(dec!(170)));
        assert_eq!(json["report"]["status"], "unbalanced");

        let body = dispatch_json(&state, r#"{"command":"get_invoice"}"#).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_oversized_quantity_rejected_and_session_survives() {
        let state = InvoiceState::default();

        let err = dispatch_json(
            &state,
            r#"{"command":"add_product","args":{"product":"cerave","quantity":9000000000000000000,"unitPrice":"100000000000","vat":"0"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let body = dispatch_json(&state, r#"{"command":"get_invoice"}"#).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["items"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_oversized_unit_price_rejected() {
        let state = InvoiceState::default();
        let payload = r#"{"command":"add_product","args":{"product":"cerave","quantity":1,"unitPrice":"50000000000000000000000000000","vat":"0"}}"#;

        for _ in 0..2 {
            let err = dispatch_json(&state, payload).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        assert!(get_invoice(&state).items.is_empty());
    }

    #[test]
    fn test_oversized_header_amounts_rejected() {
        let state = InvoiceState::default();

        for field in ["totalVAT", "totalDiscount", "billAmount"] {
            let payload = format!(
                r#"{{"command":"edit_header","args":{{"field":"{}","value":"79228162514264337593543950335"}}}}"#,
                field
            );
            let err = dispatch_json(&state, &payload).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let response = get_invoice(&state);
        assert!(response.header.total_vat.is_zero());
        assert!(response.header.total_discount.is_zero());
        assert_eq!(response.status, InvoiceStatus::Balanced);
    }

    #[test]
    fn test_dispatch_json_rejects_unknown_command() {
        let state = InvoiceState::default();
        let err = dispatch_json(&state, r#"{"command":"finalize"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
