//! # Product Catalog
//!
//! The static reference data behind the purchase form: product strengths
//! and the option lists for brands, vendors and purchase orders.
//!
//! ## Why a Trait?
//! The calculation never hard-codes product knowledge. It asks a
//! [`ProductCatalog`], so a data-service backed catalog can replace the
//! static table without touching pricing or reconciliation.
//!
//! ```text
//! ┌──────────────────┐   strength_of("CeraVe")   ┌──────────────────────┐
//! │  line_item.rs    │ ────────────────────────► │  dyn ProductCatalog  │
//! │  (calculator)    │ ◄──────────────────────── │  StaticCatalog / ... │
//! └──────────────────┘       Some("355ml")       └──────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// A selectable value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogOption {
    pub value: String,
    pub label: String,
}

impl CatalogOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        CatalogOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Source of product reference data.
///
/// Implementations must treat product names case-insensitively.
pub trait ProductCatalog: Send + Sync {
    /// Returns the strength label for a product, if the product is known.
    fn strength_of(&self, product_name: &str) -> Option<String>;

    /// Products offered in the product-entry dropdown.
    fn products(&self) -> Vec<CatalogOption>;

    /// Brands offered in the header dropdown.
    fn brands(&self) -> Vec<CatalogOption>;

    /// Vendors offered in the header dropdown.
    fn vendors(&self) -> Vec<CatalogOption>;

    /// Open purchase orders offered in the header dropdown.
    fn purchase_orders(&self) -> Vec<CatalogOption>;
}

// =============================================================================
// Static Catalog
// =============================================================================

/// In-memory catalog built from configuration.
///
/// ## Example
/// ```rust
/// use procura_core::catalog::{ProductCatalog, StaticCatalog};
///
/// let catalog = StaticCatalog::new().with_product("serum", "Serum", "30ml");
/// assert_eq!(catalog.strength_of("SERUM").as_deref(), Some("30ml"));
/// assert_eq!(catalog.strength_of("unknown"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<CatalogOption>,
    /// Lowercased product value → strength label.
    strengths: HashMap<String, String>,
    brands: Vec<CatalogOption>,
    vendors: Vec<CatalogOption>,
    purchase_orders: Vec<CatalogOption>,
}

impl StaticCatalog {
    /// Creates an empty catalog. Every product resolves to the default
    /// strength.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product and its strength label.
    pub fn with_product(
        mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        strength: impl Into<String>,
    ) -> Self {
        let option = CatalogOption::new(value, label);
        self.strengths
            .insert(option.value.to_lowercase(), strength.into());
        self.products.push(option);
        self
    }

    pub fn with_brand(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.brands.push(CatalogOption::new(value, label));
        self
    }

    pub fn with_vendor(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.vendors.push(CatalogOption::new(value, label));
        self
    }

    pub fn with_purchase_order(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.purchase_orders
            .push(CatalogOption::new(value.clone(), value));
        self
    }

    /// The reference data the purchase form shipped with.
    pub fn builtin() -> Self {
        StaticCatalog::new()
            .with_product("cerave", "Cerave", "355ml")
            .with_product("product2", "Product 2", "250mg")
            .with_product("product3", "Product 3", "10mg/ml")
            .with_brand("test1", "Test 1")
            .with_brand("test2", "Test 2")
            .with_brand("cerave", "Cerave")
            .with_vendor("test11", "Test 11")
            .with_vendor("test12", "Test 12")
            .with_vendor("vendor1", "Vendor 1")
            .with_purchase_order("PO001")
            .with_purchase_order("PO002")
            .with_purchase_order("PO003")
    }
}

impl ProductCatalog for StaticCatalog {
    fn strength_of(&self, product_name: &str) -> Option<String> {
        self.strengths
            .get(&product_name.trim().to_lowercase())
            .cloned()
    }

    fn products(&self) -> Vec<CatalogOption> {
        self.products.clone()
    }

    fn brands(&self) -> Vec<CatalogOption> {
        self.brands.clone()
    }

    fn vendors(&self) -> Vec<CatalogOption> {
        self.vendors.clone()
    }

    fn purchase_orders(&self) -> Vec<CatalogOption> {
        self.purchase_orders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_strengths() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(catalog.strength_of("cerave").as_deref(), Some("355ml"));
        assert_eq!(catalog.strength_of("Product2").as_deref(), Some("250mg"));
        assert_eq!(catalog.strength_of("PRODUCT3").as_deref(), Some("10mg/ml"));
        assert_eq!(catalog.strength_of("product4"), None);
    }

    #[test]
    fn test_builtin_option_lists() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(catalog.products().len(), 3);
        assert_eq!(catalog.brands()[2], CatalogOption::new("cerave", "Cerave"));
        assert_eq!(catalog.vendors()[2].label, "Vendor 1");
        assert_eq!(catalog.purchase_orders()[0].value, "PO001");
    }

    #[test]
    fn test_catalog_as_trait_object() {
        let catalog: Box<dyn ProductCatalog> = Box::new(StaticCatalog::new());
        assert!(catalog.products().is_empty());
        assert_eq!(catalog.strength_of("cerave"), None);
    }
}
