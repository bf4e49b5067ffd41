//! # Session Configuration
//!
//! Reference data and logging settings loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PROCURA_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $PROCURA_CONFIG, or                                                │
//! │     ~/.config/procura/procura.toml (Linux)                             │
//! │     ~/Library/Application Support/com.procura.procura/procura.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The built-in product catalog                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [logging]
//! filter = "info,procura=debug"
//!
//! [catalog]
//! purchase_orders = ["PO001", "PO002"]
//!
//! [[catalog.products]]
//! value = "cerave"
//! label = "Cerave"
//! strength = "355ml"
//!
//! [[catalog.vendors]]
//! value = "vendor1"
//! label = "Vendor 1"
//! ```
//!
//! The TAX rate and the reconciliation tolerance are domain constants and
//! deliberately absent here.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use procura_core::{CatalogOption, StaticCatalog};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PROCURA_CONFIG";

/// Environment variable overriding the log filter.
pub const LOG_FILTER_ENV: &str = "PROCURA_LOG";

// =============================================================================
// Catalog Configuration
// =============================================================================

/// A product with its strength label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub value: String,
    pub label: String,
    pub strength: String,
}

impl ProductEntry {
    fn new(value: &str, label: &str, strength: &str) -> Self {
        ProductEntry {
            value: value.to_string(),
            label: label.to_string(),
            strength: strength.to_string(),
        }
    }
}

/// Reference data for the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_products")]
    pub products: Vec<ProductEntry>,

    #[serde(default = "default_brands")]
    pub brands: Vec<CatalogOption>,

    #[serde(default = "default_vendors")]
    pub vendors: Vec<CatalogOption>,

    #[serde(default = "default_purchase_orders")]
    pub purchase_orders: Vec<String>,
}

fn default_products() -> Vec<ProductEntry> {
    vec![
        ProductEntry::new("cerave", "Cerave", "355ml"),
        ProductEntry::new("product2", "Product 2", "250mg"),
        ProductEntry::new("product3", "Product 3", "10mg/ml"),
    ]
}

fn default_brands() -> Vec<CatalogOption> {
    vec![
        CatalogOption::new("test1", "Test 1"),
        CatalogOption::new("test2", "Test 2"),
        CatalogOption::new("cerave", "Cerave"),
    ]
}

fn default_vendors() -> Vec<CatalogOption> {
    vec![
        CatalogOption::new("test11", "Test 11"),
        CatalogOption::new("test12", "Test 12"),
        CatalogOption::new("vendor1", "Vendor 1"),
    ]
}

fn default_purchase_orders() -> Vec<String> {
    vec!["PO001".to_string(), "PO002".to_string(), "PO003".to_string()]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            products: default_products(),
            brands: default_brands(),
            vendors: default_vendors(),
            purchase_orders: default_purchase_orders(),
        }
    }
}

impl CatalogConfig {
    /// Builds the in-memory catalog the calculator queries.
    pub fn build_catalog(&self) -> StaticCatalog {
        let catalog = self.products.iter().fold(StaticCatalog::new(), |c, p| {
            c.with_product(p.value.as_str(), p.label.as_str(), p.strength.as_str())
        });
        let catalog = self
            .brands
            .iter()
            .fold(catalog, |c, b| c.with_brand(b.value.as_str(), b.label.as_str()));
        let catalog = self
            .vendors
            .iter()
            .fold(catalog, |c, v| c.with_vendor(v.value.as_str(), v.label.as_str()));
        self.purchase_orders
            .iter()
            .fold(catalog, |c, po| c.with_purchase_order(po.as_str()))
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string. `RUST_LOG` still wins at runtime.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,procura=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Session Config
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$PROCURA_CONFIG`, or the platform
    ///    config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without env overrides or validation.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading session config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for product in &self.catalog.products {
            let key = product.value.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigError::Invalid(
                    "catalog product value must not be empty".into(),
                ));
            }
            if product.strength.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "catalog product '{}' has an empty strength",
                    product.value
                )));
            }
            if !seen.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "catalog product '{}' is listed twice",
                    product.value
                )));
            }
        }

        if self.catalog.purchase_orders.iter().any(|po| po.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "purchase order numbers must not be empty".into(),
            ));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConfigError::Invalid(format!("invalid log filter '{}': {}", self.logging.filter, e))
        })?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "procura", "procura")
            .map(|dirs| dirs.config_dir().join("procura.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::ProductCatalog;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_catalog_matches_builtin() {
        let catalog = SessionConfig::default().catalog.build_catalog();
        let builtin = StaticCatalog::builtin();

        assert_eq!(catalog.products(), builtin.products());
        assert_eq!(catalog.brands(), builtin.brands());
        assert_eq!(catalog.vendors(), builtin.vendors());
        assert_eq!(catalog.purchase_orders(), builtin.purchase_orders());
        assert_eq!(catalog.strength_of("CERAVE").as_deref(), Some("355ml"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [[catalog.products]]
            value = "serum"
            label = "Serum"
            strength = "30ml"
            "#,
        );

        let config = SessionConfig::load(Some(file.path().to_path_buf())).unwrap();
        let catalog = config.catalog.build_catalog();

        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.strength_of("Serum").as_deref(), Some("30ml"));
        assert_eq!(catalog.strength_of("cerave"), None);
        // Sections absent from the file keep their defaults
        assert_eq!(catalog.vendors().len(), 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = SessionConfig::load(Some(path)).unwrap();
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("[catalog\nproducts = 3");
        let result = SessionConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let mut config = SessionConfig::default();
        config
            .catalog
            .products
            .push(ProductEntry::new("CeraVe", "CeraVe again", "100ml"));

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_strength_rejected() {
        let mut config = SessionConfig::default();
        config.catalog.products[0].strength = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_on_invalid_file() {
        let file = write_config(
            r#"
            [catalog]
            purchase_orders = [""]
            "#,
        );

        let config = SessionConfig::load_or_default(Some(file.path().to_path_buf()));
        assert_eq!(config, SessionConfig::default());
    }
}
