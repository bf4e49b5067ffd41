//! # procura-session
//!
//! Session layer of the purchase form: one invoice per session, the
//! commands the form calls, and startup configuration.
//!
//! ## Module Organization
//! ```text
//! procura_session/
//! ├── lib.rs          ◄─── You are here (bootstrap & tracing)
//! ├── config.rs       ◄─── Catalog data and log filter (TOML + env)
//! ├── state.rs        ◄─── Invoice and its Mutex-guarded session state
//! ├── commands.rs     ◄─── Form commands and JSON dispatch
//! └── error.rs        ◄─── ConfigError and the ApiError returned by commands
//! ```
//!
//! ## Example
//! ```rust
//! use procura_session::commands::{add_product, edit_header};
//! use procura_session::InvoiceState;
//! use procura_core::{HeaderEdit, LineItemDraft, Money, InvoiceStatus};
//!
//! let state = InvoiceState::default();
//! edit_header(&state, HeaderEdit::TotalDiscount(Money::from_cents(2_000))).unwrap();
//!
//! let draft = LineItemDraft::new("cerave", 2, Money::from_cents(10_000), Money::from_cents(1_000));
//! let response = add_product(&state, draft).unwrap();
//!
//! assert_eq!(response.items[0].payable_to_vendor, Money::from_cents(17_000));
//! assert_eq!(response.status, InvoiceStatus::Unbalanced);
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::SessionConfig;
pub use error::{ApiError, ConfigError, ErrorCode};
pub use state::{Invoice, InvoiceState};

/// Loads configuration, installs logging and creates the session state.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Session Startup                                   │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • explicit path, $PROCURA_CONFIG, or the platform config dir        │
/// │     • invalid or unreadable file → defaults (logged as a warning)       │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • RUST_LOG wins over the configured filter                          │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • catalog built from config                                         │
/// │     • empty invoice with a fresh session id                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn bootstrap(config_path: Option<PathBuf>) -> InvoiceState {
    let config = SessionConfig::load_or_default(config_path);
    init_tracing(&config.logging.filter);

    info!("Starting Procura invoice session");

    InvoiceState::from_config(&config)
}

/// Initializes the tracing subscriber.
///
/// A subscriber that is already installed is left in place, so embedding
/// hosts and tests may call this more than once.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("not a filter ===");
    }

    #[test]
    fn test_bootstrap_with_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = bootstrap(Some(dir.path().join("procura.toml")));

        assert_eq!(state.catalog().products().len(), 3);
        state.with_invoice(|invoice| assert!(invoice.is_empty()));
    }
}
