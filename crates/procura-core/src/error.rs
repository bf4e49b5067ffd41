//! # Error Types
//!
//! Domain-specific error types for procura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  procura-core errors (this file)                                       │
//! │  ├── CoreError        - Rejected invoice mutations                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  procura-session errors (separate crate)                               │
//! │  ├── ConfigError      - Config file / environment problems             │
//! │  └── ApiError         - What the purchase form sees (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Purchase form          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reconciliation mismatch is NOT an error. It is a normal outcome carried
//! by [`crate::reconcile::ValidationReport`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the invoice reducers.
///
/// Every variant means the requested mutation was rejected and the line item
/// collection is unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item id did not match any row in the collection.
    ///
    /// ## When This Occurs
    /// - Removing a row that was already removed
    /// - Removing after the invoice was cleared
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// The invoice already holds the maximum number of rows.
    #[error("Invoice cannot have more than {max} line items")]
    TooManyLineItems { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised at the door, before any calculation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount exceeds the accepted ceiling.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
