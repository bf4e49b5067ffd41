//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Fixed-Point Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER CENTS PROBLEM                                              │
//! │    A 20.00 discount over 3 items = 666 cents each (×3 = 19.98)          │
//! │    Every redistribution drops the remainder again                       │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    20 / 3 = 6.6666666666666666666666666667 (28 significant digits)      │
//! │    ×3 = 20.0000000000000000000000000001  → within the 0.01 tolerance    │
//! │    Rounding happens ONLY for display (2 decimal places)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use procura_core::money::Money;
//!
//! let unit_price = Money::from_cents(10_000); // 100.00
//! let trade_price = unit_price.multiply_quantity(2);
//! assert_eq!(trade_price, Money::from_cents(20_000));
//!
//! // Display always shows two decimal places
//! assert_eq!(trade_price.to_string(), "200.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Number of decimal places used when presenting money.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount held at full decimal precision.
///
/// ## Design Decisions
/// - **Decimal (signed)**: payable amounts go negative when the discount
///   exceeds the net trade price, and that must be representable
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a string**: `"882.5"` survives the JSON boundary
///   without passing through a float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItemDraft.unit_price ──► LineItem.trade_price ──► LineItem.tax     │
/// │                                         │                               │
/// │  InvoiceHeader.total_discount ──────────┴──► discount_share             │
/// │                                               payable_to_vendor         │
/// │                                                                         │
/// │  InvoiceHeader.bill_amount ──► HeaderTotals ──► ValidationReport        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (two implied decimal places).
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let vat = Money::from_cents(1050);
    /// assert_eq!(vat.to_string(), "10.50");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at the given rate WITHOUT rounding.
    ///
    /// The engine keeps every intermediate value exact. Rounding to cents is
    /// a presentation concern (see [`Money::rounded`]).
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    /// use procura_core::TAX_RATE;
    ///
    /// let trade_price = Money::from_cents(95_000); // 950.00
    /// let tax = trade_price.calculate_tax(TAX_RATE);
    /// assert_eq!(tax, Money::from_cents(4_750)); // 47.50
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.as_fraction())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Splits the amount into `parts` equal shares, returning one share.
    ///
    /// `parts == 0` is the single-item case and returns the full amount,
    /// so the result is always finite.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let discount = Money::from_cents(2_000);
    /// assert_eq!(discount.split_evenly(2), Money::from_cents(1_000));
    /// assert_eq!(discount.split_evenly(0), discount);
    /// ```
    pub fn split_evenly(&self, parts: usize) -> Money {
        if parts <= 1 {
            return *self;
        }
        Money(self.0 / Decimal::from(parts as u64))
    }

    /// Rounds to two decimal places (half away from zero) for display.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns true when the two amounts differ by strictly less than
    /// `tolerance`.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let tolerance = Money::from_cents(1);
    /// let a = Money::from_cents(2_000);
    /// assert!(a.approx_eq(Money::from_cents(2_000), tolerance));
    /// assert!(!a.approx_eq(Money::from_cents(2_001), tolerance));
    /// ```
    pub fn approx_eq(&self, other: Money, tolerance: Money) -> bool {
        (self.0 - other.0).abs() < tolerance.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to two decimals, without currency symbol.
///
/// ## Note
/// Localized currency formatting belongs to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Money::zero());
        }
        Decimal::from_str(trimmed)
            .map(Money)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (the purchase TAX levy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (500 bps → 0.05).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
