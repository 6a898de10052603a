//! # Unit Types
//!
//! Lightweight newtype wrappers for the two quantities the calculator deals
//! in: money and percentages. They serialize as plain numbers.
//!
//! Percentages are stored in "percent points" (5.4 means 5.4%), matching how
//! rates are entered on the form.
//!
//! ## Example
//!
//! ```rust
//! use tuition_core::units::{Dollars, Percent};
//!
//! let tuition = Dollars(10_000.0);
//! let increase = Percent(5.0);
//! let new_tuition = tuition * increase.growth_factor();
//! assert!((new_tuition.0 - 10_500.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Money
// ============================================================================

/// Currency amount in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dollars(pub f64);

impl Dollars {
    /// Zero dollars
    pub const ZERO: Dollars = Dollars(0.0);

    /// Express `self` as a percentage of `denominator`.
    ///
    /// Returns 0% when the denominator is zero (or not positive), never NaN.
    pub fn percent_of(self, denominator: Dollars) -> Percent {
        if denominator.0 > 0.0 {
            Percent(self.0 / denominator.0 * 100.0)
        } else {
            Percent::ZERO
        }
    }
}

// ============================================================================
// Percentages
// ============================================================================

/// Percentage in percent points (5.4 = 5.4%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// Zero percent
    pub const ZERO: Percent = Percent(0.0);

    /// Multiplier for applying this percentage as growth: `1 + p/100`
    pub fn growth_factor(self) -> f64 {
        1.0 + self.0 / 100.0
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Dollars);
impl_arithmetic!(Percent);
