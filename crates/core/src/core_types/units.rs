//! Semantic unit types for type-safe physical quantity handling
//!
//! This module provides newtype wrappers for the quantities a surface-supplied
//! dive works with, so a depth in metres cannot be passed where a cylinder
//! pressure in bar is expected.
//!
//! # Design Philosophy
//! - All quantities are f64; gauge values are rounded to two decimals on storage
//!   and f64 keeps repeated per-tick subtraction free of visible drift
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Serde support so snapshots can be handed to rendering consumers
//!
//! # Usage
//! ```
//! use dive_sim_core::core_types::units::{Bar, Meters};
//!
//! let depth = Meters::new(20.0);
//! let ambient = Bar::new(1.0 + *depth / 10.0);
//! assert_eq!(ambient, Bar::new(3.0));
//!
//! // Use standard min/max from Ord trait
//! assert_eq!(Bar::new(5.0).max(Bar::ZERO), Bar::new(5.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul, Sub, SubAssign};

/// Implements the trait set shared by every quantity newtype.
///
/// Each quantity wraps a single f64, orders totally, dereferences to its raw
/// value and prints with its unit suffix.
macro_rules! quantity {
    ($name:ident, $unit:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl $name {
            /// Zero of this quantity
            pub const ZERO: $name = $name(0.0);

            /// Wrap a raw value
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name(value)
            }

            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }

            /// Clamp negative (and NaN) values to zero
            #[inline]
            #[must_use]
            pub fn non_negative(self) -> Self {
                if self.0 > 0.0 {
                    self
                } else {
                    Self::ZERO
                }
            }

            /// Round to a fixed number of decimals
            #[inline]
            #[must_use]
            pub fn rounded(self, decimals: u32) -> Self {
                $name(round_to(self.0, decimals))
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!("{:.2} ", $unit), self.0)
            }
        }
    };
}

/// Round `value` to `decimals` places (half away from zero).
#[inline]
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// DEPTH
// ============================================================================

/// Depth below the surface in metres of sea water
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

quantity!(Meters, "m");

// ============================================================================
// PRESSURE
// ============================================================================

/// Pressure in bar (gauge or absolute depending on the field)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Bar(f64);

quantity!(Bar, "bar");

// ============================================================================
// GAS VOLUME AND FLOW
// ============================================================================

/// Gas volume or cylinder water capacity in litres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Liters(f64);

quantity!(Liters, "L");

/// Breathing gas flow in litres per minute (surface-equivalent unless noted)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct LitersPerMinute(f64);

quantity!(LitersPerMinute, "L/min");

// ============================================================================
// DIMENSIONLESS / TIME
// ============================================================================

/// Percentage (0-100 for cylinder fill)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

quantity!(Percent, "%");

/// Dive time in minutes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Minutes(f64);

quantity!(Minutes, "min");
