//! Arbitrary-range decimal numbers.
//!
//! A [`Decimal`] stores a normalized `f64` mantissa (`1 <= |m| < 10`, or exactly
//! zero) and an `i64` base-10 exponent, which lets values grow far past
//! `f64::MAX` while keeping roughly seventeen significant digits. The type
//! carries exactly the operation set the currency layer needs; it is not a
//! general-purpose big-number library.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

use crate::numbers::{self, floor_f64_to_i64, i64_to_f64};

/// Beyond this exponent gap the smaller addend cannot move the larger mantissa.
const MAX_SIGNIFICANT_DIGITS: i64 = 17;
/// Values whose exponent falls in this range display as plain numbers.
const PLAIN_DISPLAY_EXPONENTS: std::ops::Range<i64> = -5..21;
/// Mantissas below this are subnormal floats and get pre-scaled before `log10`.
const SUBNORMAL_GUARD: f64 = 1e-300;

/// Error returned when a string is not a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal `{input}`")]
pub struct ParseDecimalError {
    input: String,
}

#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: f64,
    exponent: i64,
}

impl Decimal {
    pub const ZERO: Self = Self {
        mantissa: 0.0,
        exponent: 0,
    };

    pub const ONE: Self = Self {
        mantissa: 1.0,
        exponent: 0,
    };

    pub const TEN: Self = Self {
        mantissa: 1.0,
        exponent: 1,
    };

    /// Build `mantissa * 10^exponent`, normalizing the parts.
    #[must_use]
    pub fn new(mantissa: f64, exponent: i64) -> Self {
        Self::normalized(mantissa, exponent)
    }

    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self::normalized(value, 0)
    }

    /// Exactly `10^exponent`.
    #[must_use]
    pub const fn pow10(exponent: i64) -> Self {
        Self {
            mantissa: 1.0,
            exponent,
        }
    }

    #[must_use]
    pub const fn mantissa(self) -> f64 {
        self.mantissa
    }

    #[must_use]
    pub const fn exponent(self) -> i64 {
        self.exponent
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.mantissa == 0.0
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.mantissa.is_finite()
    }

    /// Nearest `f64`; saturates to infinity or zero outside the float range.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        if !self.is_finite() || self.is_zero() {
            return self.mantissa;
        }
        if self.exponent > i64::from(f64::MAX_10_EXP) {
            return self.mantissa.signum() * f64::INFINITY;
        }
        if self.exponent < i64::from(f64::MIN_10_EXP) - MAX_SIGNIFICANT_DIGITS {
            return 0.0;
        }
        self.mantissa * numbers::pow10(self.exponent)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    /// Base-10 logarithm; NaN for negative values, negative infinity for zero.
    #[must_use]
    pub fn log10(self) -> f64 {
        if self.is_zero() || !self.is_finite() {
            return self.mantissa.log10();
        }
        i64_to_f64(self.exponent) + self.mantissa.log10()
    }

    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        if !self.is_finite() || !other.is_finite() {
            return Self::from_f64(self.mantissa + other.mantissa);
        }
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        let (larger, smaller) = if self.exponent >= other.exponent {
            (self, other)
        } else {
            (other, self)
        };
        let gap = larger.exponent.saturating_sub(smaller.exponent);
        if gap > MAX_SIGNIFICANT_DIGITS {
            return larger;
        }
        Self::normalized(
            larger.mantissa + smaller.mantissa / numbers::pow10(gap),
            larger.exponent,
        )
    }

    #[must_use]
    pub fn minus(self, other: Self) -> Self {
        self.plus(-other)
    }

    #[must_use]
    pub fn times(self, other: Self) -> Self {
        if !self.is_finite() || !other.is_finite() {
            return Self::from_f64(self.mantissa * other.mantissa);
        }
        Self::normalized(
            self.mantissa * other.mantissa,
            self.exponent.saturating_add(other.exponent),
        )
    }

    /// Division; a zero divisor yields an infinite or NaN value like native floats.
    #[must_use]
    pub fn divided_by(self, other: Self) -> Self {
        if !self.is_finite() || !other.is_finite() || other.is_zero() {
            return Self::from_f64(self.mantissa / other.mantissa);
        }
        Self::normalized(
            self.mantissa / other.mantissa,
            self.exponent.saturating_sub(other.exponent),
        )
    }

    #[must_use]
    pub fn is_nan(self) -> bool {
        self.mantissa.is_nan()
    }

    /// Larger of the two; a NaN operand yields the other one, like `f64::max`.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.is_nan() || self < other {
            other
        } else {
            self
        }
    }

    /// Smaller of the two; a NaN operand yields the other one, like `f64::min`.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.is_nan() || self > other {
            other
        } else {
            self
        }
    }

    #[must_use]
    pub fn clamp_max(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }

    #[must_use]
    pub fn clamp_min(self, floor: Self) -> Self {
        self.max(floor)
    }

    /// Lossless text form used for persistence (`"<mantissa>e<exponent>"`).
    #[must_use]
    pub fn to_exact_string(self) -> String {
        format!("{}e{}", self.mantissa, self.exponent)
    }

    fn normalized(mantissa: f64, exponent: i64) -> Self {
        if mantissa == 0.0 {
            return Self::ZERO;
        }
        if !mantissa.is_finite() {
            return Self {
                mantissa,
                exponent: 0,
            };
        }
        if mantissa.abs() < SUBNORMAL_GUARD {
            return Self::normalized(mantissa / SUBNORMAL_GUARD, exponent.saturating_sub(300));
        }
        let shift = floor_f64_to_i64(mantissa.abs().log10());
        let mut scaled = if shift >= 0 {
            mantissa / numbers::pow10(shift)
        } else {
            mantissa * numbers::pow10(-shift)
        };
        let mut exponent = exponent.saturating_add(shift);
        // log10 can land one step off near exact powers of ten
        if scaled.abs() >= 10.0 {
            scaled /= 10.0;
            exponent = exponent.saturating_add(1);
        } else if scaled.abs() < 1.0 {
            scaled *= 10.0;
            exponent = exponent.saturating_sub(1);
        }
        Self {
            mantissa: scaled,
            exponent,
        }
    }

    fn sign(self) -> i8 {
        if self.is_zero() {
            0
        } else if self.mantissa > 0.0 {
            1
        } else {
            -1
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.mantissa.is_nan() || other.mantissa.is_nan() {
            return None;
        }
        if !self.is_finite() || !other.is_finite() {
            if self.is_finite() {
                return 0.0_f64.partial_cmp(&other.mantissa);
            }
            if other.is_finite() {
                return self.mantissa.partial_cmp(&0.0_f64);
            }
            return self.mantissa.partial_cmp(&other.mantissa);
        }
        let (left_sign, right_sign) = (self.sign(), other.sign());
        if left_sign != right_sign || left_sign == 0 {
            return Some(left_sign.cmp(&right_sign));
        }
        let by_magnitude = self
            .exponent
            .cmp(&other.exponent)
            .then(self.mantissa.abs().partial_cmp(&other.mantissa.abs())?);
        Some(if left_sign > 0 {
            by_magnitude
        } else {
            by_magnitude.reverse()
        })
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self.to_exact_string())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_finite() {
            return fmt::Display::fmt(&self.mantissa, f);
        }
        if PLAIN_DISPLAY_EXPONENTS.contains(&self.exponent) {
            return fmt::Display::fmt(&self.to_f64(), f);
        }
        match f.precision() {
            Some(places) => write!(f, "{:.*}e{}", places, self.mantissa, self.exponent),
            None => write!(f, "{}e{}", self.mantissa, self.exponent),
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        match trimmed.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                let mantissa: f64 = mantissa.parse().map_err(|_| invalid())?;
                let exponent: i64 = exponent
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| invalid())?;
                Ok(Self::normalized(mantissa, exponent))
            }
            None => trimmed
                .parse::<f64>()
                .map(Self::from_f64)
                .map_err(|_| invalid()),
        }
    }
}

impl TryFrom<String> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_exact_string()
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Add for Decimal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(rhs)
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.minus(rhs)
    }
}

impl Mul for Decimal {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.times(rhs)
    }
}

impl Div for Decimal {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.divided_by(rhs)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::plus)
    }
}

impl Zero for Decimal {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }
}

impl One for Decimal {
    fn one() -> Self {
        Self::ONE
    }
}
