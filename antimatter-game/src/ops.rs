//! Arithmetic strategies, one per numeric representation.
//!
//! Currencies are generic over an [`Operations`] strategy and never touch their
//! representation directly. The trait is sealed and has no default bodies, so
//! both strategies must spell out the full operation set.

use std::fmt::Debug;

use crate::decimal::Decimal;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::NumberOps {}
    impl Sealed for super::DecimalOps {}
}

pub trait Operations: sealed::Sealed + Copy + Debug + Send + Sync + 'static {
    type Value: Copy + Debug + PartialEq + PartialOrd + Send + Sync + 'static;

    /// The representation's zero element, used as the subtraction floor.
    fn zero() -> Self::Value;
    fn from_f64(value: f64) -> Self::Value;
    /// Lift a value into the wide representation for reporting.
    fn to_decimal(value: Self::Value) -> Decimal;

    fn add(left: Self::Value, right: Self::Value) -> Self::Value;
    fn subtract(left: Self::Value, right: Self::Value) -> Self::Value;
    fn multiply(left: Self::Value, right: Self::Value) -> Self::Value;
    fn divide(left: Self::Value, right: Self::Value) -> Self::Value;
    fn max(left: Self::Value, right: Self::Value) -> Self::Value;
    fn min(left: Self::Value, right: Self::Value) -> Self::Value;
    fn eq(left: Self::Value, right: Self::Value) -> bool;
    fn gt(left: Self::Value, right: Self::Value) -> bool;
    fn gte(left: Self::Value, right: Self::Value) -> bool;
    fn lt(left: Self::Value, right: Self::Value) -> bool;
    fn lte(left: Self::Value, right: Self::Value) -> bool;
}

/// Native `f64` arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberOps;

/// Mantissa/exponent arithmetic backed by [`Decimal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalOps;

impl Operations for NumberOps {
    type Value = f64;

    fn zero() -> f64 {
        0.0
    }

    fn from_f64(value: f64) -> f64 {
        value
    }

    fn to_decimal(value: f64) -> Decimal {
        Decimal::from_f64(value)
    }

    fn add(left: f64, right: f64) -> f64 {
        left + right
    }

    fn subtract(left: f64, right: f64) -> f64 {
        left - right
    }

    fn multiply(left: f64, right: f64) -> f64 {
        left * right
    }

    fn divide(left: f64, right: f64) -> f64 {
        left / right
    }

    fn max(left: f64, right: f64) -> f64 {
        left.max(right)
    }

    fn min(left: f64, right: f64) -> f64 {
        left.min(right)
    }

    #[allow(clippy::float_cmp)]
    fn eq(left: f64, right: f64) -> bool {
        left == right
    }

    fn gt(left: f64, right: f64) -> bool {
        left > right
    }

    fn gte(left: f64, right: f64) -> bool {
        left >= right
    }

    fn lt(left: f64, right: f64) -> bool {
        left < right
    }

    fn lte(left: f64, right: f64) -> bool {
        left <= right
    }
}

impl Operations for DecimalOps {
    type Value = Decimal;

    fn zero() -> Decimal {
        Decimal::ZERO
    }

    fn from_f64(value: f64) -> Decimal {
        Decimal::from_f64(value)
    }

    fn to_decimal(value: Decimal) -> Decimal {
        value
    }

    fn add(left: Decimal, right: Decimal) -> Decimal {
        left.plus(right)
    }

    fn subtract(left: Decimal, right: Decimal) -> Decimal {
        left.minus(right)
    }

    fn multiply(left: Decimal, right: Decimal) -> Decimal {
        left.times(right)
    }

    fn divide(left: Decimal, right: Decimal) -> Decimal {
        left.divided_by(right)
    }

    fn max(left: Decimal, right: Decimal) -> Decimal {
        left.max(right)
    }

    fn min(left: Decimal, right: Decimal) -> Decimal {
        left.min(right)
    }

    fn eq(left: Decimal, right: Decimal) -> bool {
        left == right
    }

    fn gt(left: Decimal, right: Decimal) -> bool {
        left > right
    }

    fn gte(left: Decimal, right: Decimal) -> bool {
        left >= right
    }

    fn lt(left: Decimal, right: Decimal) -> bool {
        left < right
    }

    fn lte(left: Decimal, right: Decimal) -> bool {
        left <= right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamped_difference<O: Operations>(left: O::Value, right: O::Value) -> O::Value {
        O::max(O::subtract(left, right), O::zero())
    }

    #[test]
    fn strategies_agree_on_small_values() {
        let cases = [(5.0, 3.0), (3.0, 5.0), (0.0, 0.0), (1e10, 1e9)];
        for (left, right) in cases {
            let native = clamped_difference::<NumberOps>(left, right);
            let wide = clamped_difference::<DecimalOps>(
                DecimalOps::from_f64(left),
                DecimalOps::from_f64(right),
            );
            assert_eq!(DecimalOps::from_f64(native), wide, "{left} - {right}");
            assert_eq!(
                NumberOps::gte(left, right),
                DecimalOps::gte(DecimalOps::from_f64(left), DecimalOps::from_f64(right))
            );
        }
    }

    #[test]
    fn comparisons_cover_equality_edges() {
        assert!(NumberOps::eq(2.0, 2.0));
        assert!(NumberOps::lte(2.0, 2.0) && !NumberOps::lt(2.0, 2.0));
        let ten = Decimal::TEN;
        assert!(DecimalOps::eq(ten, Decimal::from_f64(10.0)));
        assert!(DecimalOps::gt(Decimal::pow10(400), ten));
        assert!(DecimalOps::lte(ten, ten) && !DecimalOps::gt(ten, ten));
    }

    #[test]
    fn arithmetic_delegates_per_representation() {
        assert!((NumberOps::divide(NumberOps::multiply(6.0, 7.0), 2.0) - 21.0).abs() < 1e-12);
        let product = DecimalOps::multiply(Decimal::pow10(300), Decimal::pow10(300));
        assert_eq!(product, Decimal::pow10(600));
        assert_eq!(DecimalOps::min(product, Decimal::ONE), Decimal::ONE);
        assert_eq!(NumberOps::to_decimal(1500.0), Decimal::from_f64(1500.0));
    }
}
