//! Numeric conversion helpers centralizing lossy casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Clamp an i64 into the i32 range, for use as a `powi` exponent.
#[must_use]
pub fn clamp_i64_to_i32(value: i64) -> i32 {
    let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    i32::try_from(clamped).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Power of ten as a float; saturates to infinity or zero outside the f64 range.
#[must_use]
pub fn pow10(exponent: i64) -> f64 {
    10f64.powi(clamp_i64_to_i32(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite() {
        assert_eq!(floor_f64_to_i64(f64::NAN), 0);
        assert_eq!(floor_f64_to_i64(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_i64(-0.5), -1);
        assert_eq!(floor_f64_to_i64(2.9), 2);
    }

    #[test]
    fn clamp_covers_ranges() {
        assert_eq!(clamp_i64_to_i32(i64::MAX), i32::MAX);
        assert_eq!(clamp_i64_to_i32(i64::MIN), i32::MIN);
        assert_eq!(clamp_i64_to_i32(17), 17);
    }

    #[test]
    fn pow10_saturates() {
        assert!((pow10(3) - 1000.0).abs() < f64::EPSILON);
        assert!(pow10(400).is_infinite());
        assert!(pow10(-400).abs() < f64::MIN_POSITIVE);
        assert!((i64_to_f64(-12) + 12.0).abs() < f64::EPSILON);
    }
}
