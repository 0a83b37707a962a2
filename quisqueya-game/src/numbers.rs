//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to one decimal place, returning 0.0 for non-finite values.
///
/// Exact halves go to the even tenth: 18.25 becomes 18.2, 18.75 becomes 18.8.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round_ties_even() / 10.0
}

/// Share of `part` in `whole` as a percentage rounded to one decimal.
///
/// A zero `whole` yields 0.0 instead of dividing by zero.
#[must_use]
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to_tenth(f64::from(part) / f64::from(whole) * 100.0)
}

/// Mean of a slice of values rounded to one decimal, 0.0 when empty.
#[must_use]
pub fn mean_to_tenth(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    round_to_tenth(sum / usize_to_f64(values.len()))
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Clamp a signed second count to a non-negative u64.
#[must_use]
pub fn clamp_seconds(value: i64) -> u64 {
    cast::<i64, u64>(value.max(0)).unwrap_or(0)
}

/// Convert a collection length to u32, saturating at `u32::MAX`.
#[must_use]
pub fn len_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
