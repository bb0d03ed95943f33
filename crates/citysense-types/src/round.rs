//! The rounding law shared by every aggregation.

/// Number of decimal places every reported metric is rounded to.
pub const METRIC_DECIMALS: i32 = 2;

/// Round a metric to 2 decimal places, ties to even.
///
/// The tie rule is applied to the binary value of `value * 100`, so a mean
/// like `2.005` (stored as `2.00499...`) rounds down to `2.0` while an exact
/// binary tie like `2.125` rounds to the even neighbour `2.12`.
///
/// ```
/// use citysense_types::round2;
///
/// assert_eq!(round2(2.125), 2.12);
/// assert_eq!(round2(2.375), 2.38);
/// assert_eq!(round2(10.0 / 3.0), 3.33);
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scale = 10f64.powi(METRIC_DECIMALS);
    (value * scale).round_ties_even() / scale
}
