//! Pure numeric helpers shared by reconciliation and evaluation.

/// Signed percentage delta between two readings.
///
/// Returns `(latest - previous) / previous * 100`. A zero `previous` yields
/// `0.0`: with no meaningful baseline the movement is treated as "no change"
/// rather than an error, so freshly inserted indicators (where both values
/// are equal) and zero-valued baselines never trip a threshold.
///
/// # Examples
/// ```
/// use backend::domain::percent_change;
///
/// assert_eq!(percent_change(100.0, 111.0), 11.0);
/// assert_eq!(percent_change(0.0, 42.0), 0.0);
/// ```
pub fn percent_change(previous: f64, latest: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (latest - previous) / previous * 100.0
}

/// Round a value to two decimal places, half away from zero.
///
/// Stored indicator values are prices and are persisted at cent precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
