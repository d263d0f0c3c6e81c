//! Crate-wide rounding rule.
//!
//! Every seat and applicant count is rounded half to even ("banker's
//! rounding"): 2.5 -> 2, 3.5 -> 4. Exact seat counts at tie points depend on
//! this rule, so nothing in the crate may call `f64::round` directly.

/// Rounds half to even and converts to a non-negative count.
///
/// Negative results clamp to zero; NaN maps to zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_count(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        // `as` saturates at u64::MAX for out-of-range values.
        rounded as u64
    }
}
