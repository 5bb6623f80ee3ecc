//! Decimal rounding shared by the metrics engine and the formatters.

/// Round `value` to `digits` decimal places, ties away from zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// `Some(value)` when the value is a finite number.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
