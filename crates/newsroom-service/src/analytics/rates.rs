//! Rate and rounding helpers shared by every report.
//!
//! A zero denominator always yields `0.0`, never NaN or an error.

/// `numerator / denominator * 100`, or `0.0` when the denominator is zero.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a composite to an integer score in `0..=100`.
pub fn clamp_score(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// Unweighted mean, or `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
