//! # Money Helpers
//!
//! Amounts are `f64` in major currency units (e.g. AED, not fils), as the
//! storefront and admin UIs send them. Every intermediate amount in the
//! pricing engine goes through [`round2`].

/// Round to 2 decimal places, half away from zero.
///
/// Binary floats store values such as `1.005` slightly below their decimal
/// reading, so the scaled value is nudged by a few ULPs before rounding.
/// The nudge is capped at `1e-6` so it never moves a large amount by
/// a whole cent, and skipped once the scaled value has no fractional part.
/// Non-finite input rounds to `0.0`, and `-0.0` is normalised to `0.0`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = value * 100.0;
    if scaled.abs() >= INTEGRAL_SCALED {
        return value + 0.0;
    }
    let nudge = (scaled.abs().max(1.0) * f64::EPSILON * 8.0).min(MAX_NUDGE);
    let rounded = (scaled + nudge.copysign(scaled)).round() / 100.0;
    rounded + 0.0
}

/// Largest nudge applied to a scaled amount, in hundredths
const MAX_NUDGE: f64 = 1e-6;

/// 2^52: from here on every `f64` is an integer
const INTEGRAL_SCALED: f64 = 4_503_599_627_370_496.0;

/// Clamp to a finite, non-negative amount.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format an amount for display, e.g. `"AED 1,250.50"`.
///
/// The currency code is upper-cased; an empty code yields just the number.
pub fn format_money(amount: f64, currency: &str) -> String {
    let amount = round2(amount);
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    let code = currency.trim().to_uppercase();
    if code.is_empty() {
        format!("{}{}.{}", sign, grouped, fraction)
    } else {
        format!("{} {}{}.{}", code, sign, grouped, fraction)
    }
}

/// Human ETA label for a shipping method, e.g. `"2-4 business days"`.
///
/// Missing bounds collapse to whichever bound is present; no bounds yields
/// an empty label.
pub fn delivery_label(min_days: Option<i64>, max_days: Option<i64>) -> String {
    let min = min_days.filter(|d| *d >= 0);
    let max = max_days.filter(|d| *d >= 0);
    match (min, max) {
        (Some(lo), Some(hi)) if lo < hi => format!("{}-{} business days", lo, hi),
        (Some(lo), Some(hi)) if lo > hi => format!("{}-{} business days", hi, lo),
        (Some(d), _) | (None, Some(d)) => {
            if d == 1 {
                "1 business day".to_string()
            } else {
                format!("{} business days", d)
            }
        }
        (None, None) => String::new(),
    }
}
