//! Exponential moving average.
//!
//! Smoothing factor `2 / (period + 1)`, seeded with the simple mean of the
//! first `period` values.

/// EMA series aligned with `values`; NaN until the seed index `period - 1`.
///
/// A NaN input after the seed poisons the rest of the series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let seed_window = &values[..period];
    if seed_window.iter().any(|v| v.is_nan()) {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut current = seed_window.iter().sum::<f64>() / period as f64;
    out[period - 1] = current;

    for (slot, &v) in out[period..].iter_mut().zip(&values[period..]) {
        if v.is_nan() {
            break;
        }
        current += (v - current) * k;
        *slot = current;
    }
    out
}

/// Latest EMA value.
///
/// Falls back to the last input value when the series is shorter than
/// `period`, and to 0.0 for an empty series.
pub fn ema_last(values: &[f64], period: usize) -> f64 {
    let fallback = values.last().copied().unwrap_or(0.0);
    match ema_of_series(values, period).last() {
        Some(v) if v.is_finite() => *v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn period_one_tracks_input() {
        let out = ema_of_series(&[100.0, 200.0, 300.0], 1);
        assert_eq!(out, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn seeded_with_simple_mean() {
        // k = 0.5; seed = mean(10, 11, 12) = 11; then 12, 13
        let out = ema_of_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_approx(out[2], 11.0, DEFAULT_EPSILON);
        assert_approx(out[3], 12.0, DEFAULT_EPSILON);
        assert_approx(out[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_after_seed_stops_the_series() {
        let out = ema_of_series(&[10.0, 11.0, 12.0, f64::NAN, 14.0], 3);
        assert_approx(out[2], 11.0, DEFAULT_EPSILON);
        assert!(out[3].is_nan() && out[4].is_nan());
    }

    #[test]
    fn last_value_fallbacks() {
        assert_eq!(ema_last(&[5.0, 6.0], 10), 6.0);
        assert_eq!(ema_last(&[], 10), 0.0);
        assert_approx(ema_last(&[10.0, 11.0, 12.0, 13.0, 14.0], 3), 13.0, DEFAULT_EPSILON);
    }
}
