//! Relative Strength Index (RSI).
//!
//! Simple averages of gains and losses over the trailing `period` deltas.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0;
//! no movement or fewer than two closes → 50.

/// RSI of the trailing `period` deltas of `closes`.
///
/// Uses whatever history exists when shorter than `period + 1` closes.
/// Always returns a value in [0, 100].
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    let n = closes.len();
    if n < 2 || period == 0 {
        return 50.0;
    }

    let start = n.saturating_sub(period + 1);
    let window = &closes[start..];
    let count = (window.len() - 1) as f64;

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if !change.is_finite() {
            continue;
        }
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    compute_rsi(gains / count, losses / count)
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 && avg_gain <= 0.0 {
        50.0 // no movement
    } else if avg_loss <= 0.0 {
        100.0
    } else if avg_gain <= 0.0 {
        0.0
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}
