//! Simple moving average.

use super::{mean, tail};

/// Mean of the trailing `period` values; shorter series average what exists.
///
/// Callers that need a strict window (the 50/200 trend filters) check the
/// history length themselves.
pub fn sma_last(values: &[f64], period: usize) -> f64 {
    mean(tail(values, period))
}
