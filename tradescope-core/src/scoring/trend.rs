//! Price position against the moving-average stack.

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;

/// EMA separation (percent of price) below which the EMAs count as crossed.
pub const EMA_SEPARATION_PERCENT: f64 = 0.1;
/// Narrowest gap between adjacent SMAs (percent of price) that counts as a stack.
pub const SMA_STACK_SEPARATION_PERCENT: f64 = 0.25;
/// Price must clear the nearest SMA by this much (percent of price).
pub const SMA_DISTANCE_PERCENT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAlignment {
    pub price: f64,
    pub sma_short: Option<f64>,
    pub sma_medium: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
}

impl TrendAlignment {
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        Self {
            price: snapshot.price,
            sma_short: snapshot.sma_short,
            sma_medium: snapshot.sma_medium,
            sma_long: snapshot.sma_long,
            ema_fast: snapshot.ema_fast,
            ema_slow: snapshot.ema_slow,
        }
    }

    /// Available SMAs, shortest period first.
    pub fn smas(&self) -> Vec<f64> {
        [self.sma_short, self.sma_medium, self.sma_long]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn above_all(&self) -> bool {
        let smas = self.smas();
        !smas.is_empty() && smas.iter().all(|&s| self.price > s)
    }

    pub fn below_all(&self) -> bool {
        let smas = self.smas();
        !smas.is_empty() && smas.iter().all(|&s| self.price < s)
    }

    /// Shorter averages above longer ones (needs at least two).
    pub fn bullish_stack(&self) -> bool {
        let smas = self.smas();
        smas.len() >= 2 && smas.windows(2).all(|w| w[0] > w[1])
    }

    pub fn bearish_stack(&self) -> bool {
        let smas = self.smas();
        smas.len() >= 2 && smas.windows(2).all(|w| w[0] < w[1])
    }

    /// Bullish stack with price under the short SMA but above the rest.
    pub fn bullish_pullback(&self) -> bool {
        let smas = self.smas();
        self.bullish_stack() && smas[1..].iter().all(|&s| self.price > s)
    }

    pub fn bearish_pullback(&self) -> bool {
        let smas = self.smas();
        self.bearish_stack() && smas[1..].iter().all(|&s| self.price < s)
    }

    /// Smallest gap between adjacent SMAs as a percent of price; 0 with fewer than two.
    pub fn stack_separation_percent(&self) -> f64 {
        let smas = self.smas();
        if self.price <= 0.0 || smas.len() < 2 {
            return 0.0;
        }
        smas.windows(2)
            .map(|w| (w[0] - w[1]).abs())
            .fold(f64::INFINITY, f64::min)
            / self.price
            * 100.0
    }

    /// Distance from price to the nearest SMA as a percent of price.
    pub fn distance_percent(&self) -> f64 {
        let smas = self.smas();
        if self.price <= 0.0 || smas.is_empty() {
            return 0.0;
        }
        smas.iter()
            .map(|s| (self.price - s).abs())
            .fold(f64::INFINITY, f64::min)
            / self.price
            * 100.0
    }

    /// (EMA fast − EMA slow) as a percent of price.
    pub fn ema_separation_percent(&self) -> f64 {
        if self.price > 0.0 {
            (self.ema_fast - self.ema_slow) / self.price * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(price: f64, smas: [Option<f64>; 3]) -> TrendAlignment {
        TrendAlignment {
            price,
            sma_short: smas[0],
            sma_medium: smas[1],
            sma_long: smas[2],
            ema_fast: price,
            ema_slow: price,
        }
    }

    #[test]
    fn above_stacked_averages() {
        let a = alignment(110.0, [Some(105.0), Some(100.0), Some(90.0)]);
        assert!(a.above_all());
        assert!(a.bullish_stack());
        assert!(!a.below_all());
        assert!(!a.bearish_stack());
        // 105 → 100 is the narrowest gap; 105 is nearest to price
        assert!((a.stack_separation_percent() - 5.0 / 110.0 * 100.0).abs() < 1e-12);
        assert!((a.distance_percent() - 5.0 / 110.0 * 100.0).abs() < 1e-12);
    }

    #[test]
    fn tightly_packed_averages_have_small_gaps() {
        let a = alignment(100.05, [Some(100.02), Some(100.01), Some(100.0)]);
        assert!(a.bullish_stack());
        assert!(a.stack_separation_percent() < SMA_STACK_SEPARATION_PERCENT);
        assert!(a.distance_percent() < SMA_DISTANCE_PERCENT);
        assert_eq!(alignment(100.0, [Some(99.0), None, None]).stack_separation_percent(), 0.0);
    }

    #[test]
    fn single_sma_is_never_stacked() {
        let a = alignment(110.0, [Some(105.0), None, None]);
        assert!(a.above_all());
        assert!(!a.bullish_stack());
        assert!(!a.bullish_pullback());
    }

    #[test]
    fn pullback_to_short_average() {
        let a = alignment(103.0, [Some(105.0), Some(100.0), None]);
        assert!(!a.above_all());
        assert!(a.bullish_pullback());

        let b = alignment(97.0, [Some(95.0), Some(100.0), Some(110.0)]);
        assert!(b.bearish_pullback());
    }

    #[test]
    fn no_averages_means_no_alignment() {
        let a = alignment(100.0, [None, None, None]);
        assert!(!a.above_all());
        assert!(!a.below_all());
        assert_eq!(a.ema_separation_percent(), 0.0);
        assert_eq!(a.distance_percent(), 0.0);
    }
}
