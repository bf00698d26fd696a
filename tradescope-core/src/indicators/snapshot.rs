//! The full indicator snapshot consumed by the scorer.
//!
//! Built once per analysis from the bar history and the current price.
//! Every field degrades to its indicator's documented fallback, so
//! construction never fails.

use serde::{Deserialize, Serialize};

use super::{
    adx, atr, bollinger, closes, ema_last, fibonacci, key_levels, macd, mean, pivot_points, rsi,
    sma_last, stochastic, tail, vwap, williams_r, AdxReading, AtrReading, BollingerReading,
    Fibonacci, KeyLevels, MacdReading, PivotPoints, StochasticReading, VwapReading,
    WilliamsReading,
};
use crate::domain::Bar;

/// Bumped whenever a period, threshold or formula below changes.
pub const INDICATOR_SET_VERSION: u32 = 2;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;
pub const STOCH_K: usize = 14;
pub const STOCH_D: usize = 3;
pub const WILLIAMS_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;
pub const VWAP_WINDOW: usize = 20;
pub const SMA_SHORT: usize = 20;
pub const SMA_MEDIUM: usize = 50;
pub const SMA_LONG: usize = 200;
pub const EMA_FAST: usize = 9;
pub const EMA_SLOW: usize = 21;
/// Bars in the trend change window.
pub const TREND_WINDOW: usize = 50;
/// Bars in the short change window used to orient volume surges.
pub const SHORT_CHANGE_WINDOW: usize = 20;
/// Recent / baseline bars for the volume ratio.
pub const VOLUME_RECENT: usize = 5;
pub const VOLUME_BASELINE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub version: u32,
    pub price: f64,
    pub rsi: f64,
    pub macd: MacdReading,
    pub bollinger: BollingerReading,
    pub atr: AtrReading,
    pub stochastic: StochasticReading,
    pub williams: WilliamsReading,
    pub adx: AdxReading,
    pub vwap: VwapReading,
    pub fibonacci: Option<Fibonacci>,
    pub pivots: Option<PivotPoints>,
    pub levels: KeyLevels,
    /// SMAs are `None` until the history covers their full period.
    pub sma_short: Option<f64>,
    pub sma_medium: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
    /// Mean volume of the last 5 bars over the mean of the 20 before them.
    pub volume_ratio: f64,
    /// Percent change across the trend window (or all available bars).
    pub change_percent: f64,
    /// Percent change across the short window.
    pub change_short_percent: f64,
    /// Kaufman efficiency ratio of the closes across the trend window.
    #[serde(default)]
    pub efficiency: f64,
}

impl IndicatorSnapshot {
    pub fn compute(bars: &[Bar], price: f64) -> Self {
        let closes = closes(bars);
        let full_sma = |period: usize| (closes.len() >= period).then(|| sma_last(&closes, period));

        Self {
            version: INDICATOR_SET_VERSION,
            price,
            rsi: rsi(&closes, RSI_PERIOD),
            macd: macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
            bollinger: bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_K, price),
            atr: atr(bars, ATR_PERIOD, price),
            stochastic: stochastic(bars, STOCH_K, STOCH_D),
            williams: williams_r(bars, WILLIAMS_PERIOD),
            adx: adx(bars, ADX_PERIOD),
            vwap: vwap(bars, VWAP_WINDOW, price),
            fibonacci: fibonacci(bars, super::levels::FIB_LOOKBACK),
            pivots: pivot_points(bars),
            levels: key_levels(bars, price),
            sma_short: full_sma(SMA_SHORT),
            sma_medium: full_sma(SMA_MEDIUM),
            sma_long: full_sma(SMA_LONG),
            ema_fast: ema_last(&closes, EMA_FAST),
            ema_slow: ema_last(&closes, EMA_SLOW),
            volume_ratio: volume_ratio(bars),
            change_percent: change_percent(&closes, TREND_WINDOW, price),
            change_short_percent: change_percent(&closes, SHORT_CHANGE_WINDOW, price),
            efficiency: efficiency_ratio(&closes, TREND_WINDOW),
        }
    }

    /// Strong trend flag (ADX ≥ 25).
    pub fn strong_trend(&self) -> bool {
        self.adx.strength.is_trending()
    }
}

/// Recent volume against its baseline; 1.0 when the baseline is missing or zero.
pub fn volume_ratio(bars: &[Bar]) -> f64 {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    if volumes.len() <= VOLUME_RECENT {
        return 1.0;
    }
    let (before, recent) = volumes.split_at(volumes.len() - VOLUME_RECENT);
    let baseline = mean(tail(before, VOLUME_BASELINE));
    if baseline > 0.0 {
        mean(recent) / baseline
    } else {
        1.0
    }
}

/// Percent change from the close `window` bars back to `price`.
fn change_percent(closes: &[f64], window: usize, price: f64) -> f64 {
    let Some(&start) = tail(closes, window + 1).first() else {
        return 0.0;
    };
    if start > 0.0 {
        (price - start) / start * 100.0
    } else {
        0.0
    }
}

/// |net move| / Σ|bar-to-bar move| over the last `window` changes.
///
/// 1.0 for a strictly monotonic run, near 0 for noise. 0 when the path
/// length is zero.
pub fn efficiency_ratio(closes: &[f64], window: usize) -> f64 {
    let recent = tail(closes, window + 1);
    let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
        return 0.0;
    };
    let path: f64 = recent.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    if path > 0.0 {
        ((last - first).abs() / path).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
