//! Average Directional Index (ADX), single-window approximation.
//!
//! +DM/-DM and True Range are summed over the trailing `period` bar pairs
//! (no Wilder smoothing):
//!   +DI = 100 × Σ+DM / ΣTR,  -DI = 100 × Σ-DM / ΣTR
//!   DX  = 100 × |+DI - -DI| / (+DI + -DI)
//! The reported `value` is that DX. A smoothed Wilder ADX lags this figure
//! and reads lower early in a trend; treat the buckets accordingly.
//!
//! Zero TR sum or zero DI sum → 0.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl TrendStrength {
    /// Bucket boundaries: 20, 25, 35.
    pub fn from_value(value: f64) -> Self {
        if value >= 35.0 {
            Self::VeryStrong
        } else if value >= 25.0 {
            Self::Strong
        } else if value >= 20.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn is_trending(&self) -> bool {
        matches!(self, Self::Strong | Self::VeryStrong)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxReading {
    pub value: f64,
    pub di_plus: f64,
    pub di_minus: f64,
    pub strength: TrendStrength,
    pub direction: Direction,
}

pub fn adx(bars: &[Bar], period: usize) -> AdxReading {
    let n = bars.len();
    let start = n.saturating_sub(period.max(1) + 1);

    let (mut plus_dm, mut minus_dm, mut tr_sum) = (0.0, 0.0, 0.0);
    for pair in bars[start..].windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        if up > down && up > 0.0 {
            plus_dm += up;
        }
        if down > up && down > 0.0 {
            minus_dm += down;
        }
        tr_sum += bar
            .range()
            .max((bar.high - prev.close).abs())
            .max((bar.low - prev.close).abs());
    }

    let (di_plus, di_minus) = if tr_sum > 0.0 {
        (100.0 * plus_dm / tr_sum, 100.0 * minus_dm / tr_sum)
    } else {
        (0.0, 0.0)
    };

    let di_sum = di_plus + di_minus;
    let value = if di_sum > 0.0 {
        100.0 * (di_plus - di_minus).abs() / di_sum
    } else {
        0.0
    };

    let direction = if di_plus > di_minus {
        Direction::Bullish
    } else if di_minus > di_plus {
        Direction::Bearish
    } else {
        Direction::Neutral
    };

    AdxReading {
        value,
        di_plus,
        di_minus,
        strength: TrendStrength::from_value(value),
        direction,
    }
}
