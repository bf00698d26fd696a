//! Predictive regression: OLS trend fit, forward projection and confidence band.
//!
//! The projection is adjusted for the volatility regime: when the current
//! ATR runs hot against its own trailing average the projected move away
//! from the current price is amplified, when it runs cold it is dampened.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::{atr_series, closes, mean, tail};

/// ATR period used for the regime comparison.
pub const REGIME_ATR_PERIOD: usize = 14;
/// Trailing ATR values averaged for the regime baseline.
pub const REGIME_LOOKBACK: usize = 20;
pub const HIGH_VOL_RATIO: f64 = 1.2;
pub const LOW_VOL_RATIO: f64 = 0.8;

/// Two-sided confidence level of the projection band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConfidenceLevel {
    P68,
    P90,
    P95,
    P99,
}

impl ConfidenceLevel {
    pub fn z_score(&self) -> f64 {
        match self {
            Self::P68 => 1.0,
            Self::P90 => 1.645,
            Self::P95 => 1.96,
            Self::P99 => 2.58,
        }
    }

    pub fn percent(&self) -> u8 {
        u8::from(*self)
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            68 => Ok(Self::P68),
            90 => Ok(Self::P90),
            95 => Ok(Self::P95),
            99 => Ok(Self::P99),
            other => Err(format!(
                "unsupported confidence level {other} (expected 68, 90, 95 or 99)"
            )),
        }
    }
}

impl From<ConfidenceLevel> for u8 {
    fn from(level: ConfidenceLevel) -> Self {
        match level {
            ConfidenceLevel::P68 => 68,
            ConfidenceLevel::P90 => 90,
            ConfidenceLevel::P95 => 95,
            ConfidenceLevel::P99 => 99,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRegime {
    Low,
    Normal,
    High,
}

impl VolatilityRegime {
    /// Multiplier applied to the projected deviation from price.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Low => LOW_VOL_RATIO,
            Self::Normal => 1.0,
            Self::High => HIGH_VOL_RATIO,
        }
    }
}

/// Ordinary least squares fit of `values` against x = 0..n-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Residual standard error (n - 2 degrees of freedom).
    pub residual_std: f64,
    /// Population variance of x.
    pub variance_x: f64,
}

impl LinearFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a line through `values`. Fewer than two points → flat line at the
/// last value with zero slope.
pub fn fit_line(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: values.last().copied().unwrap_or(0.0),
            r_squared: 0.0,
            residual_std: 0.0,
            variance_x: 0.0,
        };
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = mean(values);

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let sse: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let r = y - (intercept + slope * i as f64);
            r * r
        })
        .sum();

    let r_squared = if syy > 0.0 {
        (1.0 - sse / syy).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let residual_std = if n > 2 {
        (sse / (nf - 2.0)).sqrt()
    } else {
        0.0
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
        residual_std,
        variance_x: sxx / nf,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionProjection {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted value at the last bar.
    pub regression_value: f64,
    pub projected_price: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub confidence_level: ConfidenceLevel,
    pub r_squared: f64,
    pub volatility_regime: VolatilityRegime,
    pub volatility_adjusted_price: f64,
}

impl RegressionProjection {
    /// Expected percent move from `price` to the volatility-adjusted projection.
    pub fn expected_move_percent(&self, price: f64) -> f64 {
        if price > 0.0 {
            (self.volatility_adjusted_price - price) / price * 100.0
        } else {
            0.0
        }
    }
}

/// Project the trailing `length` closes `prediction_bars` forward.
///
/// Fewer than three closes → a flat projection at the last close.
pub fn project(
    bars: &[Bar],
    price: f64,
    length: usize,
    prediction_bars: usize,
    confidence_level: ConfidenceLevel,
) -> RegressionProjection {
    let all_closes = closes(bars);
    let window = tail(&all_closes, length);
    let regime = volatility_regime(bars);

    if window.len() < 3 {
        let last = window.last().copied().unwrap_or(price);
        return RegressionProjection {
            slope: 0.0,
            intercept: last,
            regression_value: last,
            projected_price: last,
            upper_band: last,
            lower_band: last,
            confidence_level,
            r_squared: 0.0,
            volatility_regime: regime,
            volatility_adjusted_price: price + (last - price) * regime.factor(),
        };
    }

    let fit = fit_line(window);
    let n = window.len() as f64;
    let horizon = prediction_bars as f64;
    let regression_value = fit.value_at(n - 1.0);
    let projected_price = regression_value + fit.slope * horizon;

    let spread = if fit.variance_x > 0.0 {
        (1.0 + 1.0 / n + horizon * horizon / fit.variance_x).sqrt()
    } else {
        1.0
    };
    let error = fit.residual_std * spread * confidence_level.z_score();

    RegressionProjection {
        slope: fit.slope,
        intercept: fit.intercept,
        regression_value,
        projected_price,
        upper_band: projected_price + error,
        lower_band: projected_price - error,
        confidence_level,
        r_squared: fit.r_squared,
        volatility_regime: regime,
        volatility_adjusted_price: price + (projected_price - price) * regime.factor(),
    }
}

/// Current ATR against the mean of its trailing values.
pub fn volatility_regime(bars: &[Bar]) -> VolatilityRegime {
    let series: Vec<f64> = atr_series(bars, REGIME_ATR_PERIOD)
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    let recent = tail(&series, REGIME_LOOKBACK);
    if recent.len() < 2 {
        return VolatilityRegime::Normal;
    }

    let current = recent[recent.len() - 1];

    let average = mean(recent);
    if average <= 0.0 {
        VolatilityRegime::Normal
    } else if current > HIGH_VOL_RATIO * average {
        VolatilityRegime::High
    } else if current < LOW_VOL_RATIO * average {
        VolatilityRegime::Low
    } else {
        VolatilityRegime::Normal
    }
}
