//! Candlestick patterns over the last one to three bars.

use super::{PatternDetector, PatternKind, PatternMatch};
use crate::domain::{Bar, Direction};

/// Bars of prior move required before a hammer or shooting star.
const PRIOR_TREND_BARS: usize = 5;

fn candle(name: &str, class: Direction, confidence: f64, target: f64) -> Option<PatternMatch> {
    Some(PatternMatch::new(
        name,
        class,
        confidence,
        target,
        PatternKind::Candlestick,
    ))
}

/// Close change over the `PRIOR_TREND_BARS` bars before the last one.
fn prior_move(bars: &[Bar]) -> Option<f64> {
    let n = bars.len();
    if n < PRIOR_TREND_BARS + 2 {
        return None;
    }
    Some(bars[n - 2].close - bars[n - 2 - PRIOR_TREND_BARS].close)
}

/// Small body at the top of the range with a long lower shadow, after a decline.
#[derive(Debug, Clone, Copy)]
pub struct Hammer;

impl PatternDetector for Hammer {
    fn name(&self) -> &str {
        "hammer"
    }

    fn min_bars(&self) -> usize {
        PRIOR_TREND_BARS + 2
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let bar = bars.last()?;
        let (body, range) = (bar.body(), bar.range());
        if range <= 0.0 || body < 0.05 * range {
            return None;
        }
        if bar.lower_shadow() >= 2.0 * body && bar.upper_shadow() <= body && prior_move(bars)? < 0.0
        {
            return candle("Hammer", Direction::Bullish, 60.0, 1.03);
        }
        None
    }
}

/// Mirror of the hammer: long upper shadow after an advance.
#[derive(Debug, Clone, Copy)]
pub struct ShootingStar;

impl PatternDetector for ShootingStar {
    fn name(&self) -> &str {
        "shooting_star"
    }

    fn min_bars(&self) -> usize {
        PRIOR_TREND_BARS + 2
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let bar = bars.last()?;
        let (body, range) = (bar.body(), bar.range());
        if range <= 0.0 || body < 0.05 * range {
            return None;
        }
        if bar.upper_shadow() >= 2.0 * body && bar.lower_shadow() <= body && prior_move(bars)? > 0.0
        {
            return candle("Shooting Star", Direction::Bearish, 60.0, 0.97);
        }
        None
    }
}

/// Open and close nearly equal: indecision.
#[derive(Debug, Clone, Copy)]
pub struct Doji;

impl PatternDetector for Doji {
    fn name(&self) -> &str {
        "doji"
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let bar = bars.last()?;
        let range = bar.range();
        if range > 0.0 && bar.body() <= 0.1 * range {
            return candle("Doji", Direction::Neutral, 55.0, 1.0);
        }
        None
    }
}

/// Body that fully engulfs the previous, opposite-coloured body.
#[derive(Debug, Clone, Copy)]
pub struct Engulfing;

impl PatternDetector for Engulfing {
    fn name(&self) -> &str {
        "engulfing"
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let [.., prev, cur] = bars else {
            return None;
        };
        if cur.body() <= prev.body() {
            return None;
        }
        if prev.is_bearish() && cur.is_bullish() && cur.open <= prev.close && cur.close >= prev.open
        {
            return candle("Bullish Engulfing", Direction::Bullish, 65.0, 1.03);
        }
        if prev.is_bullish() && cur.is_bearish() && cur.open >= prev.close && cur.close <= prev.open
        {
            return candle("Bearish Engulfing", Direction::Bearish, 65.0, 0.97);
        }
        None
    }
}

/// Morning star (bullish) and evening star (bearish) three-bar reversals.
#[derive(Debug, Clone, Copy)]
pub struct StarReversal;

impl PatternDetector for StarReversal {
    fn name(&self) -> &str {
        "star_reversal"
    }

    fn min_bars(&self) -> usize {
        3
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let [.., first, star, last] = bars else {
            return None;
        };
        let first_body = first.body();
        if first.range() <= 0.0 || first_body < 0.5 * first.range() {
            return None;
        }
        if star.body() > 0.3 * first_body {
            return None;
        }
        let midpoint = (first.open + first.close) / 2.0;

        if first.is_bearish() && last.is_bullish() && last.close > midpoint {
            return candle("Morning Star", Direction::Bullish, 70.0, 1.04);
        }
        if first.is_bullish() && last.is_bearish() && last.close < midpoint {
            return candle("Evening Star", Direction::Bearish, 70.0, 0.96);
        }
        None
    }
}

/// Three white soldiers (bullish) and three black crows (bearish).
#[derive(Debug, Clone, Copy)]
pub struct ThreeCandles;

impl PatternDetector for ThreeCandles {
    fn name(&self) -> &str {
        "three_candles"
    }

    fn min_bars(&self) -> usize {
        3
    }

    fn detect(&self, bars: &[Bar]) -> Option<PatternMatch> {
        let [.., a, b, c] = bars else {
            return None;
        };
        let trio = [a, b, c];
        let solid = trio
            .iter()
            .all(|bar| bar.range() > 0.0 && bar.body() >= 0.5 * bar.range());
        if !solid {
            return None;
        }

        if trio.iter().all(|bar| bar.is_bullish()) && b.close > a.close && c.close > b.close {
            return candle("Three White Soldiers", Direction::Bullish, 68.0, 1.04);
        }
        if trio.iter().all(|bar| bar.is_bearish()) && b.close < a.close && c.close < b.close {
            return candle("Three Black Crows", Direction::Bearish, 68.0, 0.96);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::ohlc_bars;
    use super::*;

    fn declining_then(last: (f64, f64, f64, f64)) -> Vec<Bar> {
        let mut rows: Vec<(f64, f64, f64, f64)> = (0..6)
            .map(|i| {
                let open = 110.0 - i as f64 * 2.0;
                (open, open + 0.5, open - 2.5, open - 2.0)
            })
            .collect();
        rows.push(last);
        ohlc_bars(&rows)
    }

    fn advancing_then(last: (f64, f64, f64, f64)) -> Vec<Bar> {
        let mut rows: Vec<(f64, f64, f64, f64)> = (0..6)
            .map(|i| {
                let open = 90.0 + i as f64 * 2.0;
                (open, open + 2.5, open - 0.5, open + 2.0)
            })
            .collect();
        rows.push(last);
        ohlc_bars(&rows)
    }

    #[test]
    fn hammer_after_decline() {
        // body 0.5, lower shadow 3.0, upper shadow 0.2
        let bars = declining_then((98.0, 98.7, 95.0, 98.5));
        assert_eq!(Hammer.detect(&bars).unwrap().name, "Hammer");
        // Same candle after an advance is not a hammer.
        assert!(Hammer.detect(&advancing_then((98.0, 98.7, 95.0, 98.5))).is_none());
    }

    #[test]
    fn shooting_star_after_advance() {
        let bars = advancing_then((102.0, 105.5, 101.8, 102.4));
        let m = ShootingStar.detect(&bars).unwrap();
        assert_eq!(m.name, "Shooting Star");
        assert_eq!(m.class, Direction::Bearish);
    }

    #[test]
    fn doji_small_body() {
        let bars = ohlc_bars(&[(100.0, 102.0, 98.0, 100.1)]);
        let m = Doji.detect(&bars).unwrap();
        assert_eq!(m.class, Direction::Neutral);
        assert_eq!(m.confidence_weight, 55.0);
        assert!(Doji.detect(&ohlc_bars(&[(100.0, 100.0, 100.0, 100.0)])).is_none());
    }

    #[test]
    fn bullish_and_bearish_engulfing() {
        let bull = ohlc_bars(&[(101.0, 101.5, 99.5, 100.0), (99.8, 102.5, 99.5, 102.0)]);
        assert_eq!(Engulfing.detect(&bull).unwrap().name, "Bullish Engulfing");

        let bear = ohlc_bars(&[(100.0, 101.5, 99.5, 101.0), (101.2, 101.5, 98.5, 99.0)]);
        assert_eq!(Engulfing.detect(&bear).unwrap().name, "Bearish Engulfing");

        // Same colour twice never engulfs.
        let same = ohlc_bars(&[(100.0, 101.5, 99.5, 101.0), (99.0, 103.0, 98.5, 102.5)]);
        assert!(Engulfing.detect(&same).is_none());
    }

    #[test]
    fn morning_and_evening_star() {
        let morning = ohlc_bars(&[
            (110.0, 110.5, 103.5, 104.0),
            (103.5, 104.0, 102.5, 103.2),
            (103.5, 108.5, 103.0, 108.0),
        ]);
        assert_eq!(StarReversal.detect(&morning).unwrap().name, "Morning Star");

        let evening = ohlc_bars(&[
            (100.0, 106.5, 99.5, 106.0),
            (106.5, 107.5, 106.0, 106.8),
            (106.5, 107.0, 101.5, 102.0),
        ]);
        assert_eq!(StarReversal.detect(&evening).unwrap().name, "Evening Star");
    }

    #[test]
    fn three_soldiers_and_crows() {
        let soldiers = ohlc_bars(&[
            (100.0, 102.2, 99.8, 102.0),
            (102.0, 104.2, 101.8, 104.0),
            (104.0, 106.2, 103.8, 106.0),
        ]);
        assert_eq!(
            ThreeCandles.detect(&soldiers).unwrap().name,
            "Three White Soldiers"
        );

        let crows = ohlc_bars(&[
            (106.0, 106.2, 103.8, 104.0),
            (104.0, 104.2, 101.8, 102.0),
            (102.0, 102.2, 99.8, 100.0),
        ]);
        assert_eq!(ThreeCandles.detect(&crows).unwrap().name, "Three Black Crows");
    }

    #[test]
    fn short_input_is_none() {
        assert!(Engulfing.detect(&ohlc_bars(&[(1.0, 2.0, 0.5, 1.5)])).is_none());
        assert!(StarReversal.detect(&[]).is_none());
        assert!(Hammer.detect(&[]).is_none());
    }
}
