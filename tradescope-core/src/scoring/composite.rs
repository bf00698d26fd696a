//! Weighted fusion of every signal source into a [`CompositeSignal`].

use super::trend::{EMA_SEPARATION_PERCENT, SMA_DISTANCE_PERCENT, SMA_STACK_SEPARATION_PERCENT};
use super::{CompositeSignal, ContributingSignal, SignalSource, TrendAlignment};
use crate::domain::Direction;
use crate::indicators::{
    IndicatorSnapshot, MacdMomentum, OscillatorZone, TrendStrength, VwapSignal,
};
use crate::patterns::PatternMatch;
use crate::profile::{StrategyProfile, WeightTable};
use crate::regression::RegressionProjection;

/// Bull/bear difference below which the call is Neutral.
pub const NEUTRAL_BAND: f64 = 10.0;
pub const SCORE_FLOOR: f64 = 30.0;
pub const SCORE_CEILING: f64 = 95.0;

const TREND_CHANGE_PERCENT: f64 = 3.0;
/// Efficiency ratio at or above which a smaller move still counts as a trend.
const TREND_EFFICIENCY: f64 = 0.5;
const REGRESSION_MOVE_PERCENT: f64 = 1.0;
const VOLUME_SURGE_RATIO: f64 = 1.5;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const BOLLINGER_LOWER_EDGE: f64 = 0.05;
const BOLLINGER_UPPER_EDGE: f64 = 0.95;
/// Pattern points per direction are capped at this multiple of the weight.
const PATTERN_CAP: f64 = 1.5;

/// Which extreme an oscillator is sitting at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Oversold,
    Overbought,
}

struct Tally<'a> {
    weights: &'a WeightTable,
    /// Direction of the confirmed trend, Neutral when there is none.
    trend: Direction,
    /// Direction of a strong (ADX ≥ 25) confirmed trend, if any.
    strong_trend: Option<Direction>,
    contributions: Vec<ContributingSignal>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, source: SignalSource, direction: Direction, fraction: f64, label: impl Into<String>) {
        self.push(source, direction, fraction * self.weights.weight(source), label);
    }

    fn push(&mut self, source: SignalSource, direction: Direction, weight: f64, label: impl Into<String>) {
        self.contributions.push(ContributingSignal {
            source,
            label: label.into(),
            direction,
            weight,
        });
    }

    fn note(&mut self, source: SignalSource, label: impl Into<String>) {
        self.push(source, Direction::Neutral, 0.0, label);
    }

    /// Contrarian at an extreme, unless a strong trend runs the same way,
    /// in which case the reading counts as half-weight continuation.
    fn extreme(&mut self, source: SignalSource, extreme: Extreme, what: &str) {
        match extreme {
            Extreme::Oversold if self.strong_trend == Some(Direction::Bearish) => {
                self.add(source, Direction::Bearish, 0.5, format!("{what} oversold in strong downtrend"))
            }
            Extreme::Oversold => self.add(source, Direction::Bullish, 1.0, format!("{what} oversold")),
            Extreme::Overbought if self.strong_trend == Some(Direction::Bullish) => {
                self.add(source, Direction::Bullish, 0.5, format!("{what} overbought in strong uptrend"))
            }
            Extreme::Overbought => self.add(source, Direction::Bearish, 1.0, format!("{what} overbought")),
        }
    }

    fn total(&self, direction: Direction) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.direction == direction)
            .map(|c| c.weight)
            .sum()
    }
}

/// Score one symbol under one profile.
///
/// Sources are evaluated in [`SignalSource::ALL`] order; patterns follow
/// detector order within their slot.
pub fn composite_signal(
    symbol: &str,
    profile: &StrategyProfile,
    snapshot: &IndicatorSnapshot,
    patterns: &[PatternMatch],
    projection: &RegressionProjection,
) -> CompositeSignal {
    let trend = confirmed_trend(snapshot);
    let strong_trend = (snapshot.strong_trend()
        && snapshot.adx.direction.is_actionable()
        && snapshot.adx.direction == trend)
        .then_some(trend);
    let mut tally = Tally {
        weights: &profile.weights,
        trend,
        strong_trend,
        contributions: Vec::new(),
    };
    let alignment = TrendAlignment::from_snapshot(snapshot);
    let price = snapshot.price;

    macd_signal(&mut tally, snapshot);
    ma_alignment_signal(&mut tally, &alignment);

    let change = snapshot.change_percent;
    if change >= TREND_CHANGE_PERCENT {
        tally.add(SignalSource::Trend, Direction::Bullish, 1.0, format!("uptrend {change:+.1}%"));
    } else if change <= -TREND_CHANGE_PERCENT {
        tally.add(SignalSource::Trend, Direction::Bearish, 1.0, format!("downtrend {change:+.1}%"));
    } else if trend.is_actionable() {
        let label = format!("steady trend {change:+.1}% (efficiency {:.2})", snapshot.efficiency);
        tally.add(SignalSource::Trend, trend, 1.0, label);
    }

    // A confirmed trend lets smaller moves count, in its own direction only.
    let separation = alignment.ema_separation_percent();
    if separation > EMA_SEPARATION_PERCENT || (trend == Direction::Bullish && separation > 0.0) {
        tally.add(SignalSource::EmaCross, Direction::Bullish, 1.0, "EMA9 above EMA21");
    } else if separation < -EMA_SEPARATION_PERCENT || (trend == Direction::Bearish && separation < 0.0) {
        tally.add(SignalSource::EmaCross, Direction::Bearish, 1.0, "EMA9 below EMA21");
    }

    let expected = projection.expected_move_percent(price);
    if expected >= REGRESSION_MOVE_PERCENT || (trend == Direction::Bullish && expected > 0.0) {
        tally.add(SignalSource::Regression, Direction::Bullish, 1.0, format!("projection {expected:+.1}%"));
    } else if expected <= -REGRESSION_MOVE_PERCENT || (trend == Direction::Bearish && expected < 0.0) {
        tally.add(SignalSource::Regression, Direction::Bearish, 1.0, format!("projection {expected:+.1}%"));
    }

    let adx = &snapshot.adx;
    if adx.direction.is_actionable() && adx.direction != trend {
        tally.note(SignalSource::Adx, format!("ADX {:.0} without a confirmed trend", adx.value));
    } else if adx.direction.is_actionable() {
        match adx.strength {
            TrendStrength::Strong | TrendStrength::VeryStrong => {
                tally.add(SignalSource::Adx, adx.direction, 1.0, format!("ADX {:.0} strong trend", adx.value))
            }
            TrendStrength::Moderate => {
                tally.add(SignalSource::Adx, adx.direction, 0.5, format!("ADX {:.0} moderate trend", adx.value))
            }
            TrendStrength::Weak => tally.note(SignalSource::Adx, format!("ADX {:.0} weak trend", adx.value)),
        }
    }

    oscillator_signals(&mut tally, snapshot);
    pattern_signals(&mut tally, patterns);

    if snapshot.volume_ratio >= VOLUME_SURGE_RATIO {
        let label = format!("volume surge {:.1}x", snapshot.volume_ratio);
        if snapshot.change_short_percent > 0.0 {
            tally.add(SignalSource::Volume, Direction::Bullish, 1.0, label);
        } else if snapshot.change_short_percent < 0.0 {
            tally.add(SignalSource::Volume, Direction::Bearish, 1.0, label);
        }
    }

    finish(symbol, profile, tally)
}

/// A move of at least [`TREND_CHANGE_PERCENT`], or any move made efficiently.
fn confirmed_trend(snapshot: &IndicatorSnapshot) -> Direction {
    let change = snapshot.change_percent;
    let steady = snapshot.efficiency >= TREND_EFFICIENCY && change != 0.0;
    if change.abs() >= TREND_CHANGE_PERCENT || steady {
        if change > 0.0 {
            Direction::Bullish
        } else {
            Direction::Bearish
        }
    } else {
        Direction::Neutral
    }
}

fn macd_signal(tally: &mut Tally<'_>, snapshot: &IndicatorSnapshot) {
    let macd = &snapshot.macd;
    if let Some(cross) = macd.crossover {
        let label = match cross {
            Direction::Bullish => "MACD bullish crossover",
            _ => "MACD bearish crossover",
        };
        tally.add(SignalSource::Macd, cross, 1.0, label);
        return;
    }

    let bias = macd.zero_line_bias;
    if bias.is_actionable() && macd.trend == bias {
        let fraction = if macd.momentum == MacdMomentum::Expanding { 1.0 } else { 0.8 };
        let label = match bias {
            Direction::Bullish => "MACD bullish above zero",
            _ => "MACD bearish below zero",
        };
        tally.add(SignalSource::Macd, bias, fraction, label);
    } else if bias.is_actionable() {
        tally.add(SignalSource::Macd, bias, 0.4, "MACD pullback against zero-line bias");
    } else {
        tally.note(SignalSource::Macd, "MACD flat");
    }
}

fn ma_alignment_signal(tally: &mut Tally<'_>, alignment: &TrendAlignment) {
    if alignment.smas().is_empty() {
        return;
    }
    let source = SignalSource::MaAlignment;
    let up = tally.trend == Direction::Bullish;
    let down = tally.trend == Direction::Bearish;
    let clear = alignment.distance_percent() >= SMA_DISTANCE_PERCENT;
    let spread = alignment.stack_separation_percent() >= SMA_STACK_SEPARATION_PERCENT;

    if alignment.above_all() && (clear || up) {
        if alignment.bullish_stack() && (spread || up) {
            tally.add(source, Direction::Bullish, 1.0, "price above stacked SMAs");
        } else {
            tally.add(source, Direction::Bullish, 0.7, "price above SMAs");
        }
    } else if alignment.below_all() && (clear || down) {
        if alignment.bearish_stack() && (spread || down) {
            tally.add(source, Direction::Bearish, 1.0, "price below stacked SMAs");
        } else {
            tally.add(source, Direction::Bearish, 0.7, "price below SMAs");
        }
    } else if alignment.above_all() || alignment.below_all() {
        tally.note(source, "price hugging SMAs");
    } else if alignment.bullish_pullback() && (spread || up) {
        tally.add(source, Direction::Bullish, 0.5, "pullback to short SMA in uptrend");
    } else if alignment.bearish_pullback() && (spread || down) {
        tally.add(source, Direction::Bearish, 0.5, "rally to short SMA in downtrend");
    } else {
        tally.note(source, "mixed SMA alignment");
    }
}

fn oscillator_signals(tally: &mut Tally<'_>, snapshot: &IndicatorSnapshot) {
    let rsi = snapshot.rsi;
    if rsi < RSI_OVERSOLD {
        tally.extreme(SignalSource::Rsi, Extreme::Oversold, "RSI");
    } else if rsi > RSI_OVERBOUGHT {
        tally.extreme(SignalSource::Rsi, Extreme::Overbought, "RSI");
    } else if rsi >= 50.0 {
        tally.add(SignalSource::Rsi, Direction::Bullish, 0.5, format!("RSI {rsi:.0} bullish zone"));
    } else {
        tally.add(SignalSource::Rsi, Direction::Bearish, 0.5, format!("RSI {rsi:.0} bearish zone"));
    }

    let stoch = &snapshot.stochastic;
    match stoch.zone {
        OscillatorZone::Oversold => tally.extreme(SignalSource::Stochastic, Extreme::Oversold, "Stochastic"),
        OscillatorZone::Overbought => {
            tally.extreme(SignalSource::Stochastic, Extreme::Overbought, "Stochastic")
        }
        OscillatorZone::Neutral if stoch.k > stoch.d => {
            tally.add(SignalSource::Stochastic, Direction::Bullish, 0.3, "%K above %D")
        }
        OscillatorZone::Neutral if stoch.k < stoch.d => {
            tally.add(SignalSource::Stochastic, Direction::Bearish, 0.3, "%K below %D")
        }
        OscillatorZone::Neutral => {}
    }

    match snapshot.williams.zone {
        OscillatorZone::Oversold => tally.extreme(SignalSource::Williams, Extreme::Oversold, "Williams %R"),
        OscillatorZone::Overbought => {
            tally.extreme(SignalSource::Williams, Extreme::Overbought, "Williams %R")
        }
        OscillatorZone::Neutral => tally.note(SignalSource::Williams, "Williams %R neutral"),
    }

    let deviation = snapshot.vwap.deviation_percent;
    match snapshot.vwap.signal {
        VwapSignal::Bullish => tally.add(SignalSource::Vwap, Direction::Bullish, 1.0, "price above VWAP"),
        VwapSignal::Bearish => tally.add(SignalSource::Vwap, Direction::Bearish, 1.0, "price below VWAP"),
        VwapSignal::Oversold => tally.extreme(SignalSource::Vwap, Extreme::Oversold, "VWAP"),
        VwapSignal::Overbought => tally.extreme(SignalSource::Vwap, Extreme::Overbought, "VWAP"),
        VwapSignal::Neutral if tally.trend == Direction::Bullish && deviation > 0.0 => {
            tally.add(SignalSource::Vwap, Direction::Bullish, 0.5, "price just above VWAP in uptrend")
        }
        VwapSignal::Neutral if tally.trend == Direction::Bearish && deviation < 0.0 => {
            tally.add(SignalSource::Vwap, Direction::Bearish, 0.5, "price just below VWAP in downtrend")
        }
        VwapSignal::Neutral => {}
    }

    let position = snapshot.bollinger.position;
    if position <= BOLLINGER_LOWER_EDGE {
        tally.extreme(SignalSource::Bollinger, Extreme::Oversold, "Bollinger lower band");
    } else if position >= BOLLINGER_UPPER_EDGE {
        tally.extreme(SignalSource::Bollinger, Extreme::Overbought, "Bollinger upper band");
    } else if snapshot.bollinger.squeeze {
        tally.note(SignalSource::Bollinger, "Bollinger squeeze");
    }
}

fn pattern_signals(tally: &mut Tally<'_>, patterns: &[PatternMatch]) {
    let weight = tally.weights.patterns;
    let cap = PATTERN_CAP * weight;
    let (mut bullish, mut bearish) = (0.0, 0.0);

    for pattern in patterns {
        let used = match pattern.class {
            Direction::Bullish => &mut bullish,
            Direction::Bearish => &mut bearish,
            Direction::Neutral => continue,
        };
        let points = (weight * pattern.confidence_weight / 100.0).min(cap - *used);
        if points <= 0.0 {
            continue;
        }
        *used += points;
        tally.push(SignalSource::Patterns, pattern.class, points, pattern.name.clone());
    }
}

fn finish(symbol: &str, profile: &StrategyProfile, tally: Tally<'_>) -> CompositeSignal {
    let bullish_score = tally.total(Direction::Bullish);
    let bearish_score = tally.total(Direction::Bearish);
    let conviction = (bullish_score - bearish_score).abs();

    let direction = if conviction < NEUTRAL_BAND {
        Direction::Neutral
    } else if bullish_score > bearish_score {
        Direction::Bullish
    } else {
        Direction::Bearish
    };
    let score = bullish_score
        .max(bearish_score)
        .clamp(SCORE_FLOOR, SCORE_CEILING);

    let mut agreeing: Vec<SignalSource> = tally
        .contributions
        .iter()
        .filter(|c| direction.is_actionable() && c.direction == direction && c.weight > 0.0)
        .map(|c| c.source)
        .collect();
    agreeing.dedup();

    CompositeSignal {
        symbol: symbol.to_string(),
        profile_id: profile.id.clone(),
        direction,
        score,
        bullish_score,
        bearish_score,
        alignment_count: agreeing.len(),
        conviction,
        contributing_signals: tally.contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, MacdReading};
    use crate::patterns::PatternKind;
    use crate::profile::test_profile;
    use crate::regression::{project, ConfidenceLevel};

    fn flat_inputs() -> (IndicatorSnapshot, RegressionProjection) {
        let bars = make_bars(&[100.0; 40]);
        let snapshot = IndicatorSnapshot::compute(&bars, 100.0);
        let projection = project(&bars, 100.0, 20, 5, ConfidenceLevel::P95);
        (snapshot, projection)
    }

    fn contribution(signal: &CompositeSignal, source: SignalSource) -> &ContributingSignal {
        signal
            .contributing_signals
            .iter()
            .find(|c| c.source == source)
            .unwrap()
    }

    fn pattern(name: &str, class: Direction, confidence: f64) -> PatternMatch {
        PatternMatch::new(name, class, confidence, 1.0, PatternKind::Chart)
    }

    #[test]
    fn flat_market_is_neutral_at_floor() {
        let (snapshot, projection) = flat_inputs();
        let signal = composite_signal("FLAT", &test_profile(), &snapshot, &[], &projection);
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.score, SCORE_FLOOR);
        assert_eq!(signal.alignment_count, 0);
        assert_eq!(signal.symbol, "FLAT");
        assert_eq!(signal.profile_id, "test");
    }

    #[test]
    fn oversold_rsi_is_contrarian_without_strong_trend() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.rsi = 20.0;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let rsi = signal
            .contributing_signals
            .iter()
            .find(|c| c.source == SignalSource::Rsi)
            .unwrap();
        assert_eq!(rsi.direction, Direction::Bullish);
        assert_eq!(rsi.weight, 10.0);
    }

    #[test]
    fn oversold_rsi_in_strong_downtrend_is_continuation() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.rsi = 20.0;
        snapshot.change_percent = -5.0;
        snapshot.adx.value = 40.0;
        snapshot.adx.strength = TrendStrength::VeryStrong;
        snapshot.adx.direction = Direction::Bearish;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let rsi = signal
            .contributing_signals
            .iter()
            .find(|c| c.source == SignalSource::Rsi)
            .unwrap();
        assert_eq!(rsi.direction, Direction::Bearish);
        assert_eq!(rsi.weight, 5.0);
    }

    #[test]
    fn adx_without_a_confirmed_trend_is_informational() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.adx.value = 42.0;
        snapshot.adx.strength = TrendStrength::VeryStrong;
        snapshot.adx.direction = Direction::Bullish;
        snapshot.change_percent = 0.4;
        snapshot.efficiency = 0.08;
        snapshot.stochastic.k = 90.0;
        snapshot.stochastic.d = 85.0;
        snapshot.stochastic.zone = OscillatorZone::Overbought;

        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let adx = contribution(&signal, SignalSource::Adx);
        assert_eq!(adx.direction, Direction::Neutral);
        assert_eq!(adx.weight, 0.0);
        // no continuation credit: overbought stays contrarian
        let stoch = contribution(&signal, SignalSource::Stochastic);
        assert_eq!(stoch.direction, Direction::Bearish);
        assert_eq!(stoch.weight, 8.0);

        snapshot.change_percent = 5.0;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        assert_eq!(contribution(&signal, SignalSource::Adx).weight, 8.0);
        let stoch = contribution(&signal, SignalSource::Stochastic);
        assert_eq!(stoch.direction, Direction::Bullish);
        assert_eq!(stoch.weight, 4.0);
    }

    #[test]
    fn price_hugging_stacked_smas_earns_nothing_without_a_trend() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.sma_short = Some(99.98);
        snapshot.sma_medium = Some(99.96);
        snapshot.sma_long = Some(99.94);

        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let ma = contribution(&signal, SignalSource::MaAlignment);
        assert_eq!(ma.weight, 0.0);
        assert_eq!(ma.label, "price hugging SMAs");

        snapshot.change_percent = 1.0;
        snapshot.efficiency = 0.9;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let ma = contribution(&signal, SignalSource::MaAlignment);
        assert_eq!(ma.direction, Direction::Bullish);
        assert_eq!(ma.weight, 15.0);
        assert_eq!(contribution(&signal, SignalSource::Trend).weight, 12.0);
    }

    #[test]
    fn steady_trend_counts_small_moves_in_its_direction() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.change_percent = 1.5;
        snapshot.ema_fast = 100.05;
        snapshot.vwap.deviation_percent = 0.2;

        snapshot.efficiency = 0.2;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        assert!(signal.contributing_signals.iter().all(|c| c.source != SignalSource::Trend
            && c.source != SignalSource::EmaCross
            && c.source != SignalSource::Vwap));

        snapshot.efficiency = 0.95;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let ema = contribution(&signal, SignalSource::EmaCross);
        assert_eq!((ema.direction, ema.weight), (Direction::Bullish, 8.0));
        let vwap = contribution(&signal, SignalSource::Vwap);
        assert_eq!((vwap.direction, vwap.weight), (Direction::Bullish, 4.0));

        // a bearish reading is not helped by a bullish trend
        snapshot.vwap.deviation_percent = -0.2;
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        assert!(signal.contributing_signals.iter().all(|c| c.source != SignalSource::Vwap));
    }

    #[test]
    fn macd_pullback_counts_toward_bias() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.macd = MacdReading {
            line: 1.0,
            signal: 1.2,
            histogram: -0.2,
            trend: Direction::Bearish,
            crossover: None,
            zero_line_bias: Direction::Bullish,
            momentum: MacdMomentum::Contracting,
        };
        let signal = composite_signal("X", &test_profile(), &snapshot, &[], &projection);
        let macd = &signal.contributing_signals[0];
        assert_eq!(macd.source, SignalSource::Macd);
        assert_eq!(macd.direction, Direction::Bullish);
        assert!((macd.weight - 6.0).abs() < 1e-12);
    }

    #[test]
    fn pattern_points_are_capped_per_direction() {
        let (snapshot, projection) = flat_inputs();
        let patterns = vec![
            pattern("A", Direction::Bullish, 80.0),
            pattern("B", Direction::Bullish, 80.0),
            pattern("C", Direction::Bullish, 80.0),
            pattern("Doji", Direction::Neutral, 55.0),
        ];
        let signal = composite_signal("X", &test_profile(), &snapshot, &patterns, &projection);
        let points: f64 = signal
            .contributing_signals
            .iter()
            .filter(|c| c.source == SignalSource::Patterns)
            .map(|c| c.weight)
            .sum();
        // weight 15: 12 + 10.5 (capped at 22.5), third dropped
        assert!((points - 22.5).abs() < 1e-9);
        assert_eq!(
            signal
                .contributing_signals
                .iter()
                .filter(|c| c.source == SignalSource::Patterns)
                .count(),
            2
        );
    }

    #[test]
    fn strong_bullish_evidence_wins() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.change_percent = 8.0;
        snapshot.ema_fast = 101.0;
        snapshot.rsi = 60.0;
        snapshot.volume_ratio = 2.0;
        snapshot.change_short_percent = 3.0;
        let patterns = vec![pattern("Bullish Flag", Direction::Bullish, 78.0)];
        let signal = composite_signal("X", &test_profile(), &snapshot, &patterns, &projection);

        assert_eq!(signal.direction, Direction::Bullish);
        // trend 12 + ema 8 + rsi 5 + flag 11.7 + volume 10
        assert!(signal.bullish_score >= 46.7 - 1e-9);
        assert!(signal.alignment_count >= 5);
        assert!(signal.supporting().all(|c| c.direction == Direction::Bullish));
        assert!(signal.score <= SCORE_CEILING);
    }

    #[test]
    fn zero_weight_sources_do_not_count_toward_alignment() {
        let (mut snapshot, projection) = flat_inputs();
        snapshot.change_percent = 8.0;
        snapshot.ema_fast = 101.0;
        snapshot.rsi = 60.0;
        let mut profile = test_profile();
        profile.weights.trend = 0.0;
        let signal = composite_signal("X", &profile, &snapshot, &[], &projection);
        assert!(signal
            .supporting()
            .all(|c| c.source != SignalSource::Trend));
    }
}
