//! Input fingerprinting: a deterministic identity for one analysis.
//!
//! The hash covers the symbol, every bar, the current price, the profile
//! and the indicator set version. Identical inputs always produce the same
//! report, so the hash doubles as a cache key for callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Bar;
use crate::indicators::INDICATOR_SET_VERSION;
use crate::profile::StrategyProfile;

/// Hex-encoded BLAKE3 digest of the analysis inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputHash(pub String);

impl InputHash {
    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for InputHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash the bar history in order: timestamp then OHLCV, little-endian.
pub fn bars_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    update_bars(&mut hasher, bars);
    hasher.finalize().to_hex().to_string()
}

/// Length-prefixed bytes, so adjacent variable-length fields cannot run together.
fn update_framed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn update_bars(hasher: &mut blake3::Hasher, bars: &[Bar]) {
    for bar in bars {
        hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
}

pub fn input_hash(
    symbol: &str,
    bars: &[Bar],
    current_price: f64,
    profile: &StrategyProfile,
) -> InputHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&INDICATOR_SET_VERSION.to_le_bytes());
    update_framed(&mut hasher, symbol.as_bytes());
    hasher.update(&current_price.to_le_bytes());

    // Struct fields serialize in declaration order, so the JSON is canonical.
    match serde_json::to_vec(profile) {
        Ok(json) => update_framed(&mut hasher, &json),
        Err(_) => update_framed(&mut hasher, profile.id.as_bytes()),
    };

    update_bars(&mut hasher, bars);
    InputHash(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use crate::profile::test_profile;

    #[test]
    fn hashing_is_deterministic() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let profile = test_profile();
        let a = input_hash("AAPL", &bars, 102.0, &profile);
        let b = input_hash("AAPL", &bars, 102.0, &profile);
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
        assert_eq!(a.short().len(), 12);
    }

    #[test]
    fn framing_keeps_field_boundaries() {
        let framed = |parts: &[&str]| {
            let mut hasher = blake3::Hasher::new();
            for part in parts {
                update_framed(&mut hasher, part.as_bytes());
            }
            hasher.finalize()
        };
        assert_ne!(framed(&["AB", "C"]), framed(&["A", "BC"]));
        assert_ne!(framed(&["", "ABC"]), framed(&["ABC", ""]));
        assert_eq!(framed(&["A", "BC"]), framed(&["A", "BC"]));
    }

    #[test]
    fn any_input_change_changes_hash() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let profile = test_profile();
        let base = input_hash("AAPL", &bars, 102.0, &profile);

        assert_ne!(base, input_hash("MSFT", &bars, 102.0, &profile));
        assert_ne!(base, input_hash("AAPL", &bars, 102.5, &profile));

        let mut other = profile.clone();
        other.min_confidence = 60.0;
        assert_ne!(base, input_hash("AAPL", &bars, 102.0, &other));

        let mut moved = bars.clone();
        moved[1].close = 101.5;
        assert_ne!(base, input_hash("AAPL", &moved, 102.0, &profile));
    }

    #[test]
    fn bars_hash_ignores_nothing() {
        let bars = make_bars(&[100.0, 101.0]);
        let mut louder = bars.clone();
        louder[0].volume += 1.0;
        assert_ne!(bars_hash(&bars), bars_hash(&louder));
    }
}
