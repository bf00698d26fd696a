//! Directional call shared by signals, patterns and trade setups.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
    /// Explicit no-trade state ("WAIT").
    Neutral,
}

impl Direction {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Neutral)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Bullish => Self::Bearish,
            Self::Bearish => Self::Bullish,
            Self::Neutral => Self::Neutral,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "WAIT",
        };
        f.pad(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_is_not_actionable() {
        assert!(Direction::Bullish.is_actionable());
        assert!(!Direction::Neutral.is_actionable());
        assert_eq!(Direction::Bearish.opposite(), Direction::Bullish);
        assert_eq!(Direction::Neutral.to_string(), "WAIT");
    }
}
