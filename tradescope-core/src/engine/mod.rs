//! Analysis engine: the four core entry points.
//!
//! 1. [`score`]: indicators + patterns + projection → `CompositeSignal`
//! 2. [`build_trade_setup`]: signal + levels + ATR → `TradeSetup`
//! 3. [`gate`]: signal + setup → `GateResult`
//! 4. [`analyze`]: all of the above for one symbol, as an `AnalysisReport`
//!
//! Every call is pure: profiles and budgets are passed in, nothing is cached.

pub mod pipeline;
pub mod report;

use thiserror::Error;

pub use pipeline::{analyze, build_trade_setup, gate, score, MIN_BARS};
pub use report::{Analysis, AnalysisReport};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {available} bars, need at least {required}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid current price {0}: must be finite and positive")]
    InvalidPrice(f64),

    #[error("bar {index} is out of order: timestamps must strictly ascend")]
    UnorderedBars { index: usize },

    #[error("bar {index} is malformed (non-finite or inconsistent OHLC)")]
    MalformedBar { index: usize },
}
