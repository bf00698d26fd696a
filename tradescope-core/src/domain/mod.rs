//! Domain types for TradeScope.

pub mod bar;
pub mod direction;

pub use bar::{validate_bars, Bar, BarError};
pub use direction::Direction;

/// Symbol type alias
pub type Symbol = String;
