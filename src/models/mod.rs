//! Shared data models spanning the engine layers.

pub mod signal;
pub mod symbols;

pub use signal::{IndicatorSample, LatestSignal, SignalCategory, SignalHistoryEntry};
pub use symbols::normalize_symbol;
