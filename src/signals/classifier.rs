//! RSI classification thresholds.

use crate::models::SignalCategory;

/// RSI above this is overbought.
pub const OVERBOUGHT: f64 = 70.0;
/// RSI below this is oversold.
pub const OVERSOLD: f64 = 30.0;

/// Map an RSI reading to a trading signal.
///
/// Strictly above 70 is SELL, strictly below 30 is BUY, everything in
/// between (boundaries included) is HOLD. Pure and total over finite
/// inputs; the engine rejects non-finite samples before calling this.
pub fn classify(indicator_value: f64) -> SignalCategory {
    if indicator_value > OVERBOUGHT {
        SignalCategory::Sell
    } else if indicator_value < OVERSOLD {
        SignalCategory::Buy
    } else {
        SignalCategory::Hold
    }
}
