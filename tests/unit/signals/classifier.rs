//! Unit tests for RSI classification

use rsipulse::models::SignalCategory;
use rsipulse::signals::classify;

#[test]
fn rsi_above_70_is_sell() {
    assert_eq!(classify(70.01), SignalCategory::Sell);
    assert_eq!(classify(75.3), SignalCategory::Sell);
    assert_eq!(classify(100.0), SignalCategory::Sell);
}

#[test]
fn rsi_below_30_is_buy() {
    assert_eq!(classify(29.99), SignalCategory::Buy);
    assert_eq!(classify(15.0), SignalCategory::Buy);
    assert_eq!(classify(0.0), SignalCategory::Buy);
}

#[test]
fn rsi_between_thresholds_is_hold() {
    assert_eq!(classify(50.0), SignalCategory::Hold);
    assert_eq!(classify(30.01), SignalCategory::Hold);
    assert_eq!(classify(69.99), SignalCategory::Hold);
}

#[test]
fn boundary_values_resolve_to_hold() {
    assert_eq!(classify(70.0), SignalCategory::Hold);
    assert_eq!(classify(30.0), SignalCategory::Hold);
}
