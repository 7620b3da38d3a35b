//! Unit tests for symbol normalization

use rsipulse::error::RefreshError;
use rsipulse::models::normalize_symbol;

#[test]
fn equities_pass_through() {
    assert_eq!(normalize_symbol("AAPL").unwrap(), "AAPL");
    assert_eq!(normalize_symbol("MSFT").unwrap(), "MSFT");
}

#[test]
fn lowercase_and_whitespace_are_normalized() {
    assert_eq!(normalize_symbol("aapl").unwrap(), "AAPL");
    assert_eq!(normalize_symbol("  tsla  ").unwrap(), "TSLA");
}

#[test]
fn unseparated_crypto_pairs_get_a_slash() {
    assert_eq!(normalize_symbol("BTCUSD").unwrap(), "BTC/USD");
    assert_eq!(normalize_symbol("ethusd").unwrap(), "ETH/USD");
}

#[test]
fn longest_quote_suffix_wins() {
    assert_eq!(normalize_symbol("ETHUSDT").unwrap(), "ETH/USDT");
    assert_eq!(normalize_symbol("SOLUSDC").unwrap(), "SOL/USDC");
}

#[test]
fn already_separated_pairs_are_kept() {
    assert_eq!(normalize_symbol("BTC/USD").unwrap(), "BTC/USD");
    assert_eq!(normalize_symbol("btc/usd").unwrap(), "BTC/USD");
}

#[test]
fn bare_quote_currency_is_not_split() {
    // "ETH" ends with the quote "ETH" but has no base, so it stays whole.
    assert_eq!(normalize_symbol("ETH").unwrap(), "ETH");
    assert_eq!(normalize_symbol("USD").unwrap(), "USD");
}

#[test]
fn empty_identifier_is_rejected() {
    assert!(matches!(
        normalize_symbol(""),
        Err(RefreshError::InvalidSymbol(_))
    ));
    assert!(matches!(
        normalize_symbol("   "),
        Err(RefreshError::InvalidSymbol(_))
    ));
}

#[test]
fn unexpected_characters_are_rejected() {
    assert!(matches!(
        normalize_symbol("AA PL"),
        Err(RefreshError::InvalidSymbol(_))
    ));
    assert!(matches!(
        normalize_symbol("BTC$"),
        Err(RefreshError::InvalidSymbol(_))
    ));
}

#[test]
fn malformed_pairs_are_rejected() {
    assert!(matches!(
        normalize_symbol("/USD"),
        Err(RefreshError::InvalidSymbol(_))
    ));
    assert!(matches!(
        normalize_symbol("BTC/"),
        Err(RefreshError::InvalidSymbol(_))
    ));
}
