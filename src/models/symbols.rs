//! Asset symbol normalization.
//!
//! Every entry point (lookup, fetch, write) goes through
//! [`normalize_symbol`] so all call sites agree on one notation: uppercase,
//! crypto pairs slash-separated (`BTC/USD`), equities bare (`AAPL`).

use crate::error::RefreshError;

/// Quote currencies recognized when splitting an unseparated crypto pair.
/// Longest suffix wins, so `ETHUSDT` splits as `ETH/USDT` and not `ETHUSD/T`.
const QUOTE_CURRENCIES: [&str; 7] = ["USDT", "USDC", "USD", "EUR", "GBP", "BTC", "ETH"];

/// Normalize an asset identifier before any lookup, fetch, or write.
///
/// Rejects empty identifiers and identifiers with characters outside
/// `[A-Z0-9/.-]` after uppercasing. A symbol without a separator whose
/// suffix is a known quote currency is rewritten as `BASE/QUOTE`.
pub fn normalize_symbol(raw: &str) -> Result<String, RefreshError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(RefreshError::InvalidSymbol(
            "empty asset identifier".to_string(),
        ));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '/' | '.' | '-'))
    {
        return Err(RefreshError::InvalidSymbol(format!(
            "unexpected characters in '{}'",
            raw.trim()
        )));
    }
    if symbol.starts_with('/') || symbol.ends_with('/') {
        return Err(RefreshError::InvalidSymbol(format!(
            "malformed pair '{}'",
            symbol
        )));
    }

    if symbol.contains('/') {
        return Ok(symbol);
    }

    for quote in QUOTE_CURRENCIES {
        if let Some(base) = symbol.strip_suffix(quote) {
            if !base.is_empty() {
                return Ok(format!("{}/{}", base, quote));
            }
        }
    }

    Ok(symbol)
}
