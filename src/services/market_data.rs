//! Indicator provider interface.

use async_trait::async_trait;

use crate::error::RefreshError;
use crate::models::IndicatorSample;

/// Abstracts the external indicator provider.
///
/// `symbol` is already normalized by the caller; implementations never
/// reformat it. A failed or timed-out call maps to
/// [`RefreshError::ProviderUnavailable`]; a response that cannot be read as
/// a numeric sample maps to [`RefreshError::InvalidSample`].
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<IndicatorSample, RefreshError>;
}
