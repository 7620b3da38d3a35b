//! External collaborators (market-data providers).

pub mod market_data;
pub mod twelvedata;

pub use market_data::IndicatorSource;
pub use twelvedata::TwelveDataSource;
