pub mod bar_store;
pub mod price_series;

// Re-export the bar types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use bar_store::{BarStore, PriceSource};
pub use price_series::{PricePoint, PriceSeries};
