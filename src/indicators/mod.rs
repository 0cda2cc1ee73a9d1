// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Exact-decimal implementations of the indicators consumed by the decision
// engine. Every public function is total: insufficient data returns the
// indicator's zero sentinel instead of an error. `engine` wraps them with the
// configured parameters and the shared memoisation cache.

pub mod decimal;

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
pub mod atr;
pub mod bollinger;
pub mod stoch_rsi;
pub mod adx;
pub mod ichimoku;
pub mod supertrend;
pub mod vwap;

pub mod cache;
pub mod engine;

pub use bollinger::BollingerBands;
pub use cache::{CacheKey, CacheStats, IndicatorCache, IndicatorKind, IndicatorValue};
pub use engine::{IndicatorEngine, IndicatorSnapshot};
pub use ichimoku::IchimokuCloud;
pub use macd::MacdResult;
