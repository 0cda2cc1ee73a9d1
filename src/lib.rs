// =============================================================================
// Signal Forge — OHLCV indicators and multi-indicator trade signals
// =============================================================================

pub mod analysis_result;
pub mod analyzer;
pub mod chart_overlay;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use analysis_result::AnalysisResult;
pub use analyzer::Analyzer;
pub use indicators::{IndicatorEngine, IndicatorSnapshot};
pub use market_data::{BarStore, PricePoint, PriceSeries, PriceSource};
pub use runtime_config::AnalysisConfig;
pub use signals::DecisionEngine;
pub use types::{Interval, Signal};
