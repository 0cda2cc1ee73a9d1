// =============================================================================
// Analysis Configuration — Immutable engine settings with atomic save
// =============================================================================
//
// Every tunable parameter of the indicator and decision engines lives here.
// The struct is built once and handed to the engines by value; nothing reads
// configuration from global state.
//
// Persistence uses an atomic tmp + rename pattern. All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{AtrMode, BandCenter};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_oversold() -> u32 {
    30
}

fn default_rsi_overbought() -> u32 {
    70
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_atr_period() -> usize {
    14
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

fn default_stochastic_period() -> usize {
    14
}

fn default_adx_period() -> usize {
    14
}

fn default_super_trend_period() -> usize {
    10
}

fn default_super_trend_multiplier() -> f64 {
    3.0
}

fn default_trend_sma_periods() -> [usize; 3] {
    [20, 50, 200]
}

fn default_ema_period() -> usize {
    12
}

fn default_swing_lookback() -> usize {
    20
}

fn default_fibonacci_extension() -> f64 {
    1.618
}

fn default_min_level_distance_pct() -> f64 {
    1.0
}

fn default_signal_lookback() -> usize {
    200
}

fn default_max_cache_entries() -> usize {
    4096
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Configuration for one indicator + decision engine pair.
///
/// Option names follow the camelCase spelling of the JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    // --- RSI -----------------------------------------------------------------
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// RSI at or below this value is a BUY opinion.
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: u32,

    /// RSI at or above this value is a SELL opinion.
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: u32,

    // --- MACD ----------------------------------------------------------------
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    // --- Volatility ----------------------------------------------------------
    #[serde(default)]
    pub atr_mode: AtrMode,

    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,

    #[serde(default)]
    pub bollinger_center: BandCenter,

    // --- Oscillators / trend strength ----------------------------------------
    #[serde(default = "default_stochastic_period")]
    pub stochastic_period: usize,

    #[serde(default = "default_adx_period")]
    pub adx_period: usize,

    #[serde(default = "default_super_trend_period")]
    pub super_trend_period: usize,

    #[serde(default = "default_super_trend_multiplier")]
    pub super_trend_multiplier: f64,

    // --- Trend stack ---------------------------------------------------------
    /// Short, medium and long SMA used for the alignment vote.
    #[serde(default = "default_trend_sma_periods")]
    pub trend_sma_periods: [usize; 3],

    /// EMA reported alongside the snapshot (informational only).
    #[serde(default = "default_ema_period")]
    pub ema_period: usize,

    // --- Decision ------------------------------------------------------------
    /// When set, the trade advice text follows the aggressive opinion.
    #[serde(default)]
    pub aggressive_signal: bool,

    /// Bars scanned for the swing low/high behind the Fibonacci target.
    #[serde(default = "default_swing_lookback")]
    pub swing_lookback: usize,

    #[serde(default = "default_fibonacci_extension")]
    pub fibonacci_extension: f64,

    /// Levels closer than this percentage of the current price are dropped.
    #[serde(default = "default_min_level_distance_pct")]
    pub min_level_distance_pct: f64,

    /// Number of bars requested from the price source per analysis.
    #[serde(default = "default_signal_lookback")]
    pub signal_lookback: usize,

    // --- Cache ---------------------------------------------------------------
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            rsi_oversold: default_rsi_oversold(),
            rsi_overbought: default_rsi_overbought(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            atr_mode: AtrMode::default(),
            atr_period: default_atr_period(),
            bollinger_period: default_bollinger_period(),
            bollinger_k: default_bollinger_k(),
            bollinger_center: BandCenter::default(),
            stochastic_period: default_stochastic_period(),
            adx_period: default_adx_period(),
            super_trend_period: default_super_trend_period(),
            super_trend_multiplier: default_super_trend_multiplier(),
            trend_sma_periods: default_trend_sma_periods(),
            ema_period: default_ema_period(),
            aggressive_signal: false,
            swing_lookback: default_swing_lookback(),
            fibonacci_extension: default_fibonacci_extension(),
            min_level_distance_pct: default_min_level_distance_pct(),
            signal_lookback: default_signal_lookback(),
            max_cache_entries: default_max_cache_entries(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_period = config.rsi_period,
            atr_mode = %config.atr_mode,
            aggressive = config.aggressive_signal,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    // --- Decimal views of the float options ----------------------------------

    pub fn bollinger_k_decimal(&self) -> Decimal {
        to_decimal(self.bollinger_k, dec!(2))
    }

    pub fn super_trend_multiplier_decimal(&self) -> Decimal {
        to_decimal(self.super_trend_multiplier, dec!(3))
    }

    pub fn fibonacci_extension_decimal(&self) -> Decimal {
        to_decimal(self.fibonacci_extension, dec!(1.618))
    }

    /// Minimum level distance as a fraction of price (1.0 % => 0.01).
    pub fn min_level_distance_fraction(&self) -> Decimal {
        to_decimal(self.min_level_distance_pct, dec!(1)) / dec!(100)
    }
}

/// Convert a config float to `Decimal`, falling back for NaN / infinities.
fn to_decimal(value: f64, fallback: Decimal) -> Decimal {
    Decimal::from_f64(value).unwrap_or(fallback)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!(cfg.rsi_oversold, 30);
        assert_eq!(cfg.rsi_overbought, 70);
        assert_eq!((cfg.macd_fast, cfg.macd_slow, cfg.macd_signal), (12, 26, 9));
        assert_eq!(cfg.atr_mode, AtrMode::Sma);
        assert!(!cfg.aggressive_signal);
        assert_eq!(cfg.bollinger_period, 20);
        assert_eq!(cfg.stochastic_period, 14);
        assert_eq!(cfg.adx_period, 14);
        assert_eq!(cfg.super_trend_period, 10);
        assert_eq!(cfg.trend_sma_periods, [20, 50, 200]);
        assert_eq!(cfg.bollinger_k_decimal(), dec!(2));
        assert_eq!(cfg.super_trend_multiplier_decimal(), dec!(3));
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "rsiPeriod": 7, "atrMode": "wilder-ema", "aggressiveSignal": true }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.rsi_period, 7);
        assert_eq!(cfg.atr_mode, AtrMode::WilderEma);
        assert!(cfg.aggressive_signal);
        assert_eq!(cfg.macd_slow, 26);
    }

    #[test]
    fn min_level_distance_is_a_fraction() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.min_level_distance_fraction(), dec!(0.01));
    }

    #[test]
    fn non_finite_floats_fall_back() {
        let cfg = AnalysisConfig {
            bollinger_k: f64::NAN,
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.bollinger_k_decimal(), dec!(2));
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = std::env::temp_dir().join(format!("signal-forge-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("analysis.json");

        let cfg = AnalysisConfig {
            rsi_period: 9,
            bollinger_k: 2.5,
            ..AnalysisConfig::default()
        };
        cfg.save(&path).unwrap();
        let loaded = AnalysisConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
