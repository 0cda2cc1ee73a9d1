// =============================================================================
// Signal Forge — Main Entry Point
// =============================================================================
//
// Runs one analysis over bars read from disk and prints the result as JSON.
//
// Environment:
//   SIGNAL_BARS_FILE   JSON array of bars (required)
//   SIGNAL_INTERVAL    1h / 4h / 1d or any alias (default: first bar's interval)
//   SIGNAL_CONFIG      JSON analysis config (optional, defaults on failure)
//   SIGNAL_CHART_FILE  write the daily chart overlay rows here (optional)
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signal_forge::chart_overlay;
use signal_forge::{AnalysisConfig, Analyzer, BarStore, Interval, PricePoint, PriceSeries};

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("SIGNAL_CONFIG") {
        Ok(path) => AnalysisConfig::load(&path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path, "Failed to load config, using defaults");
            AnalysisConfig::default()
        }),
        Err(_) => AnalysisConfig::default(),
    };

    // ── 2. Load bars ─────────────────────────────────────────────────────
    let bars_path = std::env::var("SIGNAL_BARS_FILE").context("SIGNAL_BARS_FILE is not set")?;
    let raw = std::fs::read_to_string(&bars_path)
        .with_context(|| format!("failed to read {bars_path}"))?;
    let bars: Vec<PricePoint> =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse bars in {bars_path}"))?;

    let interval = match std::env::var("SIGNAL_INTERVAL") {
        Ok(alias) => alias.parse::<Interval>()?,
        Err(_) => bars.first().map_or(Interval::OneDay, |b| b.interval),
    };
    info!(path = %bars_path, bars = bars.len(), %interval, "Loaded price bars");

    // ── 3. Optional chart overlay ────────────────────────────────────────
    if let Ok(chart_path) = std::env::var("SIGNAL_CHART_FILE") {
        let interval_bars: Vec<PricePoint> =
            bars.iter().filter(|b| b.interval == interval).cloned().collect();
        let series = PriceSeries::new(interval, interval_bars)?;
        let rows = chart_overlay::build(&series);
        std::fs::write(&chart_path, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("failed to write {chart_path}"))?;
        info!(path = %chart_path, rows = rows.len(), "Chart overlay written");
    }

    // ── 4. Analyze ───────────────────────────────────────────────────────
    let store = BarStore::new(config.signal_lookback.max(bars.len()));
    store.insert_many(bars);

    let analyzer = Analyzer::new(config, Arc::new(store));
    let result = analyzer.generate_signal(interval)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
