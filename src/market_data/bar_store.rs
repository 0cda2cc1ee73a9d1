use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::price_series::PricePoint;
use crate::types::Interval;

// ---------------------------------------------------------------------------
// PriceSource -- collaborator contract
// ---------------------------------------------------------------------------

/// Supplies the most recent bars for an interval.
///
/// Implementations must return bars ordered oldest to newest; the analyzer
/// validates the order and refuses to re-sort.
pub trait PriceSource: Send + Sync {
    fn latest_bars(&self, interval: Interval, limit: usize) -> Result<Vec<PricePoint>>;
}

// ---------------------------------------------------------------------------
// BarStore -- thread-safe keyed bar buffer per interval
// ---------------------------------------------------------------------------

/// In-memory store that keeps the most recent bars per interval, ordered by
/// timestamp, with at most one bar per timestamp.
pub struct BarStore {
    buffers: RwLock<HashMap<Interval, VecDeque<PricePoint>>>,
    max_bars: usize,
}

impl BarStore {
    /// Create a store that retains at most `max_bars` bars per interval.
    pub fn new(max_bars: usize) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            max_bars,
        }
    }

    /// Insert a bar at its timestamp position.
    ///
    /// Returns `false` when a bar with the same timestamp already exists for
    /// that interval; the stored bar is left untouched.
    pub fn insert(&self, bar: PricePoint) -> bool {
        let mut map = self.buffers.write();
        let ring = map
            .entry(bar.interval)
            .or_insert_with(|| VecDeque::with_capacity(self.max_bars.min(1024)));

        let position = match ring.binary_search_by_key(&bar.timestamp, |b| b.timestamp) {
            Ok(_) => {
                debug!(interval = %bar.interval, timestamp = %bar.timestamp, "duplicate bar skipped");
                return false;
            }
            Err(position) => position,
        };
        ring.insert(position, bar);

        // Trim oldest to stay within budget.
        while ring.len() > self.max_bars {
            ring.pop_front();
        }
        true
    }

    /// Insert many bars, returning how many were new.
    pub fn insert_many(&self, bars: impl IntoIterator<Item = PricePoint>) -> usize {
        let mut saved = 0;
        let mut interval = None;
        for bar in bars {
            interval = Some(bar.interval);
            if self.insert(bar) {
                saved += 1;
            }
        }
        if let Some(interval) = interval {
            info!(%interval, saved, "stored new price bars");
        }
        saved
    }

    /// The most recent `count` bars for `interval`, oldest first.
    pub fn latest(&self, interval: Interval, count: usize) -> Vec<PricePoint> {
        let map = self.buffers.read();
        match map.get(&interval) {
            Some(ring) => {
                let start = ring.len().saturating_sub(count);
                ring.iter().skip(start).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Number of bars stored for `interval`.
    pub fn count(&self, interval: Interval) -> usize {
        let map = self.buffers.read();
        map.get(&interval).map_or(0, VecDeque::len)
    }
}

impl PriceSource for BarStore {
    fn latest_bars(&self, interval: Interval, limit: usize) -> Result<Vec<PricePoint>> {
        Ok(self.latest(interval, limit))
    }
}
