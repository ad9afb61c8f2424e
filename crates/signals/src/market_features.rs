//! Forward-looking market labels.
//!
//! Every label describes the *next* trading day relative to the current
//! one, so a row's text features can only be paired with information that
//! arrives after them.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use headline_alpha_data::{MarketBar, MarketRecord};

/// Default next-day volume threshold for `volume_large_next_1`.
pub const DEFAULT_VOLUME_LARGE_THRESHOLD: u64 = 75_000_000;

/// Computes shifted fields and binary targets from a daily series.
#[derive(Debug, Clone, Copy)]
pub struct MarketFeatureBuilder {
    volume_large_threshold: u64,
}

impl Default for MarketFeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_LARGE_THRESHOLD)
    }
}

impl MarketFeatureBuilder {
    #[must_use]
    pub fn new(volume_large_threshold: u64) -> Self {
        Self {
            volume_large_threshold,
        }
    }

    /// Builds one record per distinct trading day, in date order.
    ///
    /// The input is sorted first; a repeated date keeps its first bar. The
    /// last record has no successor, so all its derived fields are `None`.
    #[must_use]
    pub fn build(&self, series: &[MarketBar]) -> Vec<MarketRecord> {
        let mut bars = series.to_vec();
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() < before {
            warn!(
                duplicates = before - bars.len(),
                "Dropped repeated market dates, keeping the first bar of each"
            );
        }

        let mut records: Vec<MarketRecord> = bars
            .windows(2)
            .map(|pair| self.shifted(&pair[0], &pair[1]))
            .collect();
        if let Some(last) = bars.last() {
            records.push(MarketRecord::terminal(last.clone()));
        }

        info!(
            bars = records.len(),
            labeled = records.iter().filter(|r| r.is_labeled()).count(),
            volume_large_threshold = self.volume_large_threshold,
            "Built market labels"
        );
        records
    }

    fn shifted(&self, current: &MarketBar, next: &MarketBar) -> MarketRecord {
        let ret_next_1 = forward_return(current.close, next.close);

        MarketRecord {
            bar: current.clone(),
            volume_next_1: Some(next.volume),
            adj_close_next_1: Some(next.adj_close),
            ret_next_1,
            direction_up_next_1: ret_next_1.map(|r| r > 0.0),
            volume_large_next_1: Some(next.volume > self.volume_large_threshold),
        }
    }
}

/// `(next - current) / current`, undefined for a zero close.
fn forward_return(current: Decimal, next: Decimal) -> Option<f64> {
    if current.is_zero() {
        return None;
    }
    ((next - current) / current).to_f64()
}
