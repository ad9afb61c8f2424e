//! Daily market data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One raw daily bar as read from the market series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: u64,
}

impl MarketBar {
    /// Creates a bar where every price equals `close`.
    ///
    /// Handy for series where only the close matters.
    #[must_use]
    pub fn from_close(date: NaiveDate, close: Decimal, volume: u64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume,
        }
    }
}

/// A bar plus its forward-shifted fields and labels.
///
/// Derived fields come from the next trading day and are `None` on the
/// final bar of a series, which has no successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub bar: MarketBar,
    /// Next trading day's volume.
    pub volume_next_1: Option<u64>,
    /// Next trading day's adjusted close.
    pub adj_close_next_1: Option<Decimal>,
    /// Relative change from this close to the next close.
    pub ret_next_1: Option<f64>,
    /// `ret_next_1 > 0`.
    pub direction_up_next_1: Option<bool>,
    /// Next volume strictly above the configured threshold.
    pub volume_large_next_1: Option<bool>,
}

impl MarketRecord {
    /// A record with no successor information.
    #[must_use]
    pub fn terminal(bar: MarketBar) -> Self {
        Self {
            bar,
            volume_next_1: None,
            adj_close_next_1: None,
            ret_next_1: None,
            direction_up_next_1: None,
            volume_large_next_1: None,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    /// Returns true if the record carries a usable training label.
    #[must_use]
    pub fn is_labeled(&self) -> bool {
        self.direction_up_next_1.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn terminal_record_has_no_label() {
        let bar = MarketBar::from_close(
            NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
            dec!(115.81),
            142_675_200,
        );
        let record = MarketRecord::terminal(bar.clone());

        assert_eq!(record.date(), bar.date);
        assert!(!record.is_labeled());
        assert_eq!(record.ret_next_1, None);
        assert_eq!(record.volume_large_next_1, None);
    }
}
