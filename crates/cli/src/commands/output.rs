//! Files written to the output directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use headline_alpha_backtest::ImportanceTable;
use headline_alpha_core::to_compact;
use headline_alpha_signals::JoinedFeatureTable;
use serde::Serialize;
use tracing::info;

pub const FEATURES_FILE: &str = "features.csv";
pub const IMPORTANCE_FILE: &str = "importance.csv";
pub const REPORT_FILE: &str = "report.json";

/// Market columns appended after the sentiment features.
const MARKET_COLUMNS: [&str; 7] = [
    "close",
    "adj_close",
    "volume",
    "volume_next_1",
    "ret_next_1",
    "direction_up_next_1",
    "volume_large_next_1",
];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes the joined table, one row per date. Undefined labels are empty cells.
///
/// Dates use the compact `YYYYMMDD` form of the extract files.
pub fn write_features_csv(path: &Path, table: &JoinedFeatureTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let header = std::iter::once("date")
        .chain(table.feature_names.iter().map(String::as_str))
        .chain(MARKET_COLUMNS);
    writer.write_record(header)?;

    for row in &table.rows {
        let market = &row.market;
        let record = std::iter::once(to_compact(row.date))
            .chain(row.features.iter().map(f64::to_string))
            .chain([
                market.bar.close.to_string(),
                market.bar.adj_close.to_string(),
                market.bar.volume.to_string(),
                optional(market.volume_next_1),
                optional(market.ret_next_1),
                optional(market.direction_up_next_1),
                optional(market.volume_large_next_1),
            ]);
        writer.write_record(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "Wrote feature table");
    Ok(())
}

/// Writes the ranked importance rows.
pub fn write_importance_csv(path: &Path, table: &ImportanceTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "Wrote importance table");
    Ok(())
}

/// Writes any serializable report as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Wrote report");
    Ok(())
}
