//! Output formatting and persistence for recomputed station traffic.
//!
//! Supports CSV append of per-station rows and JSON traffic snapshots.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::StationTraffic;
use crate::timefilter::{self, ANY_TIME};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One full recomputation result: every station's counts and scale values
/// for a given filter setting, as consumed by the map frontend.
#[derive(Debug, Serialize)]
pub struct TrafficSnapshot {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    /// The minute-of-day filter in effect, or -1 for "no filter".
    pub filter_minute: i32,
    /// Display label for the filter, e.g. `2:35 PM` or `any time`.
    pub label: String,
    pub window_minutes: i64,
    /// Domain maximum the radius scale was built with.
    pub max_total_traffic: u64,
    pub stations: Vec<StationTraffic>,
}

impl TrafficSnapshot {
    pub fn new(
        filter_minute: i32,
        window_minutes: i64,
        max_total_traffic: u64,
        stations: Vec<StationTraffic>,
    ) -> Self {
        let label = if filter_minute == ANY_TIME {
            "any time".to_string()
        } else {
            timefilter::format_clock_label(filter_minute)
        };

        TrafficSnapshot {
            schema_version: 1,
            generated_at: Utc::now(),
            filter_minute,
            label,
            window_minutes,
            max_total_traffic,
            stations,
        }
    }
}

/// Appends station rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, rows: &[StationTraffic]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a snapshot as pretty-printed JSON to disk.
pub fn write_snapshot(path: &str, snapshot: &TrafficSnapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    std::fs::write(path, json)?;
    debug!(path, stations = snapshot.stations.len(), "Snapshot written");
    Ok(())
}
