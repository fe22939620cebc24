//! Data types for the station traffic pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bike-share dock location, as found in a stations JSON document.
///
/// `short_name` is the identifier trips reference in their
/// `start_station_id`/`end_station_id` columns.
#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    pub short_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// One rental event from the trip log CSV.
///
/// Station ids may reference stations missing from the station list; such
/// trips simply count toward no station.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(deserialize_with = "de_trip_timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(deserialize_with = "de_trip_timestamp")]
    pub ended_at: NaiveDateTime,
}

/// A station with its traffic counts recomputed over some trip subset,
/// ready to serialize as a CSV row or into a JSON snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StationTraffic {
    pub short_name: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub arrivals: u64,
    pub departures: u64,
    /// Always `arrivals + departures`, never independently authoritative.
    pub total_traffic: u64,
    /// Quantized departures/total ratio: one of 0.0, 0.5, 1.0.
    pub flow: f64,
    /// Circle radius from the active size scale.
    pub radius: f64,
}

/// GBFS-style wrapper: `{"data": {"stations": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct StationsDocument {
    pub(crate) data: StationsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StationsData {
    pub(crate) stations: Vec<Station>,
}

/// Trip logs write local wall-clock timestamps, sometimes with a fractional
/// second component.
fn de_trip_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_trip_timestamp(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_trip_timestamp(s: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
}
