//! Parsers for the two input documents: stations JSON and trip-log CSV.

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::{Station, StationsDocument, Trip};

/// Parses a stations document.
///
/// Accepts either a bare array of station records or a GBFS-style wrapper
/// (`{"data": {"stations": [...]}}`), since public bike-share systems
/// publish both shapes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON in either shape.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    if let Ok(stations) = serde_json::from_slice::<Vec<Station>>(bytes) {
        return Ok(stations);
    }

    let doc: StationsDocument =
        serde_json::from_slice(bytes).context("stations JSON is neither an array nor a GBFS document")?;
    Ok(doc.data.stations)
}

/// Parses a trip-log CSV into [`Trip`] records.
///
/// Extra columns (ride id, bike type, ...) are ignored; any row that fails
/// to deserialize aborts the load.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();

    for result in rdr.deserialize() {
        let trip: Trip = result.context("malformed trip row")?;
        trips.push(trip);
    }

    debug!(trip_count = trips.len(), "Trip log parsed");
    Ok(trips)
}
