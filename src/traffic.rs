//! Per-station traffic aggregation.
//!
//! Counts are rebuilt from scratch over whatever trip subset the caller
//! supplies; pre-filtering by time of day is the caller's job.

use std::collections::HashMap;

use crate::model::{Station, StationTraffic, Trip};
use crate::scales::flow_ratio;

/// Recomputes arrivals, departures, and total traffic for every station
/// over the given trip subset.
///
/// One linear pass over the trips builds two frequency tables (departures
/// keyed by `start_station_id`, arrivals by `end_station_id`); each station
/// then resolves its counts by lookup. A station absent from a table had no
/// traffic of that kind — that is a zero count, not an error. Trips
/// referencing stations not in the list count toward nothing.
///
/// Pure and idempotent; no ordering guarantee among the returned rows beyond
/// matching the input station order. Consumers should join on `short_name`.
pub fn compute_station_traffic<'a, I>(stations: &[Station], trips: I) -> Vec<StationTraffic>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut departures: HashMap<&str, u64> = HashMap::new();
    let mut arrivals: HashMap<&str, u64> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| {
            let dep = departures
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            let arr = arrivals
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            let total = arr + dep;

            StationTraffic {
                short_name: station.short_name.clone(),
                name: station.name.clone(),
                lat: station.lat,
                lon: station.lon,
                arrivals: arr,
                departures: dep,
                total_traffic: total,
                flow: flow_ratio(dep, total),
                radius: 0.0,
            }
        })
        .collect()
}

/// Maximum total traffic across all rows; the radius scale's domain.
pub fn max_total_traffic(rows: &[StationTraffic]) -> u64 {
    rows.iter().map(|r| r.total_traffic).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn station(short_name: &str) -> Station {
        Station {
            short_name: short_name.to_string(),
            name: None,
            lat: 42.35,
            lon: -71.08,
        }
    }

    fn trip(start: &str, end: &str) -> Trip {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: ts,
            ended_at: ts,
        }
    }

    #[test]
    fn test_arrivals_and_departures_counted_separately() {
        let stations = vec![station("A")];
        let trips = vec![trip("A", "B"), trip("C", "A")];

        let rows = compute_station_traffic(&stations, &trips);

        assert_eq!(rows[0].departures, 1);
        assert_eq!(rows[0].arrivals, 1);
        assert_eq!(rows[0].total_traffic, 2);
    }

    #[test]
    fn test_total_is_always_sum_of_parts() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![trip("A", "B"), trip("A", "B"), trip("B", "C")];

        for row in compute_station_traffic(&stations, &trips) {
            assert_eq!(row.total_traffic, row.arrivals + row.departures);
        }
    }

    #[test]
    fn test_station_with_no_trips_gets_zero_counts() {
        let stations = vec![station("Z99999")];
        let trips = vec![trip("A", "B")];

        let rows = compute_station_traffic(&stations, &trips);

        assert_eq!(rows[0].arrivals, 0);
        assert_eq!(rows[0].departures, 0);
        assert_eq!(rows[0].total_traffic, 0);
        assert_eq!(rows[0].flow, 0.5);
    }

    #[test]
    fn test_trips_to_unknown_stations_are_ignored() {
        let stations = vec![station("A")];
        let trips = vec![trip("ghost", "phantom"), trip("A", "ghost")];

        let rows = compute_station_traffic(&stations, &trips);

        assert_eq!(rows[0].departures, 1);
        assert_eq!(rows[0].arrivals, 0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("B", "A"), trip("A", "A")];

        let first = compute_station_traffic(&stations, &trips);
        let second = compute_station_traffic(&stations, &trips);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.arrivals, b.arrivals);
            assert_eq!(a.departures, b.departures);
            assert_eq!(a.total_traffic, b.total_traffic);
        }
    }

    #[test]
    fn test_empty_trip_set() {
        let stations = vec![station("A")];
        let rows = compute_station_traffic(&stations, &Vec::new());
        assert_eq!(rows[0].total_traffic, 0);
        assert_eq!(max_total_traffic(&rows), 0);
    }

    #[test]
    fn test_max_total_traffic() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("A", "B"), trip("A", "B")];
        let rows = compute_station_traffic(&stations, &trips);
        // A: 3 departures, B: 3 arrivals
        assert_eq!(max_total_traffic(&rows), 3);
    }
}
