//! Time-of-day windowing over trips.
//!
//! A trip is kept when its start or end falls within a tolerance window of a
//! target minute-of-day. The comparison is a plain absolute difference with
//! no wraparound across midnight: a target of minute 1 and a trip at minute
//! 1439 are not close.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::model::Trip;

/// Sentinel filter value meaning "no filter; include all trips".
pub const ANY_TIME: i32 = -1;

/// Default tolerance window in minutes, inclusive on both sides.
pub const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Minute-of-day for a timestamp. The calendar date is discarded; only the
/// hour and minute components matter.
pub fn minutes_since_midnight(ts: NaiveDateTime) -> i64 {
    (ts.hour() * 60 + ts.minute()) as i64
}

/// Returns true iff the trip's start-minute or end-minute lies within
/// `window_minutes` of `target_minute` (absolute difference, inclusive).
pub fn is_within_window(trip: &Trip, target_minute: i64, window_minutes: i64) -> bool {
    let start = minutes_since_midnight(trip.started_at);
    let end = minutes_since_midnight(trip.ended_at);

    (start - target_minute).abs() <= window_minutes
        || (end - target_minute).abs() <= window_minutes
}

/// Selects the trip subset for a target minute.
///
/// The [`ANY_TIME`] sentinel short-circuits to the full trip set, unchanged
/// in order and content, without consulting the window predicate.
pub fn filter_trips_by_minute(
    trips: &[Trip],
    target_minute: i32,
    window_minutes: i64,
) -> Vec<&Trip> {
    if target_minute == ANY_TIME {
        return trips.iter().collect();
    }

    let target = target_minute as i64;
    trips
        .iter()
        .filter(|t| is_within_window(t, target, window_minutes))
        .collect()
}

/// Renders a minute-of-day as a 12-hour clock label, e.g. `2:35 PM`.
///
/// Valid for the full 0–1439 range; out-of-range input wraps into it.
pub fn format_clock_label(minutes: i32) -> String {
    let m = minutes.rem_euclid(1440) as u32;
    let time = NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap_or(NaiveTime::MIN);
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: (u32, u32), end: (u32, u32)) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Trip {
            start_station_id: "A32000".to_string(),
            end_station_id: "B32012".to_string(),
            started_at: day.and_hms_opt(start.0, start.1, 0).unwrap(),
            ended_at: day.and_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn test_minutes_since_midnight_ignores_date() {
        let a = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 35, 59)
            .unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(14, 35, 0)
            .unwrap();
        assert_eq!(minutes_since_midnight(a), 875);
        assert_eq!(minutes_since_midnight(b), 875);
    }

    #[test]
    fn test_window_inclusive_boundary() {
        let t = trip((8, 0), (9, 30));
        // start-minute 480: exactly 60 away from 420 and 540
        assert!(is_within_window(&t, 420, 60));
        assert!(is_within_window(&t, 540, 60));
        assert!(!is_within_window(&t, 419, 60));
    }

    #[test]
    fn test_window_matches_on_end_minute_alone() {
        let t = trip((6, 0), (12, 0));
        assert!(is_within_window(&t, 720, 60));
        assert!(!is_within_window(&t, 540, 60));
    }

    #[test]
    fn test_no_wraparound_across_midnight() {
        // Start-minute 1430 vs target 30: 80 minutes apart clock-wise, but
        // the absolute-difference rule governs.
        let t = trip((23, 50), (23, 59));
        assert!(!is_within_window(&t, 30, 60));
        assert!(is_within_window(&t, 1430, 60));
    }

    #[test]
    fn test_sentinel_returns_all_trips_in_order() {
        let trips = vec![trip((8, 0), (8, 30)), trip((22, 0), (22, 45))];
        let selected = filter_trips_by_minute(&trips, ANY_TIME, 60);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].started_at, trips[0].started_at);
        assert_eq!(selected[1].started_at, trips[1].started_at);
    }

    #[test]
    fn test_filter_selects_matching_subset() {
        let trips = vec![
            trip((8, 0), (8, 30)),
            trip((12, 0), (12, 20)),
            trip((22, 0), (22, 45)),
        ];
        let selected = filter_trips_by_minute(&trips, 480, 60);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].start_station_id, "A32000");
    }

    #[test]
    fn test_format_clock_label() {
        assert_eq!(format_clock_label(0), "12:00 AM");
        assert_eq!(format_clock_label(875), "2:35 PM");
        assert_eq!(format_clock_label(720), "12:00 PM");
        assert_eq!(format_clock_label(1439), "11:59 PM");
    }
}
