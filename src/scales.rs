//! Numeric mappings consumed by the map renderer.

use crate::model::StationTraffic;

/// Radius range when no time filter is active.
const UNFILTERED_RANGE: (f64, f64) = (0.0, 25.0);
/// Radius range when a specific minute is selected; larger, because the
/// filtered subset carries far less traffic per station.
const FILTERED_RANGE: (f64, f64) = (3.0, 50.0);

/// Square-root scale from total traffic to a circle radius.
///
/// The domain runs from 0 to the maximum total traffic in the current
/// dataset; the range preset depends only on whether a time filter is
/// active, not on the data.
#[derive(Debug, Clone, Copy)]
pub struct RadiusScale {
    domain_max: u64,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(domain_max: u64, filter_active: bool) -> Self {
        let range = if filter_active {
            FILTERED_RANGE
        } else {
            UNFILTERED_RANGE
        };
        Self { domain_max, range }
    }

    /// Radius for a total-traffic value. A zero domain maps everything to
    /// the low end of the range.
    pub fn radius(&self, total_traffic: u64) -> f64 {
        let (lo, hi) = self.range;
        if self.domain_max == 0 {
            return lo;
        }
        let t = (total_traffic as f64 / self.domain_max as f64).clamp(0.0, 1.0);
        lo + (hi - lo) * t.sqrt()
    }

    /// Fills in the `radius` field for every row.
    pub fn apply(&self, rows: &mut [StationTraffic]) {
        for row in rows {
            row.radius = self.radius(row.total_traffic);
        }
    }
}

/// Departure share of a station's traffic, quantized into three buckets.
///
/// | Ratio         | Output |
/// |---------------|--------|
/// | [0, 1/3)      | 0.0    |
/// | [1/3, 2/3)    | 0.5    |
/// | [2/3, 1]      | 1.0    |
///
/// A station with no traffic is defined as perfectly balanced: 0.5.
pub fn flow_ratio(departures: u64, total_traffic: u64) -> f64 {
    if total_traffic == 0 {
        return 0.5;
    }
    let ratio = (departures as f64 / total_traffic as f64).clamp(0.0, 1.0);
    let bucket = (ratio * 3.0).floor().min(2.0);
    bucket * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_ratio_buckets() {
        assert_eq!(flow_ratio(3, 3), 1.0);
        assert_eq!(flow_ratio(0, 4), 0.0);
        assert_eq!(flow_ratio(2, 4), 0.5);
        assert_eq!(flow_ratio(1, 4), 0.0);
        assert_eq!(flow_ratio(3, 4), 1.0);
    }

    #[test]
    fn test_flow_ratio_zero_traffic_is_balanced() {
        assert_eq!(flow_ratio(0, 0), 0.5);
    }

    #[test]
    fn test_flow_ratio_bucket_boundaries() {
        // Exactly 1/3 lands in the middle bucket, exactly 2/3 in the top.
        assert_eq!(flow_ratio(1, 3), 0.5);
        assert_eq!(flow_ratio(2, 3), 1.0);
    }

    #[test]
    fn test_radius_scale_endpoints() {
        let scale = RadiusScale::new(100, false);
        assert_eq!(scale.radius(0), 0.0);
        assert_eq!(scale.radius(100), 25.0);

        let filtered = RadiusScale::new(100, true);
        assert_eq!(filtered.radius(0), 3.0);
        assert_eq!(filtered.radius(100), 50.0);
    }

    #[test]
    fn test_radius_scale_is_sqrt_shaped() {
        let scale = RadiusScale::new(100, false);
        // 25% of the domain maps to half the range under a sqrt scale
        assert!((scale.radius(25) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_radius_scale_zero_domain() {
        let scale = RadiusScale::new(0, true);
        assert_eq!(scale.radius(0), 3.0);
        assert_eq!(scale.radius(42), 3.0);
    }
}
