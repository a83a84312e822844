//! Coordinate and ring utilities.
//!
//! Every function here is pure: plain data in, plain data out. Coordinates
//! are rounded to six decimal places so that ring closure and distinctness
//! checks can rely on exact equality.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Number of decimal places kept for every coordinate.
pub const COORDINATE_DECIMALS: i32 = 6;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lon", alias = "longitude")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Copy with both coordinates rounded to [`COORDINATE_DECIMALS`].
    pub fn rounded(&self) -> Self {
        Self::new(round_coordinate(self.latitude), round_coordinate(self.longitude))
    }

    /// GeoJSON position order: `[lon, lat]`.
    pub fn to_position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    fn key(&self) -> (u64, u64) {
        (self.longitude.to_bits(), self.latitude.to_bits())
    }
}

/// Rounds to six decimals, folding `-0.0` into `0.0`.
pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_DECIMALS);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Drops points with a non-finite coordinate and rounds the survivors.
pub fn normalize_points(points: &[GeoPoint]) -> Vec<GeoPoint> {
    points
        .iter()
        .filter(|point| point.is_finite())
        .map(GeoPoint::rounded)
        .collect()
}

/// Appends the first point when the ring is open.
///
/// Rings with fewer than three points are returned unchanged.
pub fn close_ring(ring: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut closed = ring.to_vec();
    if let (true, Some(first), Some(last)) = (ring.len() >= 3, ring.first(), ring.last()) {
        if first != last {
            closed.push(*first);
        }
    }
    closed
}

/// Normalizes, checks and closes a polygon ring.
///
/// Returns `None` unless at least three points survive normalization and at
/// least three of them are distinct. The returned ring is always closed and
/// has at least four points.
pub fn validate_polygon_feature(ring: &[GeoPoint]) -> Option<Vec<GeoPoint>> {
    let points = normalize_points(ring);
    if points.len() < 3 || distinct_count(&points) < 3 {
        return None;
    }
    Some(close_ring(&points))
}

fn distinct_count(points: &[GeoPoint]) -> usize {
    points.iter().map(GeoPoint::key).collect::<HashSet<_>>().len()
}

/// Axis-aligned envelope of a set of points, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Envelope of the finite points of a ring; `None` when there are none.
pub fn ring_bounds(ring: &[GeoPoint]) -> Option<Bounds> {
    let mut finite = ring.iter().filter(|point| point.is_finite());
    let first = finite.next()?;
    let seed = Bounds {
        min_lat: first.latitude,
        min_lon: first.longitude,
        max_lat: first.latitude,
        max_lon: first.longitude,
    };
    Some(finite.fold(seed, |acc, point| Bounds {
        min_lat: acc.min_lat.min(point.latitude),
        min_lon: acc.min_lon.min(point.longitude),
        max_lat: acc.max_lat.max(point.latitude),
        max_lon: acc.max_lon.max(point.longitude),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn normalize_drops_non_finite_and_rounds() {
        let points = [
            p(30.123_456_78, -97.000_000_4),
            p(f64::NAN, 1.0),
            p(1.0, f64::INFINITY),
            p(-0.000_000_1, 0.5),
        ];
        let normalized = normalize_points(&points);
        assert_eq!(normalized, vec![p(30.123457, -97.0), p(0.0, 0.5)]);
        assert!(normalized[1].latitude.is_sign_positive());
    }

    #[test]
    fn normalize_of_garbage_is_empty() {
        assert!(normalize_points(&[p(f64::NAN, f64::NAN)]).is_empty());
        assert!(normalize_points(&[]).is_empty());
    }

    #[test]
    fn close_ring_appends_first_point_once() {
        let open = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)];
        let closed = close_ring(&open);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());
        assert_eq!(close_ring(&closed), closed);
    }

    #[test]
    fn close_ring_leaves_short_input_alone() {
        let two = [p(0.0, 0.0), p(1.0, 1.0)];
        assert_eq!(close_ring(&two), two.to_vec());
    }

    #[test]
    fn validate_rejects_fewer_than_three_distinct_points() {
        assert_eq!(validate_polygon_feature(&[p(0.0, 0.0), p(1.0, 1.0)]), None);
        let repeated = [p(0.0, 0.0), p(1.0, 1.0), p(0.0, 0.0), p(1.0, 1.0)];
        assert_eq!(validate_polygon_feature(&repeated), None);
        // Points that collapse after rounding are not distinct.
        let collapsed = [p(0.0, 0.0), p(0.000_000_1, 0.0), p(1.0, 1.0)];
        assert_eq!(validate_polygon_feature(&collapsed), None);
    }

    #[test]
    fn validate_closes_open_rings() {
        let ring = validate_polygon_feature(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)])
            .expect("valid triangle");
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn validate_keeps_closed_rings_as_is() {
        let closed = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(0.0, 0.0)];
        assert_eq!(validate_polygon_feature(&closed), Some(closed.to_vec()));
    }

    #[test]
    fn validate_ignores_non_finite_points() {
        let ring = [p(0.0, 0.0), p(f64::NAN, 3.0), p(0.0, 1.0), p(1.0, 1.0)];
        let valid = validate_polygon_feature(&ring).expect("three finite points");
        assert_eq!(valid.len(), 4);
    }

    #[test]
    fn bounds_cover_every_point() {
        let ring = [p(30.2, -97.8), p(30.3, -97.6), p(30.25, -97.9)];
        let bounds = ring_bounds(&ring).expect("bounds");
        assert_eq!(bounds.min_lat, 30.2);
        assert_eq!(bounds.max_lat, 30.3);
        assert_eq!(bounds.min_lon, -97.9);
        assert_eq!(bounds.max_lon, -97.6);
        assert!(ring.iter().all(|point| {
            (bounds.min_lat..=bounds.max_lat).contains(&point.latitude)
                && (bounds.min_lon..=bounds.max_lon).contains(&point.longitude)
        }));
        assert_eq!(ring_bounds(&[]), None);
    }
}
