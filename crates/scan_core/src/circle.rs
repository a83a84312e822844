//! Center + radius to polygon conversion.
//!
//! This is a planar small-circle approximation: one degree of latitude is
//! taken as a constant 69 miles and longitude is stretched by `1 / |cos(lat)|`.
//! It is accurate enough for the supported radii (up to 200 miles) and is not
//! a great-circle computation. It degrades near the poles and fails at them.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::geo::{round_coordinate, GeoPoint};

/// Approximate miles per degree of latitude.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Number of segments in the approximated circle.
pub const CIRCLE_SEGMENTS: usize = 64;

/// `|cos(lat)|` below this is treated as zero (the center is at a pole).
const POLAR_COS_EPSILON: f64 = 1e-9;

/// Closed ring approximating a circle, tagged with the radius it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleRing {
    pub radius_miles: f64,
    pub ring: Vec<GeoPoint>,
}

/// Approximates a circle of `radius_miles` around `center` with a closed
/// ring of `CIRCLE_SEGMENTS + 1` points.
///
/// Returns `None` for non-finite input, a non-positive radius, a center
/// outside the valid latitude range or a center at a pole.
pub fn circle_to_polygon(center: GeoPoint, radius_miles: f64) -> Option<CircleRing> {
    if !center.is_finite() || !radius_miles.is_finite() || radius_miles <= 0.0 {
        return None;
    }
    if center.latitude.abs() > 90.0 {
        return None;
    }

    let cos_lat = center.latitude.to_radians().cos().abs();
    if cos_lat < POLAR_COS_EPSILON {
        return None;
    }
    let lat_radius = radius_miles / MILES_PER_DEGREE;
    let lon_radius = radius_miles / (MILES_PER_DEGREE * cos_lat);
    if !lon_radius.is_finite() {
        return None;
    }

    let mut ring: Vec<GeoPoint> = (0..=CIRCLE_SEGMENTS)
        .map(|step| {
            let theta = TAU * step as f64 / CIRCLE_SEGMENTS as f64;
            let latitude = (center.latitude + lat_radius * theta.sin()).clamp(-90.0, 90.0);
            let longitude = center.longitude + lon_radius * theta.cos();
            GeoPoint::new(round_coordinate(latitude), wrap_longitude(longitude))
        })
        .collect();

    // sin(2π) is not exactly zero; pin the closing point.
    if let Some(first) = ring.first().copied() {
        if let Some(last) = ring.last_mut() {
            *last = first;
        }
    }

    Some(CircleRing {
        radius_miles,
        ring,
    })
}

/// Wraps a longitude into `(-180, 180]` and rounds it.
pub fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = ((longitude + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;
    let rounded = round_coordinate(wrapped);
    if rounded <= -180.0 {
        180.0
    } else {
        rounded
    }
}
