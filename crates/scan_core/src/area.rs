//! Area-of-interest definitions and the backend geometry payload built from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::circle::{circle_to_polygon, CircleRing, MILES_PER_DEGREE};
use crate::geo::{
    close_ring, ring_bounds, round_coordinate, validate_polygon_feature, Bounds, GeoPoint,
};

pub const MIN_SPACING: f64 = 0.005;
pub const MAX_SPACING: f64 = 0.1;
pub const DEFAULT_SPACING: f64 = 0.02;
pub const MIN_RADIUS_MILES: f64 = 0.5;
pub const MAX_RADIUS_MILES: f64 = 200.0;

/// Absorbs float noise so an exact multiple of spacing is not rounded up.
const CELL_EPSILON: f64 = 1e-9;

/// The footprint the operator selected. Exactly one shape at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AreaOfInterest {
    Polygon {
        points: Vec<GeoPoint>,
    },
    BoundingBox {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },
    CenterRadius {
        center: GeoPoint,
        radius_miles: f64,
    },
}

impl AreaOfInterest {
    pub fn kind(&self) -> AreaKind {
        match self {
            AreaOfInterest::Polygon { .. } => AreaKind::Polygon,
            AreaOfInterest::BoundingBox { .. } => AreaKind::BoundingBox,
            AreaOfInterest::CenterRadius { .. } => AreaKind::CenterRadius,
        }
    }
}

/// Wire discriminator sent as `area_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaKind {
    #[serde(rename = "polygon")]
    Polygon,
    #[serde(rename = "bbox")]
    BoundingBox,
    #[serde(rename = "center_radius")]
    CenterRadius,
}

/// Why an area cannot be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("no area of interest has been defined")]
    MissingArea,
    #[error("a polygon needs at least three distinct points")]
    TooFewPoints,
    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,
    #[error("the bounding box minimum must be below its maximum")]
    InvertedBounds,
    #[error("the radius must be a finite number of miles")]
    InvalidRadius,
    #[error("the center must lie within ±90° latitude and ±180° longitude")]
    CenterOutOfRange,
    #[error("the circle cannot be centered on a pole")]
    PolarCenter,
}

/// Geometry in the shape the backend expects for each area type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AreaPayload {
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
        spacing: f64,
    },
    BoundingBox {
        bbox: [f64; 4],
        spacing: f64,
    },
    CenterRadius {
        center: GeoPoint,
        radius: f64,
        radius_miles: f64,
        spacing: f64,
    },
}

impl AreaPayload {
    pub fn spacing(&self) -> f64 {
        match self {
            AreaPayload::Polygon { spacing, .. }
            | AreaPayload::BoundingBox { spacing, .. }
            | AreaPayload::CenterRadius { spacing, .. } => *spacing,
        }
    }

    pub fn kind(&self) -> AreaKind {
        match self {
            AreaPayload::Polygon { .. } => AreaKind::Polygon,
            AreaPayload::BoundingBox { .. } => AreaKind::BoundingBox,
            AreaPayload::CenterRadius { .. } => AreaKind::CenterRadius,
        }
    }

    /// Envelope of the payload geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            AreaPayload::Polygon { coordinates, .. } => {
                let ring: Vec<GeoPoint> = coordinates
                    .iter()
                    .flatten()
                    .map(|[lon, lat]| GeoPoint::new(*lat, *lon))
                    .collect();
                ring_bounds(&ring)
            }
            AreaPayload::BoundingBox { bbox, .. } => Some(Bounds {
                min_lon: bbox[0],
                min_lat: bbox[1],
                max_lon: bbox[2],
                max_lat: bbox[3],
            }),
            AreaPayload::CenterRadius {
                center,
                radius_miles,
                ..
            } => circle_to_polygon(*center, *radius_miles)
                .and_then(|circle| ring_bounds(&circle.ring)),
        }
    }
}

/// Clamps a requested spacing into the supported range; missing or
/// non-finite values fall back to [`DEFAULT_SPACING`].
pub fn clamp_spacing(spacing: Option<f64>) -> f64 {
    match spacing {
        Some(value) if value.is_finite() => value.clamp(MIN_SPACING, MAX_SPACING),
        _ => DEFAULT_SPACING,
    }
}

/// Builds the backend payload, or `None` when the area is invalid.
pub fn build_area_payload(area: &AreaOfInterest, spacing: Option<f64>) -> Option<AreaPayload> {
    try_build_area_payload(area, spacing).ok()
}

/// Like [`build_area_payload`] but names the failing precondition.
pub fn try_build_area_payload(
    area: &AreaOfInterest,
    spacing: Option<f64>,
) -> Result<AreaPayload, GeometryError> {
    let spacing = clamp_spacing(spacing);
    match area {
        AreaOfInterest::Polygon { points } => {
            let ring = validate_polygon_feature(points).ok_or(GeometryError::TooFewPoints)?;
            Ok(AreaPayload::Polygon {
                coordinates: vec![ring.iter().map(GeoPoint::to_position).collect()],
                spacing,
            })
        }
        AreaOfInterest::BoundingBox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        } => {
            let edges = [*min_lon, *min_lat, *max_lon, *max_lat];
            if edges.iter().any(|edge| !edge.is_finite()) {
                return Err(GeometryError::NonFiniteCoordinate);
            }
            if min_lon >= max_lon || min_lat >= max_lat {
                return Err(GeometryError::InvertedBounds);
            }
            Ok(AreaPayload::BoundingBox {
                bbox: edges.map(round_coordinate),
                spacing,
            })
        }
        AreaOfInterest::CenterRadius {
            center,
            radius_miles,
        } => {
            let (radius_miles, _) = checked_circle(center, *radius_miles)?;
            let radius = radius_miles / MILES_PER_DEGREE;
            // Never coarser than a quarter of the radius.
            let spacing = spacing.min(radius / 4.0).max(MIN_SPACING);
            Ok(AreaPayload::CenterRadius {
                center: center.rounded(),
                radius,
                radius_miles,
                spacing,
            })
        }
    }
}

/// Validates a center-radius area and approximates it, returning the
/// clamped radius with the ring. Submission and the cluster query share it.
fn checked_circle(
    center: &GeoPoint,
    radius_miles: f64,
) -> Result<(f64, CircleRing), GeometryError> {
    if !center.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    if !radius_miles.is_finite() {
        return Err(GeometryError::InvalidRadius);
    }
    if !(-90.0..=90.0).contains(&center.latitude) || !(-180.0..=180.0).contains(&center.longitude)
    {
        return Err(GeometryError::CenterOutOfRange);
    }
    let radius_miles = radius_miles.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES);
    let circle = circle_to_polygon(*center, radius_miles).ok_or(GeometryError::PolarCenter)?;
    Ok((radius_miles, circle))
}

/// A single GeoJSON polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeoJsonPolygon {
    pub fn from_ring(ring: &[GeoPoint]) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates: vec![ring.iter().map(GeoPoint::to_position).collect()],
        }
    }
}

/// Closed boundary ring of any area variant.
///
/// Bounding boxes become their four corners; circles go through
/// [`circle_to_polygon`] with the clamped radius.
pub fn area_ring(area: &AreaOfInterest) -> Result<Vec<GeoPoint>, GeometryError> {
    match area {
        AreaOfInterest::Polygon { points } => {
            validate_polygon_feature(points).ok_or(GeometryError::TooFewPoints)
        }
        AreaOfInterest::BoundingBox { .. } => match try_build_area_payload(area, None)? {
            AreaPayload::BoundingBox {
                bbox: [min_lon, min_lat, max_lon, max_lat],
                ..
            } => Ok(close_ring(&[
                GeoPoint::new(min_lat, min_lon),
                GeoPoint::new(min_lat, max_lon),
                GeoPoint::new(max_lat, max_lon),
                GeoPoint::new(max_lat, min_lon),
            ])),
            _ => Err(GeometryError::InvertedBounds),
        },
        AreaOfInterest::CenterRadius {
            center,
            radius_miles,
        } => checked_circle(center, *radius_miles).map(|(_, circle)| circle.ring),
    }
}

/// GeoJSON polygon for the cluster endpoint; `None` when the area is invalid.
pub fn area_geojson(area: &AreaOfInterest) -> Option<GeoJsonPolygon> {
    area_ring(area).ok().map(|ring| GeoJsonPolygon::from_ring(&ring))
}

/// Envelope of the area's boundary ring.
pub fn area_bounds(area: &AreaOfInterest) -> Option<Bounds> {
    area_ring(area).ok().and_then(|ring| ring_bounds(&ring))
}

/// Rough number of imagery tiles the backend will lay out over the payload.
///
/// Counts grid cells of `spacing` degrees over the envelope; rings that wrap
/// across the antimeridian are overestimated.
pub fn estimate_tile_count(payload: &AreaPayload) -> Option<u64> {
    let bounds = payload.bounds()?;
    let spacing = payload.spacing();
    if spacing <= 0.0 {
        return None;
    }
    let cells = |extent: f64| (extent / spacing - CELL_EPSILON).ceil().max(1.0);
    let columns = cells(bounds.width());
    let rows = cells(bounds.height());
    Some((columns * rows) as u64)
}
