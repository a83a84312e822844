use serde::{Deserialize, Serialize};

use crate::area::{area_geojson, AreaOfInterest, GeoJsonPolygon};
use crate::geo::GeoPoint;

pub const DEFAULT_CLUSTER_LIMIT: u32 = 20;
pub const MAX_CLUSTER_LIMIT: u32 = 100;

/// A hotspot of lead activity reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub id: Option<String>,
    pub center: GeoPoint,
    #[serde(default)]
    pub lead_count: u32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub radius_miles: Option<f64>,
}

/// Body of the one-shot cluster request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterQuery {
    pub area_geojson: GeoJsonPolygon,
    pub limit: u32,
}

impl ClusterQuery {
    /// Query for any area variant, with `limit` bounded to `1..=MAX_CLUSTER_LIMIT`.
    pub fn for_area(area: &AreaOfInterest, limit: u32) -> Option<Self> {
        Some(Self {
            area_geojson: area_geojson(area)?,
            limit: limit.clamp(1, MAX_CLUSTER_LIMIT),
        })
    }
}

/// Response of the cluster endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterResponse {
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// Where the cluster insight panel stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClusterState {
    #[default]
    NotRequested,
    Loading,
    Error(String),
    /// An empty list is a valid answer.
    Success(Vec<Cluster>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_bounded() {
        let area = AreaOfInterest::BoundingBox {
            min_lat: 30.2,
            min_lon: -97.8,
            max_lat: 30.3,
            max_lon: -97.6,
        };
        assert_eq!(ClusterQuery::for_area(&area, 0).unwrap().limit, 1);
        assert_eq!(ClusterQuery::for_area(&area, 5_000).unwrap().limit, MAX_CLUSTER_LIMIT);
        assert_eq!(ClusterQuery::for_area(&area, 12).unwrap().limit, 12);
    }

    #[test]
    fn query_serializes_geojson_polygon() {
        let area = AreaOfInterest::Polygon {
            points: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(1.0, 1.0),
            ],
        };
        let query = ClusterQuery::for_area(&area, DEFAULT_CLUSTER_LIMIT).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "area_geojson": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "limit": 20
            })
        );
    }

    #[test]
    fn invalid_area_has_no_query() {
        let area = AreaOfInterest::Polygon { points: Vec::new() };
        assert_eq!(ClusterQuery::for_area(&area, 10), None);
    }

    #[test]
    fn missing_cluster_list_is_empty() {
        let response: ClusterResponse = serde_json::from_str("{}").unwrap();
        assert!(response.clusters.is_empty());
    }
}
