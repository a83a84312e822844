//! Scan core: area geometry, scan model and the pure wizard state machine.
mod area;
mod circle;
mod clusters;
mod effect;
mod geo;
mod job;
mod msg;
mod policy;
mod state;
mod update;
mod view_model;

pub use area::{
    area_bounds, area_geojson, area_ring, build_area_payload, clamp_spacing, estimate_tile_count,
    try_build_area_payload, AreaKind, AreaOfInterest, AreaPayload, GeoJsonPolygon, GeometryError,
    DEFAULT_SPACING, MAX_RADIUS_MILES, MAX_SPACING, MIN_RADIUS_MILES, MIN_SPACING,
};
pub use circle::{circle_to_polygon, wrap_longitude, CircleRing, CIRCLE_SEGMENTS, MILES_PER_DEGREE};
pub use clusters::{
    Cluster, ClusterQuery, ClusterResponse, ClusterState, DEFAULT_CLUSTER_LIMIT, MAX_CLUSTER_LIMIT,
};
pub use effect::{Effect, NoticeLevel};
pub use geo::{
    close_ring, normalize_points, ring_bounds, round_coordinate, validate_polygon_feature, Bounds,
    GeoPoint, COORDINATE_DECIMALS,
};
pub use job::{JobId, JobStatus, Lead, ScanJob, ScanResult};
pub use msg::Msg;
pub use policy::{
    EnrichmentOptions, ProviderPolicy, ScanDraft, ScanFilters, ScanJobRequest, MAX_ZOOM, MIN_ZOOM,
};
pub use state::{ClusterRequestId, ControllerPhase, ResultsState, SubmissionId, WizardState};
pub use update::{update, update_with_limit};
pub use view_model::{JobProgressView, ResultsView, WizardViewModel};
