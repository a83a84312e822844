use scan_core::{Cluster, ClusterQuery};
use scan_logging::{scan_debug, scan_warn};

use crate::{ApiError, ScanApi};

/// One round trip to the cluster endpoint. No retries and no polling.
pub async fn request_clusters(
    api: &dyn ScanApi,
    query: &ClusterQuery,
) -> Result<Vec<Cluster>, ApiError> {
    scan_debug!(
        "Requesting up to {} clusters over {} ring points",
        query.limit,
        query.area_geojson.coordinates.first().map_or(0, Vec::len)
    );
    match api.get_scan_clusters(query).await {
        Ok(mut clusters) => {
            clusters.truncate(query.limit as usize);
            Ok(clusters)
        }
        Err(err) => {
            scan_warn!("Cluster request failed: {}", err);
            Err(err)
        }
    }
}
