use std::time::Duration;

use scan_core::{DEFAULT_CLUSTER_LIMIT, MAX_CLUSTER_LIMIT};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Root of the scan API; endpoint paths are appended to it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub cluster_limit: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2_500),
            cluster_limit: DEFAULT_CLUSTER_LIMIT,
        }
    }
}

impl EngineSettings {
    /// Cluster limit bounded to what the backend accepts.
    pub fn effective_cluster_limit(&self) -> u32 {
        self.cluster_limit.clamp(1, MAX_CLUSTER_LIMIT)
    }
}
