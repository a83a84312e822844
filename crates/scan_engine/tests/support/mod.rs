#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scan_core::{
    AreaOfInterest, Cluster, ClusterQuery, GeoPoint, JobId, JobStatus, Lead, ScanDraft, ScanJob,
    ScanJobRequest, ScanResult,
};
use scan_engine::{ApiError, EngineEvent, EventSink, FailureKind, ScanApi};

/// In-memory backend that counts every call.
pub struct MockScanApi {
    script: Mutex<VecDeque<Result<JobStatus, ApiError>>>,
    fallback: JobStatus,
    create_result: Mutex<Result<JobId, ApiError>>,
    run_now_result: Mutex<Result<(), ApiError>>,
    clusters: Vec<Cluster>,
    pub create_calls: AtomicUsize,
    pub result_calls: AtomicUsize,
    pub run_now_calls: AtomicUsize,
    pub cluster_calls: AtomicUsize,
    status_calls: Mutex<HashMap<String, usize>>,
}

impl MockScanApi {
    /// Every status fetch answers `running`.
    pub fn running_forever() -> Self {
        Self::scripted(Vec::new(), JobStatus::Running)
    }

    /// Answers `script` in order, then `fallback` forever.
    pub fn scripted(script: Vec<Result<JobStatus, ApiError>>, fallback: JobStatus) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            create_result: Mutex::new(Ok(JobId::new("job-1"))),
            run_now_result: Mutex::new(Ok(())),
            clusters: Vec::new(),
            create_calls: AtomicUsize::new(0),
            result_calls: AtomicUsize::new(0),
            run_now_calls: AtomicUsize::new(0),
            cluster_calls: AtomicUsize::new(0),
            status_calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_create_result(self, result: Result<JobId, ApiError>) -> Self {
        *self.create_result.lock().unwrap() = result;
        self
    }

    pub fn with_run_now_result(self, result: Result<(), ApiError>) -> Self {
        *self.run_now_result.lock().unwrap() = result;
        self
    }

    pub fn with_clusters(mut self, clusters: Vec<Cluster>) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn status_calls_for(&self, job_id: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_status_calls(&self) -> usize {
        self.status_calls.lock().unwrap().values().sum()
    }
}

#[async_trait::async_trait]
impl ScanApi for MockScanApi {
    async fn create_scan_job(&self, _request: &ScanJobRequest) -> Result<JobId, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.create_result.lock().unwrap().clone()
    }

    async fn get_scan_job(&self, job_id: &JobId) -> Result<ScanJob, ApiError> {
        *self
            .status_calls
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_insert(0) += 1;
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.fallback));
        next.map(|status| {
            let mut job = ScanJob::queued(job_id.clone());
            job.status = status;
            job.tiles_total = 10;
            job.tiles_processed = if status.is_terminal() { 10 } else { 4 };
            job
        })
    }

    async fn get_scan_job_results(&self, _job_id: &JobId) -> Result<ScanResult, ApiError> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScanResult {
            leads: vec![Lead {
                id: Some("lead-1".to_string()),
                address: Some("101 Congress Ave".to_string()),
                latitude: Some(30.2655),
                longitude: Some(-97.7437),
                confidence: 0.87,
                provider: "aerial".to_string(),
                cached: false,
                reasons: vec!["granule loss on south slope".to_string()],
            }],
        })
    }

    async fn run_scan_job_now(&self, _job_id: &JobId) -> Result<(), ApiError> {
        self.run_now_calls.fetch_add(1, Ordering::SeqCst);
        self.run_now_result.lock().unwrap().clone()
    }

    async fn get_scan_clusters(&self, _query: &ClusterQuery) -> Result<Vec<Cluster>, ApiError> {
        self.cluster_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.clusters.clone())
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Waits until an emitted event satisfies `predicate`.
    pub async fn wait_for(&self, predicate: impl Fn(&EngineEvent) -> bool) -> bool {
        for _ in 0..400 {
            if self.events.lock().unwrap().iter().any(&predicate) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn network_error() -> ApiError {
    ApiError {
        kind: FailureKind::Network,
        message: "connection reset".to_string(),
    }
}

pub fn austin_request() -> ScanJobRequest {
    ScanDraft::new(AreaOfInterest::BoundingBox {
        min_lat: 30.20,
        min_lon: -97.82,
        max_lat: 30.33,
        max_lon: -97.64,
    })
    .to_request()
    .expect("valid area")
}

pub fn sample_cluster() -> Cluster {
    Cluster {
        id: Some("c1".to_string()),
        center: GeoPoint::new(30.25, -97.7),
        lead_count: 4,
        score: 0.75,
        radius_miles: None,
    }
}
