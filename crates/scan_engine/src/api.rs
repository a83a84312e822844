use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scan_core::{
    Cluster, ClusterQuery, ClusterResponse, JobId, ScanJob, ScanJobRequest, ScanResult,
};
use scan_logging::scan_trace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, EngineSettings, FailureKind};

/// The scan backend, as seen by this client.
#[async_trait::async_trait]
pub trait ScanApi: Send + Sync {
    async fn create_scan_job(&self, request: &ScanJobRequest) -> Result<JobId, ApiError>;

    async fn get_scan_job(&self, job_id: &JobId) -> Result<ScanJob, ApiError>;

    async fn get_scan_job_results(&self, job_id: &JobId) -> Result<ScanResult, ApiError>;

    /// Re-queues an existing job.
    async fn run_scan_job_now(&self, job_id: &JobId) -> Result<(), ApiError>;

    async fn get_scan_clusters(&self, query: &ClusterQuery) -> Result<Vec<Cluster>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CreatedJob {
    id: JobId,
}

#[derive(Debug, Clone)]
pub struct ReqwestScanApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestScanApi {
    pub fn new(settings: &EngineSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as an API root"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot have a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        scan_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let body = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        scan_trace!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response)
    }
}

#[async_trait::async_trait]
impl ScanApi for ReqwestScanApi {
    async fn create_scan_job(&self, request: &ScanJobRequest) -> Result<JobId, ApiError> {
        let url = self.endpoint(&["scan-jobs"])?;
        let response = self.post_json(url, request).await?;
        let created: CreatedJob = decode_json(response).await?;
        Ok(created.id)
    }

    async fn get_scan_job(&self, job_id: &JobId) -> Result<ScanJob, ApiError> {
        let url = self.endpoint(&["scan-jobs", job_id.as_str()])?;
        self.get_json(url).await
    }

    async fn get_scan_job_results(&self, job_id: &JobId) -> Result<ScanResult, ApiError> {
        let url = self.endpoint(&["scan-jobs", job_id.as_str(), "results"])?;
        self.get_json(url).await
    }

    async fn run_scan_job_now(&self, job_id: &JobId) -> Result<(), ApiError> {
        let url = self.endpoint(&["scan-jobs", job_id.as_str(), "run"])?;
        self.post_json(url, &serde_json::json!({})).await?;
        Ok(())
    }

    async fn get_scan_clusters(&self, query: &ClusterQuery) -> Result<Vec<Cluster>, ApiError> {
        let url = self.endpoint(&["scan-clusters"])?;
        let response = self.post_json(url, query).await?;
        let body: ClusterResponse = decode_json(response).await?;
        Ok(body.clusters)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = ensure_success(response)?;
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> ReqwestScanApi {
        ReqwestScanApi::new(&EngineSettings {
            base_url: base_url.to_string(),
            ..EngineSettings::default()
        })
        .expect("client")
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let api = api("http://localhost:8000/api/");
        let url = api.endpoint(&["scan-jobs", "42", "results"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/scan-jobs/42/results");

        let api = self::api("http://localhost:8000");
        let url = api.endpoint(&["scan-jobs"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/scan-jobs");
    }

    #[test]
    fn endpoint_escapes_job_ids() {
        let api = api("http://localhost:8000/api");
        let url = api.endpoint(&["scan-jobs", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/scan-jobs/a%2Fb%20c");
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let settings = EngineSettings {
            base_url: "mailto:ops@example.com".to_string(),
            ..EngineSettings::default()
        };
        let err = ReqwestScanApi::new(&settings).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);

        let settings = EngineSettings {
            base_url: "not a url".to_string(),
            ..EngineSettings::default()
        };
        assert_eq!(
            ReqwestScanApi::new(&settings).unwrap_err().kind,
            FailureKind::InvalidUrl
        );
    }
}
