use std::fmt;

use scan_core::{Cluster, ClusterRequestId, JobId, ScanJob, ScanResult, SubmissionId};
use thiserror::Error;

/// What the engine reports back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The backend accepted a submission or run-now request.
    JobAccepted {
        submission: SubmissionId,
        job_id: JobId,
    },
    /// The backend rejected a submission or run-now request.
    SubmitFailed {
        submission: SubmissionId,
        error: ApiError,
    },
    /// A poll tick returned a job snapshot.
    JobPolled(ScanJob),
    /// The one result fetch after a terminal status.
    ResultsFetched {
        job_id: JobId,
        result: Result<ScanResult, ApiError>,
    },
    ClustersFetched {
        request: ClusterRequestId,
        result: Result<Vec<Cluster>, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

/// Failure to bring the engine up.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("api client: {0}")]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
