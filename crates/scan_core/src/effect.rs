use crate::{ClusterQuery, ClusterRequestId, JobId, ScanJobRequest, SubmissionId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create a job on the backend.
    SubmitJob {
        submission: SubmissionId,
        request: ScanJobRequest,
    },
    /// Re-queue an existing job on the backend.
    RunJobNow {
        submission: SubmissionId,
        job_id: JobId,
    },
    /// Start the poll timer for a job, replacing any running timer.
    StartPolling { job_id: JobId },
    /// Cancel the poll timer, if any.
    StopPolling,
    RequestClusters {
        request: ClusterRequestId,
        query: ClusterQuery,
    },
    /// Show a message to the operator.
    Notify { level: NoticeLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}
