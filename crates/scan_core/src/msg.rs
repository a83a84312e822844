use crate::{
    AreaOfInterest, Cluster, ClusterRequestId, EnrichmentOptions, JobId, ProviderPolicy,
    ScanDraft, ScanFilters, ScanJob, ScanResult, SubmissionId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Operator drew or edited the area of interest.
    AreaChanged(AreaOfInterest),
    /// Operator cleared the area.
    AreaCleared,
    PolicyChanged(ProviderPolicy),
    FiltersChanged(ScanFilters),
    EnrichmentChanged(EnrichmentOptions),
    BudgetChanged(u64),
    /// Replace every wizard input at once.
    DraftLoaded(ScanDraft),
    /// Operator clicked Launch scan.
    SubmitClicked,
    /// Operator asked to re-run the current job.
    RunNowClicked,
    /// Backend accepted a submission or run-now request.
    JobAccepted {
        submission: SubmissionId,
        job_id: JobId,
    },
    /// Backend rejected a submission or run-now request.
    SubmitFailed {
        submission: SubmissionId,
        message: String,
    },
    /// Fresh job snapshot from a poll tick.
    JobPolled(ScanJob),
    /// Result set fetched after the job reached a terminal state.
    ResultsLoaded {
        job_id: JobId,
        result: Result<ScanResult, String>,
    },
    /// Operator opened the cluster insight panel.
    ClustersRequested,
    ClustersLoaded {
        request: ClusterRequestId,
        result: Result<Vec<Cluster>, String>,
    },
    /// Operator reset the wizard.
    ResetClicked,
    /// The hosting context is being torn down.
    Disposed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
