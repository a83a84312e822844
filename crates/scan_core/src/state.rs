use crate::area::{area_bounds, estimate_tile_count, AreaOfInterest, GeometryError};
use crate::view_model::{JobProgressView, ResultsView, WizardViewModel};
use crate::{
    ClusterState, EnrichmentOptions, JobId, JobStatus, ProviderPolicy, ScanDraft, ScanFilters,
    ScanJob, ScanJobRequest, ScanResult,
};

/// Ticket identifying one submission (or run-now) so late answers to a
/// superseded one can be told apart.
pub type SubmissionId = u64;

/// Ticket identifying one cluster request.
pub type ClusterRequestId = u64;

/// Where the scan job controller stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    BudgetExhausted,
    Failed,
}

impl ControllerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ControllerPhase::Completed | ControllerPhase::BudgetExhausted | ControllerPhase::Failed
        )
    }

    /// Terminal phase matching a terminal job status.
    pub fn from_status(status: JobStatus) -> Option<Self> {
        match status {
            JobStatus::Completed => Some(ControllerPhase::Completed),
            JobStatus::BudgetExhausted => Some(ControllerPhase::BudgetExhausted),
            JobStatus::Failed => Some(ControllerPhase::Failed),
            JobStatus::Queued | JobStatus::Running | JobStatus::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsState {
    #[default]
    NotRequested,
    Loading,
    Loaded(ScanResult),
    Failed(String),
}

/// Wizard inputs plus the controller state for the single tracked job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    area: Option<AreaOfInterest>,
    policy: ProviderPolicy,
    filters: ScanFilters,
    enrichment: EnrichmentOptions,
    budget_cents: u64,
    phase: ControllerPhase,
    submission: SubmissionId,
    job_id: Option<JobId>,
    job: Option<ScanJob>,
    results: ResultsState,
    cluster_request: ClusterRequestId,
    clusters: ClusterState,
    dirty: bool,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> WizardViewModel {
        let payload = self.payload_check();
        let estimated_tiles = payload
            .as_ref()
            .ok()
            .and_then(|request| estimate_tile_count(&request.area_payload));
        let exceeds_tile_limit = match (estimated_tiles, self.policy.normalized().tile_limit()) {
            (Some(estimate), Some(limit)) => estimate > limit,
            _ => false,
        };
        WizardViewModel {
            phase: self.phase,
            area_kind: self.area.as_ref().map(AreaOfInterest::kind),
            extent: self.area.as_ref().and_then(area_bounds),
            geometry_error: payload.as_ref().err().map(ToString::to_string),
            can_submit: payload.is_ok() && self.phase != ControllerPhase::Submitting,
            can_run_now: self.phase.is_terminal() && self.job_id.is_some(),
            estimated_tiles,
            exceeds_tile_limit,
            job_id: self.job_id.clone(),
            job: self.job.as_ref().map(JobProgressView::from_job),
            results: ResultsView::from_state(&self.results),
            clusters: self.clusters.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn area(&self) -> Option<&AreaOfInterest> {
        self.area.as_ref()
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn job(&self) -> Option<&ScanJob> {
        self.job.as_ref()
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    pub fn clusters(&self) -> &ClusterState {
        &self.clusters
    }

    pub fn current_submission(&self) -> SubmissionId {
        self.submission
    }

    pub fn current_cluster_request(&self) -> ClusterRequestId {
        self.cluster_request
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Current inputs as a draft, when an area is defined.
    pub fn draft(&self) -> Option<ScanDraft> {
        let area = self.area.clone()?;
        Some(ScanDraft {
            area,
            policy: self.policy.clone(),
            filters: self.filters.clone(),
            enrichment: self.enrichment.clone(),
            budget_cents: self.budget_cents,
        })
    }

    pub(crate) fn payload_check(&self) -> Result<ScanJobRequest, GeometryError> {
        self.draft().ok_or(GeometryError::MissingArea)?.to_request()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_area(&mut self, area: Option<AreaOfInterest>) {
        self.area = area;
        self.mark_dirty();
    }

    pub(crate) fn set_policy(&mut self, policy: ProviderPolicy) {
        self.policy = policy;
        self.mark_dirty();
    }

    pub(crate) fn set_filters(&mut self, filters: ScanFilters) {
        self.filters = filters;
        self.mark_dirty();
    }

    pub(crate) fn set_enrichment(&mut self, enrichment: EnrichmentOptions) {
        self.enrichment = enrichment;
        self.mark_dirty();
    }

    pub(crate) fn set_budget(&mut self, budget_cents: u64) {
        self.budget_cents = budget_cents;
        self.mark_dirty();
    }

    pub(crate) fn load_draft(&mut self, draft: ScanDraft) {
        self.area = Some(draft.area);
        self.policy = draft.policy;
        self.filters = draft.filters;
        self.enrichment = draft.enrichment;
        self.budget_cents = draft.budget_cents;
        self.mark_dirty();
    }

    /// Opens a new submission ticket and enters `Submitting`.
    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        self.submission += 1;
        self.phase = ControllerPhase::Submitting;
        self.job_id = None;
        self.job = None;
        self.results = ResultsState::NotRequested;
        self.mark_dirty();
        self.submission
    }

    pub(crate) fn accept_job(&mut self, job_id: JobId) {
        self.phase = ControllerPhase::Polling;
        self.job = Some(ScanJob::queued(job_id.clone()));
        self.job_id = Some(job_id);
        self.mark_dirty();
    }

    pub(crate) fn fail_submission(&mut self) {
        self.phase = ControllerPhase::Idle;
        self.job_id = None;
        self.job = None;
        self.mark_dirty();
    }

    /// Replaces the job snapshot wholesale; returns the terminal phase when
    /// the job just finished.
    pub(crate) fn apply_snapshot(&mut self, job: ScanJob) -> Option<ControllerPhase> {
        let terminal = ControllerPhase::from_status(job.status);
        self.job = Some(job);
        if let Some(phase) = terminal {
            self.phase = phase;
            self.results = ResultsState::Loading;
        }
        self.mark_dirty();
        terminal
    }

    pub(crate) fn apply_results(&mut self, result: Result<ScanResult, String>) {
        self.results = match result {
            Ok(result) => ResultsState::Loaded(result),
            Err(message) => ResultsState::Failed(message),
        };
        self.mark_dirty();
    }

    pub(crate) fn begin_cluster_request(&mut self) -> ClusterRequestId {
        self.cluster_request += 1;
        self.clusters = ClusterState::Loading;
        self.mark_dirty();
        self.cluster_request
    }

    pub(crate) fn apply_clusters(&mut self, result: Result<Vec<crate::Cluster>, String>) {
        self.clusters = match result {
            Ok(clusters) => ClusterState::Success(clusters),
            Err(message) => ClusterState::Error(message),
        };
        self.mark_dirty();
    }

    /// Back to `Idle`, invalidating every in-flight ticket.
    pub(crate) fn reset(&mut self) {
        self.submission += 1;
        self.cluster_request += 1;
        self.phase = ControllerPhase::Idle;
        self.job_id = None;
        self.job = None;
        self.results = ResultsState::NotRequested;
        self.clusters = ClusterState::NotRequested;
        self.mark_dirty();
    }
}
