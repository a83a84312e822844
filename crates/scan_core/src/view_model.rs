use crate::state::ResultsState;
use crate::{AreaKind, Bounds, ClusterState, ControllerPhase, JobId, JobStatus, ScanJob};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardViewModel {
    pub phase: ControllerPhase,
    pub area_kind: Option<AreaKind>,
    /// Lat/lon envelope of the area's boundary ring.
    pub extent: Option<Bounds>,
    /// Why Launch is disabled, when the geometry is the reason.
    pub geometry_error: Option<String>,
    pub can_submit: bool,
    pub can_run_now: bool,
    pub estimated_tiles: Option<u64>,
    pub exceeds_tile_limit: bool,
    pub job_id: Option<JobId>,
    pub job: Option<JobProgressView>,
    pub results: ResultsView,
    pub clusters: ClusterState,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobProgressView {
    pub status: JobStatus,
    pub tiles_total: u64,
    pub tiles_processed: u64,
    pub tiles_cached: u64,
    pub percent: Option<f64>,
    pub budget_spent_cents: u64,
    pub budget_remaining_cents: Option<u64>,
    pub error: Option<String>,
}

impl JobProgressView {
    pub(crate) fn from_job(job: &ScanJob) -> Self {
        Self {
            status: job.status,
            tiles_total: job.tiles_total,
            tiles_processed: job.tiles_processed,
            tiles_cached: job.tiles_cached,
            percent: job.progress_percent(),
            budget_spent_cents: job.budget_spent_cents,
            budget_remaining_cents: job.remaining_budget_cents(),
            error: job.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsView {
    pub loading: bool,
    pub lead_count: usize,
    pub cached_count: usize,
    pub error: Option<String>,
}

impl ResultsView {
    pub(crate) fn from_state(state: &ResultsState) -> Self {
        match state {
            ResultsState::NotRequested => Self::default(),
            ResultsState::Loading => Self {
                loading: true,
                ..Self::default()
            },
            ResultsState::Loaded(result) => Self {
                lead_count: result.leads.len(),
                cached_count: result.cached_count(),
                ..Self::default()
            },
            ResultsState::Failed(message) => Self {
                error: Some(message.clone()),
                ..Self::default()
            },
        }
    }
}
