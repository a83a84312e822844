use std::time::{Duration, Instant};

use scan_core::{
    update_with_limit, ClusterState, ControllerPhase, Msg, ResultsState, ScanDraft, WizardState,
};
use scan_logging::{scan_debug, scan_info};

use crate::effects::EffectRunner;
use crate::report;

const EVENT_WAIT: Duration = Duration::from_millis(50);

/// Headless wizard host: owns the state and feeds it messages.
pub struct ConsoleApp {
    state: WizardState,
    runner: EffectRunner,
    cluster_limit: u32,
}

impl ConsoleApp {
    pub fn new(runner: EffectRunner, cluster_limit: u32) -> Self {
        Self {
            state: WizardState::new(),
            runner,
            cluster_limit,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update_with_limit(state, msg, self.cluster_limit);
        if state.consume_dirty() {
            let view = state.view();
            match report::progress_line(&view) {
                Some(line) => scan_info!("{}", line),
                None => scan_debug!("Wizard is {}", report::phase_label(view.phase)),
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Loads `draft`, launches it and waits until the job and any cluster
    /// request have settled. Returns `false` when `max_wait` ran out first.
    pub fn run_scan(&mut self, draft: ScanDraft, with_clusters: bool, max_wait: Duration) -> bool {
        self.dispatch(Msg::DraftLoaded(draft));
        if with_clusters {
            self.dispatch(Msg::ClustersRequested);
        }
        self.dispatch(Msg::SubmitClicked);
        self.pump_until_settled(max_wait)
    }

    /// Re-runs the finished job and waits for it to settle again.
    pub fn rerun(&mut self, max_wait: Duration) -> bool {
        self.dispatch(Msg::RunNowClicked);
        self.pump_until_settled(max_wait)
    }

    fn pump_until_settled(&mut self, max_wait: Duration) -> bool {
        let deadline = Instant::now() + max_wait;
        while !is_settled(&self.state) {
            if Instant::now() >= deadline {
                return false;
            }
            if let Some(msg) = self.runner.next_msg(EVENT_WAIT) {
                self.dispatch(msg);
            }
        }
        true
    }

    /// Tears the wizard down: cancels polling and stops the engine.
    pub fn dispose(mut self) {
        self.dispatch(Msg::Disposed);
        self.runner.shutdown();
    }
}

/// Nothing left in flight: no pending submission, poll, result fetch or
/// cluster request.
fn is_settled(state: &WizardState) -> bool {
    let job_settled = match state.phase() {
        ControllerPhase::Idle => true,
        ControllerPhase::Submitting | ControllerPhase::Polling => false,
        ControllerPhase::Completed | ControllerPhase::BudgetExhausted | ControllerPhase::Failed => {
            !matches!(
                state.results(),
                ResultsState::Loading | ResultsState::NotRequested
            )
        }
    };
    job_settled && !matches!(state.clusters(), ClusterState::Loading)
}
