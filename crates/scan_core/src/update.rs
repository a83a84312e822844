use crate::{
    ClusterQuery, ControllerPhase, Effect, Msg, NoticeLevel, WizardState, DEFAULT_CLUSTER_LIMIT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(state: WizardState, msg: Msg) -> (WizardState, Vec<Effect>) {
    update_with_limit(state, msg, DEFAULT_CLUSTER_LIMIT)
}

/// Like [`update`] with an explicit cluster request limit.
pub fn update_with_limit(
    mut state: WizardState,
    msg: Msg,
    cluster_limit: u32,
) -> (WizardState, Vec<Effect>) {
    let effects = match msg {
        Msg::AreaChanged(area) => {
            state.set_area(Some(area));
            Vec::new()
        }
        Msg::AreaCleared => {
            state.set_area(None);
            Vec::new()
        }
        Msg::PolicyChanged(policy) => {
            state.set_policy(policy);
            Vec::new()
        }
        Msg::FiltersChanged(filters) => {
            state.set_filters(filters);
            Vec::new()
        }
        Msg::EnrichmentChanged(enrichment) => {
            state.set_enrichment(enrichment);
            Vec::new()
        }
        Msg::BudgetChanged(budget_cents) => {
            state.set_budget(budget_cents);
            Vec::new()
        }
        Msg::DraftLoaded(draft) => {
            state.load_draft(draft);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::RunNowClicked => run_now(&mut state),
        Msg::JobAccepted { submission, job_id } => {
            if state.phase() != ControllerPhase::Submitting
                || submission != state.current_submission()
            {
                return (state, Vec::new());
            }
            state.accept_job(job_id.clone());
            vec![Effect::StartPolling { job_id }]
        }
        Msg::SubmitFailed {
            submission,
            message,
        } => {
            if state.phase() != ControllerPhase::Submitting
                || submission != state.current_submission()
            {
                return (state, Vec::new());
            }
            state.fail_submission();
            vec![Effect::Notify {
                level: NoticeLevel::Error,
                message: format!("Scan could not be started: {message}"),
            }]
        }
        Msg::JobPolled(job) => {
            // Snapshots for a superseded job, or arriving after the terminal
            // tick, are dropped.
            if state.phase() != ControllerPhase::Polling || state.job_id() != Some(&job.id) {
                return (state, Vec::new());
            }
            let status = job.status;
            match state.apply_snapshot(job) {
                Some(phase) => vec![Effect::Notify {
                    level: match phase {
                        ControllerPhase::Completed => NoticeLevel::Info,
                        _ => NoticeLevel::Warning,
                    },
                    message: format!("Scan finished: {status}"),
                }],
                None => Vec::new(),
            }
        }
        Msg::ResultsLoaded { job_id, result } => {
            if !state.phase().is_terminal() || state.job_id() != Some(&job_id) {
                return (state, Vec::new());
            }
            let failure = result.as_ref().err().cloned();
            state.apply_results(result);
            match failure {
                Some(message) => vec![Effect::Notify {
                    level: NoticeLevel::Error,
                    message: format!("Scan results could not be loaded: {message}"),
                }],
                None => Vec::new(),
            }
        }
        Msg::ClustersRequested => {
            let query = state
                .area()
                .and_then(|area| ClusterQuery::for_area(area, cluster_limit));
            match query {
                Some(query) => {
                    let request = state.begin_cluster_request();
                    vec![Effect::RequestClusters { request, query }]
                }
                None => vec![Effect::Notify {
                    level: NoticeLevel::Warning,
                    message: "Define a valid area before requesting clusters".to_string(),
                }],
            }
        }
        Msg::ClustersLoaded { request, result } => {
            if request != state.current_cluster_request() {
                return (state, Vec::new());
            }
            state.apply_clusters(result);
            Vec::new()
        }
        Msg::ResetClicked | Msg::Disposed => {
            state.reset();
            vec![Effect::StopPolling]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut WizardState) -> Vec<Effect> {
    if state.phase() == ControllerPhase::Submitting {
        return Vec::new();
    }
    let request = match state.payload_check() {
        Ok(request) => request,
        Err(err) => {
            return vec![Effect::Notify {
                level: NoticeLevel::Warning,
                message: format!("Scan area is not valid: {err}"),
            }];
        }
    };

    let was_polling = state.phase() == ControllerPhase::Polling;
    let submission = state.begin_submission();
    let mut effects = Vec::with_capacity(1 + usize::from(was_polling));
    if was_polling {
        effects.push(Effect::StopPolling);
    }
    effects.push(Effect::SubmitJob {
        submission,
        request,
    });
    effects
}

fn run_now(state: &mut WizardState) -> Vec<Effect> {
    if !state.phase().is_terminal() {
        return Vec::new();
    }
    let Some(job_id) = state.job_id().cloned() else {
        return Vec::new();
    };
    let submission = state.begin_submission();
    vec![Effect::RunJobNow { submission, job_id }]
}
