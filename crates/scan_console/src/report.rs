//! Plain-text rendering of the wizard view for the terminal.

use scan_core::{ClusterState, ControllerPhase, ResultsState, WizardViewModel};

const MAX_LEAD_LINES: usize = 10;

pub fn phase_label(phase: ControllerPhase) -> &'static str {
    match phase {
        ControllerPhase::Idle => "idle",
        ControllerPhase::Submitting => "submitting",
        ControllerPhase::Polling => "polling",
        ControllerPhase::Completed => "completed",
        ControllerPhase::BudgetExhausted => "budget exhausted",
        ControllerPhase::Failed => "failed",
    }
}

/// One-line progress summary, if a job is being tracked.
pub fn progress_line(view: &WizardViewModel) -> Option<String> {
    let job = view.job.as_ref()?;
    let job_id = view.job_id.as_ref()?;
    let percent = job
        .percent
        .map_or_else(|| "--".to_string(), |p| format!("{p:.0}%"));
    Some(format!(
        "job {job_id} {status}: {percent} ({done}/{total} tiles, {cached} cached), spent {spent}c",
        status = job.status,
        done = job.tiles_processed,
        total = job.tiles_total,
        cached = job.tiles_cached,
        spent = job.budget_spent_cents,
    ))
}

/// Final report: outcome, progress, leads by confidence and clusters.
pub fn render(view: &WizardViewModel, results: &ResultsState) -> Vec<String> {
    let mut lines = vec![format!("Scan {}", phase_label(view.phase))];

    if let Some(error) = &view.geometry_error {
        lines.push(format!("Area not valid: {error}"));
    }
    if let Some(extent) = &view.extent {
        lines.push(format!(
            "Extent: lat {:.6}..{:.6}, lon {:.6}..{:.6}",
            extent.min_lat, extent.max_lat, extent.min_lon, extent.max_lon
        ));
    }
    if let Some(tiles) = view.estimated_tiles {
        let note = if view.exceeds_tile_limit {
            " (over the policy tile limit)"
        } else {
            ""
        };
        lines.push(format!("Estimated tiles: {tiles}{note}"));
    }
    if let Some(progress) = progress_line(view) {
        lines.push(progress);
    }
    if let Some(job) = &view.job {
        if let Some(remaining) = job.budget_remaining_cents {
            lines.push(format!("Budget remaining: {remaining}c"));
        }
        if let Some(error) = &job.error {
            lines.push(format!("Job error: {error}"));
        }
    }

    match results {
        ResultsState::NotRequested => {}
        ResultsState::Loading => lines.push("Results: loading".to_string()),
        ResultsState::Failed(message) => lines.push(format!("Results unavailable: {message}")),
        ResultsState::Loaded(result) => {
            lines.push(format!(
                "Leads: {} ({} from cache)",
                result.leads.len(),
                result.cached_count()
            ));
            for lead in result.ranked().into_iter().take(MAX_LEAD_LINES) {
                lines.push(format!(
                    "  {:.2} {} [{}]",
                    lead.confidence,
                    lead.address.as_deref().unwrap_or("(no address)"),
                    lead.provider
                ));
            }
        }
    }

    match &view.clusters {
        ClusterState::NotRequested => {}
        ClusterState::Loading => lines.push("Clusters: loading".to_string()),
        ClusterState::Error(message) => lines.push(format!("Clusters unavailable: {message}")),
        ClusterState::Success(clusters) if clusters.is_empty() => {
            lines.push("Clusters: none in this area".to_string());
        }
        ClusterState::Success(clusters) => {
            lines.push(format!("Clusters: {}", clusters.len()));
            for cluster in clusters {
                lines.push(format!(
                    "  ({:.4}, {:.4}) {} leads, score {:.2}",
                    cluster.center.latitude,
                    cluster.center.longitude,
                    cluster.lead_count,
                    cluster.score
                ));
            }
        }
    }

    lines
}
