//! Cancellable poll timer for a single scan job.
//!
//! A [`JobPoller`] owns at most one running poll task. Starting a new poll
//! cancels the previous one first, and dropping the poller cancels whatever
//! is running, so a disposed host never keeps calling the backend.
//!
//! Each tick fetches the job snapshot. Fetch errors are treated as transient:
//! they are logged and the next tick tries again. When a snapshot reports a
//! terminal status the task stops ticking, fetches the result set exactly
//! once and exits.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use scan_core::JobId;
use scan_logging::{scan_debug, scan_error, scan_info, scan_warn};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ScanApi};

/// Shortest accepted poll period; shorter ones, zero included, are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

struct ActivePoll {
    job_id: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct JobPoller {
    api: Arc<dyn ScanApi>,
    sink: Arc<dyn EventSink>,
    interval: Duration,
    active: Option<ActivePoll>,
}

impl JobPoller {
    pub fn new(api: Arc<dyn ScanApi>, sink: Arc<dyn EventSink>, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            scan_warn!(
                "Poll interval of {} ms raised to {} ms",
                interval.as_millis(),
                MIN_POLL_INTERVAL.as_millis()
            );
        }
        Self {
            api,
            sink,
            interval: interval.max(MIN_POLL_INTERVAL),
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling `job_id`, cancelling any poll already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, job_id: JobId) {
        self.stop();

        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_job(
            self.api.clone(),
            self.sink.clone(),
            job_id.clone(),
            self.interval,
            cancel.clone(),
        ));
        scan_debug!(
            "Polling job {} every {} ms",
            job_id,
            self.interval.as_millis()
        );
        self.active = Some(ActivePoll {
            job_id,
            cancel,
            task,
        });
    }

    /// Cancels the current poll. Returns `false` when no task was still running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.cancel.cancel();
                scan_debug!("Stopped polling job {}", active.job_id);
                !active.task.is_finished()
            }
            None => false,
        }
    }

    /// Whether a poll task is still ticking.
    pub fn is_polling(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.active.as_ref().map(|active| &active.job_id)
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_job(
    api: Arc<dyn ScanApi>,
    sink: Arc<dyn EventSink>,
    job_id: JobId,
    period: Duration,
    cancel: CancellationToken,
) {
    // First fetch happens one full period after start.
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            fetched = api.get_scan_job(&job_id) => fetched,
        };

        let job = match fetched {
            Ok(job) => job,
            Err(err) => {
                scan_warn!("Polling job {} failed, retrying next tick: {}", job_id, err);
                continue;
            }
        };

        let status = job.status;
        scan_debug!(
            "Job {} is {} ({}/{} tiles)",
            job_id,
            status,
            job.tiles_processed,
            job.tiles_total
        );
        sink.emit(EngineEvent::JobPolled(job));
        if !status.is_terminal() {
            continue;
        }

        scan_info!("Job {} reached terminal status {}", job_id, status);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = api.get_scan_job_results(&job_id) => result,
        };
        match &result {
            Ok(results) => scan_info!("Job {} produced {} leads", job_id, results.leads.len()),
            Err(err) => scan_error!("Fetching results for job {} failed: {}", job_id, err),
        }
        sink.emit(EngineEvent::ResultsFetched { job_id, result });
        return;
    }
}
