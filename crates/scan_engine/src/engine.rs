use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scan_core::{ClusterQuery, ClusterRequestId, JobId, ScanJobRequest, SubmissionId};
use scan_logging::{scan_debug, scan_info, scan_warn};
use tokio::sync::mpsc as async_mpsc;

use crate::poller::{ChannelEventSink, EventSink, JobPoller};
use crate::{request_clusters, EngineError, EngineEvent, EngineSettings, ReqwestScanApi, ScanApi};

enum EngineCommand {
    Submit {
        submission: SubmissionId,
        request: Box<ScanJobRequest>,
    },
    RunNow {
        submission: SubmissionId,
        job_id: JobId,
    },
    StartPolling {
        job_id: JobId,
    },
    StopPolling,
    RequestClusters {
        request: ClusterRequestId,
        query: ClusterQuery,
    },
    Shutdown,
}

/// Background tokio runtime executing scan effects.
///
/// Dropping the handle shuts the runtime down and cancels any poll timer.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestScanApi::new(settings)?);
        Self::with_api(api, settings.poll_interval)
    }

    /// Engine over any backend implementation.
    pub fn with_api(api: Arc<dyn ScanApi>, poll_interval: Duration) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        let worker = thread::Builder::new()
            .name("scan-engine".to_string())
            .spawn(move || {
                runtime.block_on(run_commands(api, sink, poll_interval, cmd_rx));
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn submit(&self, submission: SubmissionId, request: ScanJobRequest) {
        self.send(EngineCommand::Submit {
            submission,
            request: Box::new(request),
        });
    }

    pub fn run_now(&self, submission: SubmissionId, job_id: JobId) {
        self.send(EngineCommand::RunNow { submission, job_id });
    }

    pub fn start_polling(&self, job_id: JobId) {
        self.send(EngineCommand::StartPolling { job_id });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn request_clusters(&self, request: ClusterRequestId, query: ClusterQuery) {
        self.send(EngineCommand::RequestClusters { request, query });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops polling and waits for the runtime thread to exit.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scan_warn!("Scan engine is no longer running; command dropped");
        }
    }

    fn shutdown_inner(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if worker.join().is_err() {
            scan_warn!("Scan engine thread panicked during shutdown");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

async fn run_commands(
    api: Arc<dyn ScanApi>,
    sink: Arc<dyn EventSink>,
    poll_interval: Duration,
    mut cmd_rx: async_mpsc::UnboundedReceiver<EngineCommand>,
) {
    let mut poller = JobPoller::new(api.clone(), sink.clone(), poll_interval);

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::Submit {
                submission,
                request,
            } => {
                // A new submission supersedes whatever was being polled.
                poller.stop();
                tokio::spawn(submit_job(api.clone(), sink.clone(), submission, request));
            }
            EngineCommand::RunNow { submission, job_id } => {
                poller.stop();
                tokio::spawn(run_job_now(api.clone(), sink.clone(), submission, job_id));
            }
            EngineCommand::StartPolling { job_id } => poller.start(job_id),
            EngineCommand::StopPolling => {
                poller.stop();
            }
            EngineCommand::RequestClusters { request, query } => {
                let api = api.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result = request_clusters(api.as_ref(), &query).await;
                    sink.emit(EngineEvent::ClustersFetched { request, result });
                });
            }
            EngineCommand::Shutdown => break,
        }
    }

    poller.stop();
    scan_debug!("Scan engine command loop finished");
}

async fn submit_job(
    api: Arc<dyn ScanApi>,
    sink: Arc<dyn EventSink>,
    submission: SubmissionId,
    request: Box<ScanJobRequest>,
) {
    scan_info!(
        "Submitting scan #{} area_type={:?} budget_cents={}",
        submission,
        request.area_type,
        request.budget_cents
    );
    let event = match api.create_scan_job(&request).await {
        Ok(job_id) => {
            scan_info!("Scan #{} created job {}", submission, job_id);
            EngineEvent::JobAccepted { submission, job_id }
        }
        Err(error) => {
            scan_warn!("Scan #{} was rejected: {}", submission, error);
            EngineEvent::SubmitFailed { submission, error }
        }
    };
    sink.emit(event);
}

async fn run_job_now(
    api: Arc<dyn ScanApi>,
    sink: Arc<dyn EventSink>,
    submission: SubmissionId,
    job_id: JobId,
) {
    scan_info!("Re-running job {} as #{}", job_id, submission);
    let event = match api.run_scan_job_now(&job_id).await {
        Ok(()) => EngineEvent::JobAccepted { submission, job_id },
        Err(error) => {
            scan_warn!("Re-running job {} failed: {}", job_id, error);
            EngineEvent::SubmitFailed { submission, error }
        }
    };
    sink.emit(event);
}
