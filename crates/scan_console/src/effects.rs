use std::time::Duration;

use scan_core::{Effect, Msg, NoticeLevel};
use scan_engine::{EngineEvent, EngineHandle};
use scan_logging::{scan_debug, scan_error, scan_info, scan_warn};

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    submission,
                    request,
                } => {
                    scan_debug!(
                        "SubmitJob submission={} area_type={:?}",
                        submission,
                        request.area_type
                    );
                    self.engine.submit(submission, request);
                }
                Effect::RunJobNow { submission, job_id } => {
                    scan_debug!("RunJobNow submission={} job_id={}", submission, job_id);
                    self.engine.run_now(submission, job_id);
                }
                Effect::StartPolling { job_id } => self.engine.start_polling(job_id),
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::RequestClusters { request, query } => {
                    self.engine.request_clusters(request, query);
                }
                Effect::Notify { level, message } => match level {
                    NoticeLevel::Info => scan_info!("{}", message),
                    NoticeLevel::Warning => scan_warn!("{}", message),
                    NoticeLevel::Error => scan_error!("{}", message),
                },
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }

    /// Shuts the engine down, cancelling any running poll.
    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobAccepted { submission, job_id } => Msg::JobAccepted { submission, job_id },
        EngineEvent::SubmitFailed { submission, error } => Msg::SubmitFailed {
            submission,
            message: error.to_string(),
        },
        EngineEvent::JobPolled(job) => Msg::JobPolled(job),
        EngineEvent::ResultsFetched { job_id, result } => Msg::ResultsLoaded {
            job_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ClustersFetched { request, result } => Msg::ClustersLoaded {
            request,
            result: result.map_err(|err| err.to_string()),
        },
    }
}
