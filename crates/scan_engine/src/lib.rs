//! Scan engine: backend client, job polling and effect execution.
mod api;
mod clusters;
mod engine;
mod poller;
mod settings;
mod types;

pub use api::{ReqwestScanApi, ScanApi};
pub use clusters::request_clusters;
pub use engine::EngineHandle;
pub use poller::{ChannelEventSink, EventSink, JobPoller, MIN_POLL_INTERVAL};
pub use settings::EngineSettings;
pub use types::{ApiError, EngineError, EngineEvent, FailureKind};
