use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier of a scan job. Accepts string or integer ids on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => JobId(text),
            RawId::Number(number) => JobId(number.to_string()),
        })
    }
}

/// Backend lifecycle status of a scan job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    BudgetExhausted,
    Failed,
    /// A status this client does not know; treated as still in progress.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::BudgetExhausted | JobStatus::Failed
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::BudgetExhausted => "budget_exhausted",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Snapshot of a scan job as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanJob {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub tiles_total: u64,
    #[serde(default)]
    pub tiles_processed: u64,
    #[serde(default)]
    pub tiles_cached: u64,
    #[serde(default)]
    pub budget_spent_cents: u64,
    #[serde(default)]
    pub budget_cents: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScanJob {
    /// Fresh snapshot in the `queued` state with no counters.
    pub fn queued(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            tiles_total: 0,
            tiles_processed: 0,
            tiles_cached: 0,
            budget_spent_cents: 0,
            budget_cents: None,
            error: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Processed tiles as a percentage; `None` until the total is known.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.tiles_total == 0 {
            return None;
        }
        let done = self.tiles_processed.min(self.tiles_total) as f64;
        Some(done * 100.0 / self.tiles_total as f64)
    }

    pub fn remaining_budget_cents(&self) -> Option<u64> {
        self.budget_cents
            .map(|budget| budget.saturating_sub(self.budget_spent_cents))
    }
}

/// One qualified lead produced by a finished scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, rename = "lon")]
    pub longitude: Option<f64>,
    pub confidence: f64,
    pub provider: String,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Result set fetched once a job reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

impl ScanResult {
    pub fn cached_count(&self) -> usize {
        self.leads.iter().filter(|lead| lead.cached).count()
    }

    /// Leads ordered by descending confidence.
    pub fn ranked(&self) -> Vec<&Lead> {
        let mut leads: Vec<&Lead> = self.leads.iter().collect();
        leads.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        leads
    }
}
