use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use scan_core::ScanDraft;
use scan_engine::EngineSettings;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "scan_console.ron";

/// Console settings read from `scan_console.ron`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub cluster_limit: u32,
    pub log_level: String,
    pub log_to_file: bool,
    /// Ask for cluster insights alongside the scan.
    pub request_clusters: bool,
    /// How long to wait for a job to settle before giving up.
    pub max_wait_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            base_url: engine.base_url,
            connect_timeout_secs: engine.connect_timeout.as_secs(),
            request_timeout_secs: engine.request_timeout.as_secs(),
            poll_interval_ms: engine.poll_interval.as_millis() as u64,
            cluster_limit: engine.cluster_limit,
            log_level: "info".to_string(),
            log_to_file: false,
            request_clusters: false,
            max_wait_secs: 600,
        }
    }
}

impl ConsoleConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            // A zero period would spin against the backend.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(100)),
            cluster_limit: self.cluster_limit,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        scan_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

/// Reads console settings. A missing file yields defaults; so does a
/// malformed one, after a warning. Runs before logging is up.
pub fn load_config(path: &Path) -> ConsoleConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ConsoleConfig::default();
        }
        Err(err) => {
            eprintln!("Warning: Could not read {:?}: {}", path, err);
            return ConsoleConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Ignoring malformed {:?}: {}", path, err);
            ConsoleConfig::default()
        }
    }
}

/// Reads the wizard draft (area, policy, filters, enrichment, budget).
pub fn load_draft(path: &Path) -> anyhow::Result<ScanDraft> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading draft {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("parsing draft {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::AreaOfInterest;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILENAME));
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn partial_config_overrides_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(base_url: "https://scans.example.com/api/", poll_interval_ms: 0, log_level: "debug")"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.base_url, "https://scans.example.com/api/");
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.cluster_limit, 20);
        assert_eq!(
            config.engine_settings().poll_interval,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(base_url: 42").unwrap();
        assert_eq!(load_config(&path), ConsoleConfig::default());
    }

    #[test]
    fn unknown_log_level_means_info() {
        let config = ConsoleConfig {
            log_level: "chatty".to_string(),
            ..ConsoleConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
    }

    #[test]
    fn draft_is_read_from_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.ron");
        fs::write(
            &path,
            r#"(
                area: CenterRadius(center: (lat: 30.2672, lon: -97.7431), radius_miles: 2.0),
                policy: (order: ["esri"], max_tiles: 400),
                budget_cents: 2500,
            )"#,
        )
        .unwrap();

        let draft = load_draft(&path).unwrap();
        assert_eq!(draft.budget_cents, 2500);
        assert_eq!(draft.policy.order, vec!["esri".to_string()]);
        assert!(matches!(draft.area, AreaOfInterest::CenterRadius { .. }));
        assert!(draft.to_request().is_ok());
    }

    #[test]
    fn missing_draft_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_draft(&dir.path().join("nope.ron")).unwrap_err();
        assert!(err.to_string().contains("reading draft"));
    }
}
