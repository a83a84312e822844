mod app;
mod config;
mod effects;
mod logging;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context};
use scan_engine::EngineHandle;
use scan_logging::scan_warn;

use app::ConsoleApp;
use effects::EffectRunner;
use logging::LogDestination;

const USAGE: &str = "usage: scan_console <draft.ron> [--rerun]";

fn main() -> anyhow::Result<()> {
    let mut draft_path: Option<PathBuf> = None;
    let mut rerun = false;
    for arg in std::env::args_os().skip(1) {
        if arg == "--rerun" {
            rerun = true;
        } else if draft_path.is_none() {
            draft_path = Some(PathBuf::from(arg));
        } else {
            bail!(USAGE);
        }
    }
    let Some(draft_path) = draft_path else {
        bail!(USAGE);
    };

    let config = config::load_config(std::path::Path::new(config::CONFIG_FILENAME));
    let destination = if config.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, config.log_level());

    let draft = config::load_draft(&draft_path)?;
    let settings = config.engine_settings();
    let engine = EngineHandle::new(&settings).context("starting scan engine")?;
    let mut app = ConsoleApp::new(EffectRunner::new(engine), settings.effective_cluster_limit());

    let mut settled = app.run_scan(draft, config.request_clusters, config.max_wait());
    if settled && rerun && app.state().view().can_run_now {
        settled = app.rerun(config.max_wait());
    }
    if !settled {
        scan_warn!(
            "Gave up waiting after {} s; the job keeps running on the backend",
            config.max_wait_secs
        );
    }

    let state = app.state();
    for line in report::render(&state.view(), state.results()) {
        println!("{line}");
    }

    app.dispose();
    Ok(())
}
