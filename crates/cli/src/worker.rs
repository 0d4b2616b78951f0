//! The hidden `worker` command.

use crate::args::WorkerArgs;
use anyhow::Result;
use schedcheck_platform::OsScheduler;
use schedcheck_worker::{run_worker, ReportChannel, WorkerError};
use std::fs::File;
use std::os::fd::AsFd;
use std::process::ExitCode;
use tracing::{error, warn};

/// Exit status of a worker that could not assign its priority.
const EXIT_PRIORITY: u8 = 2;

/// Run one worker. Markers go to stderr, the record to stdout.
pub fn run(args: &WorkerArgs) -> Result<ExitCode> {
    let config = args.to_config();
    let sched = OsScheduler::new(config.tick_ms)?;

    // A raw handle on fd 1: std's stdout is line-buffered and could split
    // the record into several writes.
    let report = File::from(std::io::stdout().as_fd().try_clone_to_owned()?);
    let mut markers = std::io::stderr().lock();

    match run_worker(&config, &sched, &mut markers, ReportChannel::new(report)) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e @ WorkerError::Priority(_)) => {
            error!(tag = %config.tag, "{}", e);
            Ok(ExitCode::from(EXIT_PRIORITY))
        }
        Err(e @ WorkerError::Report(_)) => {
            warn!(tag = %config.tag, "{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            error!(tag = %config.tag, "{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
