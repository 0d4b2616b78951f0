//! The instrumented worker loop.

use crate::report::ReportChannel;
use crate::workload::burn;
use schedcheck_core::{ResultRecord, Tick, WorkerConfig};
use schedcheck_platform::{PlatformError, SchedulerOps};
use std::io::Write;
use tracing::{debug, info, warn};

/// Error type for worker runs.
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Errors that end a worker run.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The requested priority could not be assigned; nothing was measured
    #[error("priority assignment failed: {0}")]
    Priority(#[source] PlatformError),

    /// The tick counter could not be read
    #[error("tick counter unavailable: {0}")]
    Clock(#[source] PlatformError),

    /// The record could not be delivered
    #[error("report write failed: {0}")]
    Report(#[source] std::io::Error),
}

/// Run one worker to completion and report on `report`.
///
/// Markers go to `markers`, one byte per write. A marker write failure is
/// logged and otherwise ignored. If priority assignment fails the worker
/// stops before timing anything and `report` is closed without a record.
pub fn run_worker<S, M, R>(
    config: &WorkerConfig,
    sched: &S,
    markers: &mut M,
    report: ReportChannel<R>,
) -> Result<ResultRecord>
where
    S: SchedulerOps,
    M: Write,
    R: Write,
{
    if let Some(cpu) = config.cpu {
        if let Err(e) = sched.pin_to_cpu(cpu) {
            warn!(tag = %config.tag, cpu, "running unpinned: {}", e);
        }
    }

    sched
        .set_priority(config.priority)
        .map_err(WorkerError::Priority)?;

    let stride = config.stride();
    let half_mark = config.half_mark();
    let marker = [config.tag.as_byte()];
    let mut emitted: u32 = 0;
    let mut half_tick: Option<Tick> = None;

    let start_tick = sched.current_tick().map_err(WorkerError::Clock)?;
    debug!(tag = %config.tag, stride, start_tick, "workload started");

    for i in 1..=config.loop_count {
        burn(config.work_size);

        if i % stride == 0 && emitted < config.marker_count {
            if let Err(e) = markers.write_all(&marker).and_then(|()| markers.flush()) {
                debug!(tag = %config.tag, "marker write failed: {}", e);
            }
            emitted += 1;

            if emitted == half_mark && half_tick.is_none() {
                half_tick = Some(sched.current_tick().map_err(WorkerError::Clock)?);
            }
        }
    }

    let priority = match sched.priority() {
        Ok(p) => p,
        Err(e) => {
            warn!(tag = %config.tag, "reporting requested priority: {}", e);
            config.priority
        }
    };
    let done_tick = sched.current_tick().map_err(WorkerError::Clock)?;

    let record = ResultRecord {
        tag: config.tag,
        priority,
        start_tick,
        half_tick: half_tick.unwrap_or(done_tick),
        done_tick,
        markers: emitted,
    };
    info!(
        tag = %record.tag,
        priority = %record.priority,
        done = record.done_tick,
        markers = record.markers,
        "workload finished"
    );

    report.send(&record).map_err(WorkerError::Report)?;
    Ok(record)
}
