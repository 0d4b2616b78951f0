//! The harness run: launch, collect, reap, verify.

use crate::channel::read_record;
use crate::config::RunConfig;
use crate::error::Result;
use crate::launcher::{LaunchedWorker, WorkerLauncher, WorkerProcess};
use crate::report::{RunReport, WorkerReport};
use schedcheck_core::{RunId, Tag};
use schedcheck_verify::{verify, Observation};
use tracing::{debug, error, info, warn};

/// Runs one priority-ordering experiment.
///
/// ```text
/// launch all → read each channel in turn → close channels → wait all → verify
/// ```
///
/// There are no timeouts: a worker that never exits and never closes its
/// channel blocks the run.
pub struct Harness<L: WorkerLauncher> {
    launcher: L,
    config: RunConfig,
}

impl<L: WorkerLauncher> Harness<L> {
    /// Create a harness with the default configuration.
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            config: RunConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the experiment.
    ///
    /// Only setup failures are errors. If a launch fails, the workers
    /// already started are still reaped before the error is returned.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;

        let run_id = RunId::new();
        let cpu = self.config.pin.resolve();
        let configs = self.config.worker_configs(cpu);
        info!(%run_id, workers = configs.len(), ?cpu, "starting run");

        let started_at = chrono::Utc::now();
        let mut launched: Vec<LaunchedWorker> = Vec::with_capacity(configs.len());
        for config in &configs {
            match self.launcher.launch(config).await {
                Ok(worker) => launched.push(worker),
                Err(e) => {
                    error!(tag = %config.tag, "launch failed: {}", e);
                    let processes = launched.into_iter().map(|w| (w.tag, w.process)).collect();
                    reap(processes).await;
                    return Err(e);
                }
            }
        }

        let mut outcomes = Vec::with_capacity(launched.len());
        for worker in &mut launched {
            outcomes.push(read_record(&mut worker.report, worker.tag).await);
        }

        // Dropping the read ends closes every channel before reaping.
        let processes = launched.into_iter().map(|w| (w.tag, w.process)).collect();
        reap(processes).await;
        let finished_at = chrono::Utc::now();

        let workers: Vec<WorkerReport> = self
            .config
            .tiers
            .iter()
            .zip(outcomes)
            .map(|(tier, outcome)| WorkerReport { tier: *tier, outcome })
            .collect();

        for worker in workers.iter().filter(|w| !w.outcome.is_complete()) {
            warn!(tag = %worker.tier.tag, outcome = ?worker.outcome, "incomplete record");
        }

        let observations: Vec<Observation<'_>> = workers
            .iter()
            .map(|w| Observation::new(w.tier, &w.outcome))
            .collect();
        let verdict = verify(&self.config.verify_policy(), &observations);

        Ok(RunReport {
            run_id,
            started_at,
            finished_at,
            config: self.config.clone(),
            cpu,
            workers,
            verdict,
        })
    }
}

/// Wait for every process, discarding exit statuses.
async fn reap(processes: Vec<(Tag, Box<dyn WorkerProcess>)>) {
    for (tag, mut process) in processes {
        match process.wait().await {
            Ok(code) => debug!(%tag, ?code, "worker exited"),
            Err(e) => warn!(%tag, "wait failed: {}", e),
        }
    }
}
