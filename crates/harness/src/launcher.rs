//! Worker process launching.

use crate::error::{HarnessError, Result};
use async_trait::async_trait;
use schedcheck_core::{Tag, WorkerConfig};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tracing::debug;

/// Starts worker processes.
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    /// Start one worker running `config`.
    ///
    /// The returned report stream must be the only read end of the worker's
    /// report channel, and the harness must hold no write end of it.
    async fn launch(&self, config: &WorkerConfig) -> Result<LaunchedWorker>;
}

/// A running worker that can be waited for.
#[async_trait]
pub trait WorkerProcess: Send {
    /// Wait for the worker to exit and return its exit code, if it had one.
    async fn wait(&mut self) -> std::io::Result<Option<i32>>;
}

/// Handles to a started worker.
pub struct LaunchedWorker {
    /// Worker tag
    pub tag: Tag,
    /// Read end of the report channel
    pub report: Box<dyn AsyncRead + Send + Unpin>,
    /// The process itself
    pub process: Box<dyn WorkerProcess>,
}

impl std::fmt::Debug for LaunchedWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedWorker").field("tag", &self.tag).finish_non_exhaustive()
    }
}

#[async_trait]
impl WorkerProcess for Child {
    async fn wait(&mut self) -> std::io::Result<Option<i32>> {
        let status = Child::wait(self).await?;
        Ok(status.code())
    }
}

/// Launches workers as child processes.
///
/// The worker's stdout is its report channel (a close-on-exec pipe, so no
/// sibling inherits it); stderr is inherited and carries the markers.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessLauncher {
    /// Launch `program` with `leading_args`, followed by the worker flags.
    pub fn new(program: impl Into<PathBuf>, leading_args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    /// Launch workers by re-running the current executable's `worker` command.
    pub fn current_exe() -> Result<Self> {
        let program = std::env::current_exe().map_err(HarnessError::CurrentExe)?;
        Ok(Self::new(program, vec![OsString::from("worker")]))
    }

    /// The flags that hand `config` to a worker.
    pub fn worker_args(config: &WorkerConfig) -> Vec<String> {
        let mut args = vec![
            format!("--tag={}", config.tag),
            format!("--priority={}", config.priority),
            format!("--loops={}", config.loop_count),
            format!("--work-size={}", config.work_size),
            format!("--markers={}", config.marker_count),
            format!("--tick-ms={}", config.tick_ms),
        ];
        if let Some(cpu) = config.cpu {
            args.push(format!("--cpu={cpu}"));
        }
        args
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn launch(&self, config: &WorkerConfig) -> Result<LaunchedWorker> {
        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .args(Self::worker_args(config))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                tag: config.tag,
                source,
            })?;

        let Some(report) = child.stdout.take() else {
            return Err(HarnessError::NoReportChannel(config.tag));
        };

        debug!(tag = %config.tag, pid = ?child.id(), "worker spawned");

        Ok(LaunchedWorker {
            tag: config.tag,
            report: Box::new(report),
            process: Box::new(child),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::read_record;
    use schedcheck_core::{Priority, RecordOutcome};

    fn config() -> WorkerConfig {
        WorkerConfig {
            tag: Tag::new('B').unwrap(),
            priority: Priority(-3),
            loop_count: 10,
            work_size: 5,
            marker_count: 2,
            tick_ms: 10,
            cpu: Some(1),
        }
    }

    fn shell(script: &str) -> ProcessLauncher {
        ProcessLauncher::new(
            "/bin/sh",
            vec!["-c".into(), script.into(), "worker".into()],
        )
    }

    #[test]
    fn test_worker_args() {
        assert_eq!(
            ProcessLauncher::worker_args(&config()),
            vec![
                "--tag=B",
                "--priority=-3",
                "--loops=10",
                "--work-size=5",
                "--markers=2",
                "--tick-ms=10",
                "--cpu=1",
            ]
        );
    }

    #[tokio::test]
    async fn test_silent_process_yields_missing() {
        let mut worker = shell("exit 3").launch(&config()).await.unwrap();
        let outcome = read_record(&mut worker.report, worker.tag).await;
        assert_eq!(outcome, RecordOutcome::Missing);
        assert_eq!(worker.process.wait().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_truncated_output_yields_short() {
        let mut worker = shell("printf SRR1B").launch(&config()).await.unwrap();
        let outcome = read_record(&mut worker.report, worker.tag).await;
        assert!(matches!(outcome, RecordOutcome::Short { received: 5, .. }));
        worker.process.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_flags_reach_the_process() {
        // Echo the flags back on the report channel: 37+ bytes that are not a record.
        let mut worker = shell(r#"printf '%s ' "$@""#).launch(&config()).await.unwrap();
        let outcome = read_record(&mut worker.report, worker.tag).await;
        assert!(matches!(outcome, RecordOutcome::Malformed { .. }));
        worker.process.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_crashed_worker_channel_closes_while_sibling_runs() {
        let mut crashed = shell("exit 1").launch(&config()).await.unwrap();
        let mut sibling = shell("sleep 3").launch(&config()).await.unwrap();

        // Only the crashed worker held its write end, so the read sees EOF
        // long before the sibling exits.
        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            read_record(&mut crashed.report, crashed.tag),
        )
        .await
        .expect("read blocked on a running sibling");
        assert_eq!(outcome, RecordOutcome::Missing);

        assert_eq!(crashed.process.wait().await.unwrap(), Some(1));
        assert_eq!(sibling.process.wait().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_spawn_failure_reported() {
        let launcher = ProcessLauncher::new("/nonexistent/schedcheck", vec![]);
        let err = launcher.launch(&config()).await.unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }
}
