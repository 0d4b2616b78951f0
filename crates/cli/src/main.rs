//! schedcheck CLI - scheduler priority-ordering check.

mod args;
mod worker;

use anyhow::Result;
use args::{Cli, Commands, OutputFormat, RunArgs};
use clap::Parser;
use schedcheck_harness::{Harness, ProcessLauncher};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    // stdout belongs to the summaries (harness) or the report record
    // (worker); logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Workers stay single-threaded: no runtime, just the burn loop.
        Some(Commands::Worker(args)) => worker::run(&args),
        None => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run(cli.run))
        }
    }
}

async fn run(args: RunArgs) -> Result<ExitCode> {
    let config = args.to_config();
    let launcher = ProcessLauncher::current_exe()?;
    let harness = Harness::new(launcher).with_config(config);

    let report = harness.run().await?;

    // End the marker line on the shared stream before the summaries.
    eprintln!();
    for line in report.summary_lines() {
        println!("{}", line);
    }
    if args.format == OutputFormat::Json {
        println!("{}", report.to_json()?);
    }

    info!(
        run_id = %report.run_id,
        held = report.ordering_held(),
        complete = report.all_complete(),
        "run finished"
    );

    if args.strict_exit && !report.ordering_held() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
