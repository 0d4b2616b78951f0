//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use schedcheck_core::{Priority, Tag, TierSpec, Urgency, WorkerConfig};
use schedcheck_harness::{CpuPin, RunConfig};
use schedcheck_verify::VerdictLabels;

#[derive(Parser)]
#[command(name = "schedcheck")]
#[command(about = "Check that the scheduler honours priority order under CPU contention", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single worker (started by the harness)
    #[command(hide = true)]
    Worker(WorkerArgs),
}

/// Output format for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary lines only
    Text,
    /// Summary lines followed by the full report as JSON
    Json,
}

#[derive(Args)]
pub struct RunArgs {
    /// [PRI_TIER1 PRI_TIER2 PRI_TIER3] [LOOP_COUNT] [WORK_SIZE] [MARKER_COUNT] [EPSILON]
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    pub positional: Vec<String>,

    /// Tier as TAG=PRIORITY; repeat to replace the positional tiers
    #[arg(long = "tier", value_name = "TAG=PRI")]
    pub tiers: Vec<TierSpec>,

    /// Which end of the priority scale is more urgent (lower, higher)
    #[arg(long, default_value = "lower")]
    pub urgency: Urgency,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    /// Pin all workers to this CPU (default: first allowed CPU)
    #[arg(long, conflicts_with = "no_pin")]
    pub cpu: Option<usize>,

    /// Do not pin workers to a CPU
    #[arg(long)]
    pub no_pin: bool,

    /// Print FAIL when the ordering held and PASS when it did not
    #[arg(long)]
    pub inverted_labels: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit with status 1 unless the ordering held
    #[arg(long)]
    pub strict_exit: bool,
}

impl RunArgs {
    /// Build the run configuration.
    pub fn to_config(&self) -> RunConfig {
        let mut config = apply_positional(RunConfig::default(), &self.positional);
        if !self.tiers.is_empty() {
            config = config.with_tiers(self.tiers.clone());
        }

        let pin = match (self.no_pin, self.cpu) {
            (true, _) => CpuPin::Off,
            (false, Some(cpu)) => CpuPin::Cpu(cpu),
            (false, None) => CpuPin::Auto,
        };
        let labels = if self.inverted_labels {
            VerdictLabels::Inverted
        } else {
            VerdictLabels::Conventional
        };

        config
            .with_urgency(self.urgency)
            .with_tick_ms(self.tick_ms)
            .with_pin(pin)
            .with_labels(labels)
    }
}

#[derive(Args)]
pub struct WorkerArgs {
    /// Worker tag
    #[arg(long)]
    pub tag: Tag,

    /// Priority to assign before timing starts
    #[arg(long, allow_negative_numbers = true)]
    pub priority: i32,

    /// Workload iterations
    #[arg(long)]
    pub loops: u64,

    /// Work units per iteration
    #[arg(long)]
    pub work_size: u64,

    /// Markers to emit
    #[arg(long)]
    pub markers: u32,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    /// CPU to pin to
    #[arg(long)]
    pub cpu: Option<usize>,
}

impl WorkerArgs {
    /// Build the worker configuration.
    pub fn to_config(&self) -> WorkerConfig {
        WorkerConfig {
            tag: self.tag,
            priority: Priority(self.priority),
            loop_count: self.loops,
            work_size: self.work_size,
            marker_count: self.markers.max(1),
            tick_ms: self.tick_ms,
            cpu: self.cpu,
        }
    }
}

/// Apply `[p1 p2 p3] [loops] [work] [markers] [eps]`.
///
/// Priorities are taken only when all three are present. Each value is read
/// like C `atoi`, so garbage becomes 0; marker count and epsilon are then
/// raised to 1.
pub fn apply_positional(mut config: RunConfig, args: &[String]) -> RunConfig {
    let value = |i: usize| args.get(i).map(|s| atoi(s));

    if let (Some(a), Some(b), Some(c)) = (value(0), value(1), value(2)) {
        config = config.with_tiers(RunConfig::positional_tiers(
            Priority(saturate_i32(a)),
            Priority(saturate_i32(b)),
            Priority(saturate_i32(c)),
        ));
        if let Some(loops) = value(3) {
            config = config.with_loop_count(non_negative(loops));
        }
        if let Some(work) = value(4) {
            config = config.with_work_size(non_negative(work));
        }
        if let Some(markers) = value(5) {
            config = config.with_marker_count(u32::try_from(markers.max(0)).unwrap_or(u32::MAX));
        }
        if let Some(eps) = value(6) {
            config = config.with_epsilon(non_negative(eps));
        }
    }
    config
}

/// Parse like C `atoi`: leading whitespace, optional sign, leading digits.
pub fn atoi(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn saturate_i32(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(if n < 0 { i32::MIN } else { i32::MAX })
}

fn non_negative(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    fn tiers(config: &RunConfig) -> Vec<String> {
        config.tiers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_atoi() {
        assert_eq!(atoi("12"), 12);
        assert_eq!(atoi("  -7"), -7);
        assert_eq!(atoi("+3"), 3);
        assert_eq!(atoi("42abc"), 42);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
    }

    #[test]
    fn test_no_args_keeps_defaults() {
        let config = apply_positional(RunConfig::default(), &[]);
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_fewer_than_three_args_ignored() {
        let config = apply_positional(RunConfig::default(), &strings(&["1", "2"]));
        assert_eq!(tiers(&config), vec!["A=12", "B=8", "C=4"]);
    }

    #[test]
    fn test_full_positional_grammar() {
        let args = strings(&["3", "2", "1", "100", "2000", "5", "4"]);
        let config = apply_positional(RunConfig::default(), &args);
        assert_eq!(tiers(&config), vec!["A=3", "B=2", "C=1"]);
        assert_eq!(config.loop_count, 100);
        assert_eq!(config.work_size, 2000);
        assert_eq!(config.marker_count, 5);
        assert_eq!(config.epsilon, 4);
    }

    #[test]
    fn test_clamping() {
        let args = strings(&["1", "2", "3", "-5", "x", "0", "-2"]);
        let config = apply_positional(RunConfig::default(), &args);
        assert_eq!(config.loop_count, 0);
        assert_eq!(config.work_size, 0);
        assert_eq!(config.marker_count, 1);
        assert_eq!(config.epsilon, 1);
    }

    #[test]
    fn test_cli_parses_negative_priorities() {
        let cli = Cli::try_parse_from(["schedcheck", "-1", "0", "5", "--no-pin"]).unwrap();
        assert!(cli.command.is_none());
        let config = cli.run.to_config();
        assert_eq!(tiers(&config), vec!["A=-1", "B=0", "C=5"]);
        assert_eq!(config.pin, CpuPin::Off);
    }

    #[test]
    fn test_cli_tier_flags_replace_positional() {
        let cli = Cli::try_parse_from([
            "schedcheck", "--tier", "X=1", "--tier", "Y=2", "--urgency", "higher", "--inverted-labels",
        ])
        .unwrap();
        let config = cli.run.to_config();
        assert_eq!(tiers(&config), vec!["X=1", "Y=2"]);
        assert_eq!(config.urgency, Urgency::HigherIsUrgent);
        assert_eq!(config.labels, VerdictLabels::Inverted);
    }

    #[test]
    fn test_cli_cpu_conflicts_with_no_pin() {
        assert!(Cli::try_parse_from(["schedcheck", "--cpu", "1", "--no-pin"]).is_err());
    }

    #[test]
    fn test_worker_subcommand() {
        let cli = Cli::try_parse_from([
            "schedcheck", "worker", "--tag=B", "--priority=-3", "--loops=10",
            "--work-size=5", "--markers=0", "--tick-ms=1", "--cpu=2",
        ])
        .unwrap();
        let Some(Commands::Worker(args)) = cli.command else {
            panic!("expected worker subcommand");
        };
        let config = args.to_config();
        assert_eq!(config.tag.to_string(), "B");
        assert_eq!(config.priority, Priority(-3));
        assert_eq!(config.marker_count, 1);
        assert_eq!(config.cpu, Some(2));
    }

    #[test]
    fn test_worker_args_roundtrip_through_launcher() {
        let worker = RunConfig::default().worker_configs(Some(0)).remove(0);
        let mut argv = vec!["schedcheck".to_string(), "worker".to_string()];
        argv.extend(schedcheck_harness::ProcessLauncher::worker_args(&worker));

        let cli = Cli::try_parse_from(argv).unwrap();
        let Some(Commands::Worker(args)) = cli.command else {
            panic!("expected worker subcommand");
        };
        assert_eq!(args.to_config(), worker);
    }
}
