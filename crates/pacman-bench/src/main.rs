use std::path::PathBuf;

use clap::Parser;

use pacman_bench::config::{BenchmarkConfig, ResolvedOutputs};
use pacman_bench::logging::init_logging;
use pacman_bench::runner::EpisodeRunner;
use pacman_core::AppInfo;

/// Episode benchmarking harness for Pacman agents.
#[derive(Debug, Parser)]
#[command(
    name = "pacman-bench",
    author,
    version,
    about = "Deterministic Pacman episode harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of episodes per layout.
    #[arg(long, value_name = "COUNT")]
    episodes: Option<usize>,

    /// Override the RNG seed for ghost motion and sensor noise.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the step cap per episode.
    #[arg(long, value_name = "STEPS")]
    max_steps: Option<usize>,

    /// Track ghosts from noisy readings regardless of config.
    #[arg(long)]
    track_ghosts: bool,

    /// Exit after validating the configuration (no episodes are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(episodes) = cli.episodes {
        config.episodes.count = episodes;
    }

    if let Some(seed) = cli.seed {
        config.episodes.seed = Some(seed);
    }

    if let Some(max_steps) = cli.max_steps {
        config.episodes.max_steps = max_steps;
    }

    if cli.track_ghosts {
        config.belief.enabled = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let layout_count = config.layouts.len();
    let run_id = config.run_id.clone();
    let episodes = config.episodes.count;

    println!(
        "{} {}: loaded configuration '{run_id}' with {agent_count} agent{} on {layout_count} layout{} ({episodes} episodes each)",
        AppInfo::name(),
        AppInfo::version(),
        if agent_count == 1 { "" } else { "s" },
        if layout_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    if let Some(guard) = logging_guard.as_ref() {
        println!("Structured logging to {}", guard.telemetry_path().display());
    }
    let runner = EpisodeRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: episodes skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} episodes → {} rows ({} wins) at {}",
        summary.episodes,
        summary.rows_written,
        summary.wins,
        summary.jsonl_path.display()
    );
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }
    drop(logging_guard);

    Ok(())
}
