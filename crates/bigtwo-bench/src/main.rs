use std::path::PathBuf;

use clap::Parser;

use bigtwo_bench::config::{BenchmarkConfig, ResolvedOutputs};
use bigtwo_bench::logging::init_logging;
use bigtwo_bench::runner::MatchRunner;

/// Benchmark harness that plays Big Two bots against each other.
#[derive(Debug, Parser)]
#[command(
    name = "bigtwo-bench",
    author,
    version,
    about = "Deterministic Big Two bot-versus-bot harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the RNG seed used to derive per-match seeds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.deals.matches = matches;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let matches = config.deals.matches;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({matches} matches to {} points)",
        if agent_count == 1 { "" } else { "s" },
        config.table.target_score
    );

    let runner = MatchRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches, {} rounds -> {} rows at {}",
        summary.matches_played,
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Base seed: {}", summary.base_seed);
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
