//! cpusim - sweep scheduling policies across arrival rates.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cpusim::{Policy, RunReport, SimConfig, Summary};

/// Simulate FCFS, SJF and Round-Robin scheduling over Poisson workloads.
#[derive(Parser)]
#[command(name = "cpusim")]
struct Cli {
    /// Policies to simulate (fcfs, sjf, rr). Defaults to all three.
    #[arg(short, long, value_delimiter = ',')]
    policy: Vec<Policy>,

    /// Arrival rates (processes per second) to sweep. Defaults to 1..=30.
    #[arg(short, long = "lambda", value_delimiter = ',')]
    lambda: Vec<f64>,

    /// Mean service time in seconds.
    #[arg(short, long, default_value_t = 0.06)]
    mean_service: f64,

    /// Round-Robin time quantum in seconds.
    #[arg(short, long, default_value_t = 0.01)]
    quantum: f64,

    /// Completed processes per run.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    run_length: usize,

    /// Base PRNG seed; run `i` of the sweep uses `seed + i`.
    #[arg(long, env = "CPUSIM_SEED", default_value_t = 0)]
    seed: u64,

    /// Worker threads. Defaults to the available parallelism.
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Write results as JSON to this path.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Include per-process records in the JSON output.
    #[arg(long, requires = "json")]
    records: bool,
}

#[derive(Serialize)]
struct SweepRow<'a> {
    config: &'a SimConfig,
    summary: Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let configs = sweep_configs(&cli);
    let threads = cli
        .threads
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);

    info!(runs = configs.len(), threads, "starting sweep");
    let reports = run_parallel(&configs, threads)?;

    print_table(&reports);

    if let Some(path) = &cli.json {
        write_json(path, &reports, cli.records)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote results");
    }

    Ok(())
}

fn sweep_configs(cli: &Cli) -> Vec<SimConfig> {
    let policies = if cli.policy.is_empty() {
        Policy::ALL.to_vec()
    } else {
        cli.policy.clone()
    };
    let lambdas = if cli.lambda.is_empty() {
        (1..=30).map(f64::from).collect()
    } else {
        cli.lambda.clone()
    };

    let mut configs = Vec::with_capacity(policies.len() * lambdas.len());
    for policy in policies {
        for &lambda in &lambdas {
            let seed = cli.seed.wrapping_add(configs.len() as u64);
            let mut config =
                SimConfig::new(policy, lambda, cli.mean_service, cli.run_length).with_seed(seed);
            if policy.needs_quantum() {
                config = config.with_quantum(cli.quantum);
            }
            configs.push(config);
        }
    }
    configs
}

/// Runs share nothing, so each worker takes every `threads`-th config.
fn run_parallel(configs: &[SimConfig], threads: usize) -> Result<Vec<RunReport>> {
    let threads = threads.clamp(1, configs.len().max(1));

    let mut results: Vec<(usize, Result<RunReport, cpusim::SimError>)> = thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                s.spawn(move || {
                    configs
                        .iter()
                        .enumerate()
                        .skip(worker)
                        .step_by(threads)
                        .map(|(i, config)| (i, cpusim::run(config)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });
    results.sort_by_key(|(i, _)| *i);

    results
        .into_iter()
        .map(|(i, result)| {
            result.with_context(|| {
                let config = &configs[i];
                format!(
                    "run {i} failed ({} lambda={})",
                    config.policy, config.arrival_rate
                )
            })
        })
        .collect()
}

fn print_table(reports: &[RunReport]) {
    println!(
        "{:<6} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "policy", "lambda", "turnaround", "throughput", "utilization", "ready_len"
    );
    for report in reports {
        let summary = report.summary();
        if summary.utilization > 1.0 + 1e-9 {
            warn!(policy = %report.config.policy, "utilization above 1");
        }
        println!(
            "{:<6} {:>8.2} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            report.config.policy,
            report.config.arrival_rate,
            summary.mean_turnaround,
            summary.throughput,
            summary.utilization,
            summary.mean_ready_len,
        );
    }
}

fn write_json(path: &Path, reports: &[RunReport], records: bool) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    if records {
        serde_json::to_writer_pretty(&mut writer, reports)?;
    } else {
        let rows: Vec<SweepRow> = reports
            .iter()
            .map(|report| SweepRow {
                config: &report.config,
                summary: report.summary(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut writer, &rows)?;
    }
    writer.flush()?;
    Ok(())
}
