//! # Arena Bench
//!
//! Runs every configured capacity × pattern × object size combination,
//! appends each run to the results CSV and prints the median summary.
//!
//! Set `RUST_LOG=debug` for per-run tracing.

use std::process::ExitCode;

use arena_pool_bench::cli::USAGE;
use arena_pool_bench::{run, summarize, BenchResult, CliArgs, ResultsWriter};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    match run_suite() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "benchmark suite failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_suite() -> BenchResult<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let suite = args.suite()?;
    let mut writer = ResultsWriter::open(&suite.output)?;
    let total = suite.total_runs();
    tracing::info!(
        runs = total,
        op_count = suite.op_count,
        output = %writer.path().display(),
        "starting benchmark suite"
    );

    let mut all_results = Vec::with_capacity(total);
    for (run_idx, config) in suite.runs().enumerate() {
        let results = run(&config)?;
        writer.append(&results)?;
        println!(
            "run {} of {}:\tarena pool speedup = {:.2}x",
            run_idx + 1,
            total,
            results.pool_speedup_factor()
        );
        all_results.push(results);
    }

    println!();
    println!("{:<14} {:>6} {:>14} {:>14} {:>9}", "combination", "runs", "pool ns/op", "box ns/op", "speedup");
    for group in summarize(&all_results) {
        println!(
            "{:<14} {:>6} {:>14.2} {:>14.2} {:>8.2}x",
            group.label(),
            group.runs,
            group.median_pool_latency_ns,
            group.median_boxed_latency_ns,
            group.speedup()
        );
    }
    println!("done");

    Ok(())
}
