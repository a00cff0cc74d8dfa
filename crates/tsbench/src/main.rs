use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tsbench::{BenchConfig, LogConfig};

fn main() -> ExitCode {
    let config = BenchConfig::parse();

    // Keep the guard alive so file logging flushes on exit.
    let _guard = match LogConfig::from_bench(&config).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("tsbench: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tsbench::run_benchmarks(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "benchmark aborted");
            eprintln!("tsbench: {}", e);
            ExitCode::FAILURE
        }
    }
}
