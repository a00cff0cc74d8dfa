//! # tsbench
//!
//! Benchmarks embedded key-value engines on a synthetic time-series
//! workload: batched writes, full-series range scans and range deletes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tsbench::{BenchConfig, EngineKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BenchConfig::default()
//!         .with_points(1_000_000)
//!         .with_series(4)
//!         .with_engines(vec![EngineKind::Mdb]);
//!
//!     for report in tsbench::run_benchmarks(&config)? {
//!         println!("{}: {:.0} points/s", report.engine, report.load.points_per_sec());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Engines
//!
//! - `lsm`: RocksDB (feature `rocksdb`)
//! - `mdb`: LMDB (feature `lmdb`)
//!
//! Both are driven through the [`Db`] trait, so the driver treats them the
//! same way.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod driver;
pub mod engine;
pub mod generator;
pub mod logging;

// Re-export core types
pub use tsbench_core::{
    count_range, decode_key, encode_key, encode_value, series_range, Db, DbIterator, Error,
    FieldValue, PointKey, Result, Write, KEY_LEN,
};

pub use config::BenchConfig;
pub use driver::{BenchReport, LoadStats, QueryStats, SeriesTeardown};
pub use engine::EngineKind;
pub use generator::Generator;
pub use logging::{LogConfig, LogFormat, LogOutput};

/// Runs every configured engine in turn and returns their reports
///
/// Engines run one after another, each to completion, with a fresh
/// generator. Unless `keep_data` is set, each engine's data directory is
/// removed before it is opened. The first error aborts the run.
pub fn run_benchmarks(config: &BenchConfig) -> Result<Vec<BenchReport>> {
    config.validate()?;

    let mut reports = Vec::with_capacity(config.engines.len());
    for &kind in &config.engines {
        if !config.keep_data {
            engine::reset_dir(&config.engine_dir(kind))?;
        }
        let db = engine::open_engine(kind, config)?;
        println!("Benchmarking {}", db.name());

        let mut generator = Generator::from_config(config);
        reports.push(driver::run(db.as_ref(), config, &mut generator)?);
    }
    Ok(reports)
}
