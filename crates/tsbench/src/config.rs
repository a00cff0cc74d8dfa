//! Benchmark configuration
//!
//! [`BenchConfig`] is parsed from the command line by the `tsbench` binary
//! and can also be built programmatically through its builder methods.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::engine::EngineKind;
use crate::logging::LogFormat;
use crate::{Error, Result};

/// Default number of points written per engine
pub const DEFAULT_POINTS: usize = 200_000_000;

/// Default number of points per write batch
pub const DEFAULT_BATCH: usize = 1000;

/// Default LSM block cache size in MiB
pub const DEFAULT_LSM_CACHE_MB: usize = 100;

/// Default LMDB map size in GiB
pub const DEFAULT_MDB_MAP_SIZE_GB: usize = 10;

/// Benchmark configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tsbench",
    version,
    about = "Compare write, range-query and range-delete performance of RocksDB and LMDB on a synthetic time-series workload"
)]
pub struct BenchConfig {
    /// Number of points written to each engine
    #[arg(long, default_value_t = DEFAULT_POINTS, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub points: usize,

    /// Number of points per write batch
    #[arg(long, default_value_t = DEFAULT_BATCH, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub batch: usize,

    /// Number of series the points are spread over (round-robin)
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub series: usize,

    /// Directory holding one data directory per engine
    #[arg(long, default_value = "/tmp")]
    pub data_dir: PathBuf,

    /// Engines to benchmark, in order
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [EngineKind::Lsm, EngineKind::Mdb])]
    pub engines: Vec<EngineKind>,

    /// Seed for the measurement values (defaults to the wall clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep existing engine data directories instead of removing them first
    #[arg(long)]
    pub keep_data: bool,

    /// RocksDB block cache size in MiB
    #[arg(long, default_value_t = DEFAULT_LSM_CACHE_MB)]
    pub lsm_cache_mb: usize,

    /// fsync every RocksDB write batch
    #[arg(long)]
    pub lsm_sync_writes: bool,

    /// LMDB memory map size in GiB
    #[arg(long, default_value_t = DEFAULT_MDB_MAP_SIZE_GB)]
    pub mdb_map_size_gb: usize,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log line layout
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            batch: DEFAULT_BATCH,
            series: 1,
            data_dir: PathBuf::from("/tmp"),
            engines: vec![EngineKind::Lsm, EngineKind::Mdb],
            seed: None,
            keep_data: false,
            lsm_cache_mb: DEFAULT_LSM_CACHE_MB,
            lsm_sync_writes: false,
            mdb_map_size_gb: DEFAULT_MDB_MAP_SIZE_GB,
            log_level: "warn".to_string(),
            log_file: None,
            log_format: LogFormat::Compact,
        }
    }
}

impl BenchConfig {
    /// Set the total number of points
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Set the batch size
    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }

    /// Set the number of series
    pub fn with_series(mut self, series: usize) -> Self {
        self.series = series;
        self
    }

    /// Set the parent directory for engine data
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the engines to run
    pub fn with_engines(mut self, engines: Vec<EngineKind>) -> Self {
        self.engines = engines;
        self
    }

    /// Fix the value seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the LMDB map size in GiB
    pub fn with_mdb_map_size_gb(mut self, gb: usize) -> Self {
        self.mdb_map_size_gb = gb;
        self
    }

    /// Rejects configurations the CLI parser would not have produced
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("points", self.points),
            ("batch", self.batch),
            ("series", self.series),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        if self.engines.is_empty() {
            return Err(Error::InvalidConfig("no engines selected".to_string()));
        }
        Ok(())
    }

    /// Points each series receives when the load is spread evenly
    pub fn points_per_series(&self) -> usize {
        self.points / self.series
    }

    /// Data directory of one engine
    pub fn engine_dir(&self, kind: EngineKind) -> PathBuf {
        self.data_dir.join(kind.dir_name())
    }

    /// RocksDB settings derived from this configuration
    #[cfg(feature = "rocksdb")]
    pub fn lsm_config(&self) -> tsbench_storage::LsmConfig {
        tsbench_storage::LsmConfig::default()
            .with_block_cache_size(self.lsm_cache_mb << 20)
            .with_sync_writes(self.lsm_sync_writes)
    }

    /// LMDB settings derived from this configuration
    #[cfg(feature = "lmdb")]
    pub fn mdb_config(&self) -> tsbench_storage::MdbConfig {
        tsbench_storage::MdbConfig::default().with_map_size(self.mdb_map_size_gb << 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = BenchConfig::try_parse_from(["tsbench"]).unwrap();
        let default = BenchConfig::default();
        assert_eq!(parsed.points, default.points);
        assert_eq!(parsed.batch, default.batch);
        assert_eq!(parsed.series, default.series);
        assert_eq!(parsed.data_dir, default.data_dir);
        assert_eq!(parsed.engines, default.engines);
        assert_eq!(parsed.log_level, default.log_level);
        assert_eq!(parsed.log_format, default.log_format);
        assert_eq!(parsed.lsm_sync_writes, default.lsm_sync_writes);
    }

    #[test]
    fn test_parse_flags() {
        let config = BenchConfig::try_parse_from([
            "tsbench",
            "--points",
            "5000",
            "--batch",
            "250",
            "--series",
            "4",
            "--engines",
            "mdb",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(config.points, 5000);
        assert_eq!(config.batch, 250);
        assert_eq!(config.series, 4);
        assert_eq!(config.engines, vec![EngineKind::Mdb]);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.points_per_series(), 1250);
    }

    #[test]
    fn test_parse_engine_list() {
        let config = BenchConfig::try_parse_from(["tsbench", "--engines", "mdb,lsm"]).unwrap();
        assert_eq!(config.engines, vec![EngineKind::Mdb, EngineKind::Lsm]);
    }

    #[test]
    fn test_parse_tuning_and_log_flags() {
        let config = BenchConfig::try_parse_from([
            "tsbench",
            "--lsm-sync-writes",
            "--log-format",
            "pretty",
        ])
        .unwrap();
        assert!(config.lsm_sync_writes);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn test_lsm_config_from_flags() {
        let mut config = BenchConfig::default();
        config.lsm_cache_mb = 8;
        config.lsm_sync_writes = true;

        let lsm = config.lsm_config();
        assert_eq!(lsm.block_cache_size, 8 << 20);
        assert!(lsm.sync_writes);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(BenchConfig::try_parse_from(["tsbench", "--batch", "0"]).is_err());
        assert!(BenchConfig::default().with_series(0).validate().is_err());
        assert!(BenchConfig::default().with_engines(vec![]).validate().is_err());
        assert!(BenchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_engine_dirs() {
        let config = BenchConfig::default().with_data_dir("/data");
        assert_eq!(config.engine_dir(EngineKind::Lsm), PathBuf::from("/data/test-ldb"));
        assert_eq!(config.engine_dir(EngineKind::Mdb), PathBuf::from("/data/test-mdb"));
    }
}
