// Common test utilities for driver tests

use tempfile::TempDir;
use tsbench::{BenchConfig, EngineKind};

/// Test fixture that points a benchmark config at a temporary data dir
pub struct BenchFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub config: BenchConfig,
}

impl BenchFixture {
    pub fn new(points: usize, batch: usize, series: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = BenchConfig::default()
            .with_points(points)
            .with_batch(batch)
            .with_series(series)
            .with_seed(7)
            .with_mdb_map_size_gb(1)
            .with_data_dir(temp_dir.path());
        Self { temp_dir, config }
    }
}

/// Engines compiled into this build
pub fn engines() -> Vec<EngineKind> {
    let mut engines = Vec::new();
    #[cfg(feature = "rocksdb")]
    engines.push(EngineKind::Lsm);
    #[cfg(feature = "lmdb")]
    engines.push(EngineKind::Mdb);
    engines
}
