// Common test utilities for adapter contract tests

use std::path::PathBuf;
use tempfile::TempDir;
use tsbench_core::{encode_key, encode_value, Db, Write};

/// Test fixture that owns a temporary data directory
pub struct EngineFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl EngineFixture {
    pub fn new(dir_name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().join(dir_name);
        Self {
            temp_dir,
            data_path,
        }
    }
}

/// Writes `count` points for one series, `batch` at a time, and returns the
/// keys in write order.
#[allow(dead_code)]
pub fn load_series(db: &dyn Db, series_id: i64, count: i64, batch: usize) -> Vec<Vec<u8>> {
    let keys: Vec<Vec<u8>> = (0..count)
        .map(|i| encode_key(series_id, 1_000 + i, i).to_vec())
        .collect();
    for chunk in keys.chunks(batch) {
        let writes: Vec<Write> = chunk
            .iter()
            .map(|k| Write::new(k.clone(), encode_value(7).expect("encode value")))
            .collect();
        db.batch_write(&writes).expect("Failed to write batch");
    }
    keys
}

/// Collects every key in `[start, end]`, closing the iterator.
#[allow(dead_code)]
pub fn scan_keys(db: &dyn Db, start: &[u8], end: &[u8]) -> Vec<Vec<u8>> {
    let mut iter = db.get_range(start, end).expect("Failed to open range");
    let mut keys = Vec::new();
    while iter.next().expect("Failed to advance iterator") {
        keys.push(iter.key().expect("Failed to read key").to_vec());
    }
    iter.close().expect("Failed to close iterator");
    keys
}
