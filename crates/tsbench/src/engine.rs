//! Engine selection and data directory handling.

use std::path::Path;

use clap::ValueEnum;
use tracing::debug;

use crate::config::BenchConfig;
use crate::{Db, Error, Result};

/// Engines tsbench knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// RocksDB (log-structured merge tree)
    Lsm,
    /// LMDB (memory-mapped B+tree with transactions)
    Mdb,
}

impl EngineKind {
    /// Name of the engine's data directory under the configured data dir
    pub fn dir_name(self) -> &'static str {
        match self {
            EngineKind::Lsm => "test-ldb",
            EngineKind::Mdb => "test-mdb",
        }
    }
}

/// Opens the engine at its data directory, creating the directory if needed.
pub fn open_engine(kind: EngineKind, config: &BenchConfig) -> Result<Box<dyn Db>> {
    let path = config.engine_dir(kind);
    match kind {
        EngineKind::Lsm => open_lsm(&path, config),
        EngineKind::Mdb => open_mdb(&path, config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_lsm(path: &Path, config: &BenchConfig) -> Result<Box<dyn Db>> {
    let db = tsbench_storage::LsmDb::open_with_config(path, config.lsm_config())?;
    Ok(Box::new(db))
}

#[cfg(not(feature = "rocksdb"))]
fn open_lsm(_path: &Path, _config: &BenchConfig) -> Result<Box<dyn Db>> {
    Err(Error::InvalidConfig(
        "tsbench was built without the `rocksdb` feature".to_string(),
    ))
}

#[cfg(feature = "lmdb")]
fn open_mdb(path: &Path, config: &BenchConfig) -> Result<Box<dyn Db>> {
    let db = tsbench_storage::MdbDb::open_with_config(path, config.mdb_config())?;
    Ok(Box::new(db))
}

#[cfg(not(feature = "lmdb"))]
fn open_mdb(_path: &Path, _config: &BenchConfig) -> Result<Box<dyn Db>> {
    Err(Error::InvalidConfig(
        "tsbench was built without the `lmdb` feature".to_string(),
    ))
}

/// Removes a data directory left over from an earlier run.
pub fn reset_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed old data directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}
