//! LSM engine adapter backed by RocksDB
//!
//! Writes go through a native `WriteBatch`. Range scans use one raw iterator,
//! which reads from the implicit snapshot taken when it is created. RocksDB's
//! range tombstones are not used: `del` scans the range and stages one point
//! delete per key, so it is not isolated from concurrent writers.

use std::path::Path;

use rocksdb::{BlockBasedOptions, Cache, DBCompressionType, DBRawIterator, WriteBatch};
use tracing::{debug, info};
use tsbench_core::{Db, DbIterator, Error, Result, Write};

const ENGINE: &str = "rocksdb";

/// Default block cache size (100MB)
const DEFAULT_BLOCK_CACHE_SIZE: usize = 100 * 1024 * 1024;

fn engine_err(err: rocksdb::Error) -> Error {
    Error::engine(ENGINE, err)
}

/// LSM engine configuration
#[derive(Debug, Clone)]
pub struct LsmConfig {
    /// LRU block cache capacity in bytes
    pub block_cache_size: usize,
    /// fsync every write batch
    pub sync_writes: bool,
}

impl Default for LsmConfig {
    fn default() -> Self {
        Self {
            block_cache_size: DEFAULT_BLOCK_CACHE_SIZE,
            sync_writes: false,
        }
    }
}

impl LsmConfig {
    /// Set the block cache capacity in bytes
    pub fn with_block_cache_size(mut self, bytes: usize) -> Self {
        self.block_cache_size = bytes;
        self
    }

    /// Set whether each batch is synced to disk
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

/// RocksDB behind the [`Db`] contract
pub struct LsmDb {
    db: rocksdb::DB,
    write_options: rocksdb::WriteOptions,
}

impl LsmDb {
    /// Open or create an LSM database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, LsmConfig::default())
    }

    /// Open or create an LSM database with custom configuration
    pub fn open_with_config(path: impl AsRef<Path>, config: LsmConfig) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let cache = Cache::new_lru_cache(config.block_cache_size);
        let mut table_options = BlockBasedOptions::default();
        table_options.set_block_cache(&cache);

        let mut options = rocksdb::Options::default();
        options.create_if_missing(true);
        options.set_compression_type(DBCompressionType::None);
        options.set_block_based_table_factory(&table_options);

        let mut write_options = rocksdb::WriteOptions::default();
        write_options.set_sync(config.sync_writes);

        let db = rocksdb::DB::open(&options, path).map_err(engine_err)?;
        info!(path = %path.display(), cache_bytes = config.block_cache_size, "opened rocksdb");

        Ok(Self { db, write_options })
    }
}

impl Db for LsmDb {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn batch_write(&self, writes: &[Write]) -> Result<()> {
        let mut batch = WriteBatch::default();
        for w in writes {
            batch.put(&w.key, &w.value);
        }
        self.db
            .write_opt(batch, &self.write_options)
            .map_err(engine_err)
    }

    fn del(&self, start: &[u8], end: &[u8]) -> Result<()> {
        let mut batch = WriteBatch::default();

        let mut iter = self.get_range(start, end)?;
        while iter.next()? {
            batch.delete(iter.key()?);
        }
        iter.close()?;

        let count = batch.len();
        debug!(count, "staged rocksdb deletes");
        self.db
            .write_opt(batch, &self.write_options)
            .map_err(engine_err)?;
        info!(deleted = count, "deleted points");
        Ok(())
    }

    fn get_range<'a>(&'a self, start: &[u8], end: &[u8]) -> Result<Box<dyn DbIterator + 'a>> {
        Ok(Box::new(LsmIterator {
            inner: self.db.raw_iterator(),
            start: start.to_vec(),
            end: end.to_vec(),
            started: false,
            positioned: false,
        }))
    }
}

/// Range iterator over a RocksDB snapshot
pub struct LsmIterator<'a> {
    inner: DBRawIterator<'a>,
    start: Vec<u8>,
    end: Vec<u8>,
    started: bool,
    // Set only while the raw iterator sits on a key inside the range.
    positioned: bool,
}

impl LsmIterator<'_> {
    fn not_positioned() -> Error {
        Error::engine(ENGINE, "iterator is not positioned on an entry")
    }
}

impl DbIterator for LsmIterator<'_> {
    fn next(&mut self) -> Result<bool> {
        if self.started {
            self.inner.next();
        } else {
            self.started = true;
            self.inner.seek(&self.start);
        }

        self.positioned = false;
        if !self.inner.valid() {
            self.inner.status().map_err(engine_err)?;
            return Ok(false);
        }
        self.positioned = self
            .inner
            .key()
            .is_some_and(|key| key <= self.end.as_slice());
        Ok(self.positioned)
    }

    fn key(&self) -> Result<&[u8]> {
        self.inner
            .key()
            .filter(|_| self.positioned)
            .ok_or_else(Self::not_positioned)
    }

    fn value(&self) -> Result<&[u8]> {
        self.inner
            .value()
            .filter(|_| self.positioned)
            .ok_or_else(Self::not_positioned)
    }

    fn close(self: Box<Self>) -> Result<()> {
        // Dropping the raw iterator releases its snapshot.
        Ok(())
    }
}
