//! Memory-mapped transactional engine adapter backed by LMDB
//!
//! Every batch is one read-write transaction. A range iterator owns a
//! read-only transaction and a cursor on it; both are released by
//! [`DbIterator::close`] or, on any other exit path, by `Drop`. LMDB allows a
//! single writer at a time, so a leaked write transaction would stall every
//! later batch.

use std::path::Path;

use lmdb::{
    Cursor, Database, DatabaseFlags, Environment, EnvironmentFlags, RoCursor, RoTransaction,
    Transaction, WriteFlags,
};
use lmdb_sys::{MDB_NEXT, MDB_SET_RANGE};
use self_cell::self_cell;
use tracing::{debug, info};
use tsbench_core::{Db, DbIterator, Error, Result, Write};

const ENGINE: &str = "lmdb";

/// Default map size (10GB)
const DEFAULT_MAP_SIZE: usize = 10 << 30;

/// Default maximum number of named databases
const DEFAULT_MAX_DBS: u32 = 10;

fn engine_err(err: lmdb::Error) -> Error {
    Error::engine(ENGINE, err)
}

/// Positions `cursor` with `op`, mapping `MDB_NOTFOUND` to `None`.
fn cursor_get<'txn>(
    cursor: &impl Cursor<'txn>,
    key: Option<&[u8]>,
    op: u32,
) -> Result<Option<(&'txn [u8], &'txn [u8])>> {
    match cursor.get(key, None, op) {
        Ok((Some(key), value)) => Ok(Some((key, value))),
        Ok((None, _)) => Err(Error::engine(ENGINE, "cursor returned an entry without a key")),
        Err(lmdb::Error::NotFound) => Ok(None),
        Err(e) => Err(engine_err(e)),
    }
}

/// LMDB environment configuration
#[derive(Debug, Clone)]
pub struct MdbConfig {
    /// Size of the memory map in bytes; bounds the database size
    pub map_size: usize,
    /// Maximum number of named databases in the environment
    pub max_dbs: u32,
    /// Name of the database the points are stored in
    pub db_name: String,
}

impl Default for MdbConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            max_dbs: DEFAULT_MAX_DBS,
            db_name: "test".to_string(),
        }
    }
}

impl MdbConfig {
    /// Set the memory map size in bytes
    pub fn with_map_size(mut self, bytes: usize) -> Self {
        self.map_size = bytes;
        self
    }
}

/// LMDB behind the [`Db`] contract
pub struct MdbDb {
    env: Environment,
    db: Database,
}

impl MdbDb {
    /// Open or create an LMDB environment at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, MdbConfig::default())
    }

    /// Open or create an LMDB environment with custom configuration
    pub fn open_with_config(path: impl AsRef<Path>, config: MdbConfig) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let flags =
            EnvironmentFlags::WRITE_MAP | EnvironmentFlags::MAP_ASYNC | EnvironmentFlags::NO_TLS;
        let env = Environment::new()
            .set_flags(flags)
            .set_max_dbs(config.max_dbs)
            .set_map_size(config.map_size)
            .open(path)
            .map_err(engine_err)?;
        let db = env
            .create_db(Some(config.db_name.as_str()), DatabaseFlags::empty())
            .map_err(engine_err)?;
        info!(
            path = %path.display(),
            map_size = config.map_size,
            db = %config.db_name,
            "opened lmdb"
        );

        Ok(Self { env, db })
    }
}

impl Db for MdbDb {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn batch_write(&self, writes: &[Write]) -> Result<()> {
        let mut txn = self.env.begin_rw_txn().map_err(engine_err)?;
        for w in writes {
            // Returning early drops `txn`, which aborts it.
            txn.put(self.db, &w.key, &w.value, WriteFlags::empty())
                .map_err(engine_err)?;
        }
        txn.commit().map_err(engine_err)
    }

    fn del(&self, start: &[u8], end: &[u8]) -> Result<()> {
        let mut txn = self.env.begin_rw_txn().map_err(engine_err)?;

        // Victims are collected with a read cursor before any delete is
        // issued, so the cursor never walks pages it is mutating.
        let victims = {
            let cursor = txn.open_ro_cursor(self.db).map_err(engine_err)?;
            let mut victims = Vec::new();
            let mut entry = cursor_get(&cursor, Some(start), MDB_SET_RANGE)?;
            while let Some((key, _)) = entry {
                if key > end {
                    break;
                }
                victims.push(key.to_vec());
                entry = cursor_get(&cursor, None, MDB_NEXT)?;
            }
            victims
        };
        debug!(count = victims.len(), "collected lmdb delete victims");

        for key in &victims {
            txn.del(self.db, key, None).map_err(engine_err)?;
        }
        txn.commit().map_err(engine_err)?;
        info!(deleted = victims.len(), "deleted points");
        Ok(())
    }

    fn get_range<'a>(&'a self, start: &[u8], end: &[u8]) -> Result<Box<dyn DbIterator + 'a>> {
        let txn = self.env.begin_ro_txn().map_err(engine_err)?;
        let cell = RangeCursor::try_new(txn, |txn| {
            txn.open_ro_cursor(self.db)
                .map(|cursor| CursorState {
                    cursor,
                    current: None,
                })
                .map_err(engine_err)
        })?;

        Ok(Box::new(MdbIterator {
            cell: Some(cell),
            start: start.to_vec(),
            end: end.to_vec(),
            started: false,
        }))
    }
}

/// Cursor plus the entry it is positioned on, if that entry is in range
struct CursorState<'txn> {
    cursor: RoCursor<'txn>,
    current: Option<(&'txn [u8], &'txn [u8])>,
}

self_cell!(
    /// Read-only transaction together with the cursor opened on it. The
    /// cursor is always dropped before the transaction.
    struct RangeCursor<'env> {
        owner: RoTransaction<'env>,

        #[covariant]
        dependent: CursorState,
    }
);

/// Range iterator owning a read-only transaction and its cursor
///
/// Dropping it without [`DbIterator::close`] aborts the transaction.
pub struct MdbIterator<'a> {
    cell: Option<RangeCursor<'a>>,
    start: Vec<u8>,
    end: Vec<u8>,
    started: bool,
}

impl MdbIterator<'_> {
    fn current(&self) -> Result<(&[u8], &[u8])> {
        self.cell
            .as_ref()
            .and_then(|cell| cell.borrow_dependent().current)
            .ok_or_else(|| Error::engine(ENGINE, "iterator is not positioned on an entry"))
    }
}

impl DbIterator for MdbIterator<'_> {
    fn next(&mut self) -> Result<bool> {
        let cell = self
            .cell
            .as_mut()
            .ok_or_else(|| Error::engine(ENGINE, "iterator used after close"))?;
        let start = self.start.as_slice();
        let end = self.end.as_slice();
        let first = !self.started;
        self.started = true;

        cell.with_dependent_mut(|_, state| {
            let entry = if first {
                cursor_get(&state.cursor, Some(start), MDB_SET_RANGE)?
            } else {
                cursor_get(&state.cursor, None, MDB_NEXT)?
            };
            state.current = entry.filter(|(key, _)| *key <= end);
            Ok(state.current.is_some())
        })
    }

    fn key(&self) -> Result<&[u8]> {
        self.current().map(|(key, _)| key)
    }

    fn value(&self) -> Result<&[u8]> {
        self.current().map(|(_, value)| value)
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        match self.cell.take() {
            // into_owner drops the cursor and hands back the transaction.
            Some(cell) => cell.into_owner().commit().map_err(engine_err),
            None => Ok(()),
        }
    }
}
