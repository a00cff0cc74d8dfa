//! # tsbench Storage Adapters
//!
//! Engine adapters that put two embedded key-value stores behind the
//! [`tsbench_core::Db`] contract:
//!
//! - **LSM** ([`LsmDb`], feature `rocksdb`): RocksDB with batched atomic
//!   writes and snapshot iterators. Range deletes scan the range and commit
//!   one batch of point deletes.
//! - **Memory-mapped** ([`MdbDb`], feature `lmdb`): LMDB with explicit
//!   read/write transactions and cursors. Range deletes run inside a single
//!   write transaction.
//!
//! ## Architecture
//!
//! ```text
//! driver → Db::batch_write / get_range / del
//!              ↓                     ↓
//!        LsmDb (WriteBatch)    MdbDb (RwTransaction)
//!              ↓                     ↓
//!        DBRawIterator         RoTransaction + RoCursor
//! ```

#[cfg(feature = "rocksdb")]
pub mod lsm;
#[cfg(feature = "lmdb")]
pub mod mdb;

#[cfg(feature = "rocksdb")]
pub use lsm::{LsmConfig, LsmDb, LsmIterator};
#[cfg(feature = "lmdb")]
pub use mdb::{MdbConfig, MdbDb, MdbIterator};
