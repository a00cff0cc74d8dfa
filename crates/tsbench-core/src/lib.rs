//! # tsbench Core
//!
//! Core types for the tsbench storage benchmark: the point key codec, the
//! error type and the [`Db`] / [`DbIterator`] capability traits every engine
//! adapter implements.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should run the `tsbench` binary or depend on the `tsbench` crate,
//! which re-exports everything needed from here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod storage;

pub use codec::{decode_key, encode_key, encode_value, series_range, FieldValue, PointKey, KEY_LEN};
pub use error::{Error, Result};
pub use storage::{count_range, Db, DbIterator, Write};
