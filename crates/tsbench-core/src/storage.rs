//! Storage capability contract.
//!
//! Every engine benchmarked by tsbench is driven through [`Db`] and the
//! [`DbIterator`] it hands out. Ranges are inclusive on both ends.

/// A single key-value write, the unit of both single and batched writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    /// Encoded key
    pub key: Vec<u8>,
    /// Encoded value
    pub value: Vec<u8>,
}

impl Write {
    /// Creates a write from borrowed key and value bytes
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Storage engine trait
pub trait Db {
    /// Short engine label used in reports and errors
    fn name(&self) -> &'static str;

    /// Writes one key-value pair
    fn write(&self, key: &[u8], value: &[u8]) -> crate::Result<()> {
        self.batch_write(&[Write::new(key, value)])
    }

    /// Applies every write atomically
    ///
    /// When keys collide within the batch, the later write wins.
    fn batch_write(&self, writes: &[Write]) -> crate::Result<()>;

    /// Deletes every key `k` with `start <= k <= end`
    ///
    /// Deleting an empty range is a no-op.
    fn del(&self, start: &[u8], end: &[u8]) -> crate::Result<()>;

    /// Opens an iterator over `start <= k <= end`
    ///
    /// The iterator is positioned before the first key; call
    /// [`DbIterator::next`] to move onto it.
    fn get_range<'a>(&'a self, start: &[u8], end: &[u8])
        -> crate::Result<Box<dyn DbIterator + 'a>>;
}

/// Forward cursor over a key range.
///
/// Implementations release their native handles in `Drop` as well as in
/// [`DbIterator::close`], so an iterator abandoned on an error path does not
/// leak a transaction.
pub trait DbIterator {
    /// Advances to the next entry. Returns `false` once the range is exhausted.
    fn next(&mut self) -> crate::Result<bool>;

    /// Key of the current entry
    fn key(&self) -> crate::Result<&[u8]>;

    /// Value of the current entry
    fn value(&self) -> crate::Result<&[u8]>;

    /// Releases the iterator, reporting any error from the release itself
    fn close(self: Box<Self>) -> crate::Result<()>;
}

/// Drains a range, returning the number of entries visited.
///
/// The iterator is closed on success; on error it is released by `Drop`.
pub fn count_range<D: Db + ?Sized>(db: &D, start: &[u8], end: &[u8]) -> crate::Result<usize> {
    let mut iter = db.get_range(start, end)?;
    let mut count = 0;
    while iter.next()? {
        count += 1;
    }
    iter.close()?;
    Ok(count)
}
