//! Forward iteration over raw store entries.

use crate::error::{StoreError, StoreResult};
use rocksdb::DBRawIterator;
use serde::Serialize;

/// An owned forward cursor over all entries in key order.
///
/// The cursor yields raw encoded key and value bytes; values are still
/// obfuscated, and the caller is responsible for de-obfuscating (via
/// [`ObfuscationKey::apply`](crate::ObfuscationKey::apply)) and decoding
/// them. Engine resources backing the cursor are released when it is
/// dropped, on every exit path.
pub struct StoreIter<'a> {
    inner: DBRawIterator<'a>,
}

impl<'a> StoreIter<'a> {
    pub(crate) fn new(inner: DBRawIterator<'a>) -> Self {
        Self { inner }
    }

    /// Positions the cursor at the first entry.
    pub fn seek_to_first(&mut self) {
        self.inner.seek_to_first();
    }

    /// Positions the cursor at the first entry at or after `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be encoded.
    pub fn seek<K: Serialize>(&mut self, key: &K) -> StoreResult<()> {
        let key_bytes = veildb_codec::to_tagged_cbor(key)?;
        self.inner.seek(key_bytes);
        Ok(())
    }

    /// Returns true if the cursor is positioned on an entry.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    /// Advances the cursor to the next entry in key order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.inner.next();
    }

    /// Returns the raw encoded key bytes at the cursor position.
    #[must_use]
    pub fn key(&self) -> Option<&[u8]> {
        self.inner.key()
    }

    /// Returns the raw value bytes at the cursor position, still obfuscated.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.inner.value()
    }

    /// Surfaces any engine error encountered while iterating.
    ///
    /// An exhausted cursor is indistinguishable from one stopped by an
    /// engine failure until this is checked.
    pub fn status(&self) -> StoreResult<()> {
        self.inner.status().map_err(StoreError::from)
    }
}
