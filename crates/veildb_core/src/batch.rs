//! Atomic write batches.

use crate::error::StoreResult;
use crate::obfuscate::ObfuscationKey;
use serde::Serialize;

/// A single staged operation over already-encoded byte payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite an entry.
    Put {
        /// Encoded key bytes. Keys are never obfuscated.
        key: Vec<u8>,
        /// Encoded value bytes, already obfuscated.
        value: Vec<u8>,
    },
    /// Remove an entry.
    Delete {
        /// Encoded key bytes.
        key: Vec<u8>,
    },
}

/// An ordered accumulator of put/delete operations applied as one atomic
/// unit.
///
/// A batch is created by [`Store::batch`](crate::Store::batch), populated by
/// a single logical writer, and handed back to
/// [`Store::write_batch`](crate::Store::write_batch) exactly once. It is not
/// meant for concurrent mutation.
pub struct Batch<'a> {
    ops: Vec<BatchOp>,
    obfuscate_key: &'a ObfuscationKey,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(obfuscate_key: &'a ObfuscationKey) -> Self {
        Self {
            ops: Vec::new(),
            obfuscate_key,
        }
    }

    /// Stages a put of `value` under `key`.
    ///
    /// Both are encoded immediately; the value bytes are obfuscated with the
    /// store's resident key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value cannot be encoded.
    pub fn put<K, V>(&mut self, key: &K, value: &V) -> StoreResult<()>
    where
        K: Serialize,
        V: Serialize,
    {
        let key_bytes = veildb_codec::to_tagged_cbor(key)?;
        let mut value_bytes = veildb_codec::to_tagged_cbor(value)?;
        self.obfuscate_key.apply(&mut value_bytes);
        self.ops.push(BatchOp::Put {
            key: key_bytes,
            value: value_bytes,
        });
        Ok(())
    }

    /// Stages a delete of `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be encoded.
    pub fn delete<K: Serialize>(&mut self, key: &K) -> StoreResult<()> {
        let key_bytes = veildb_codec::to_tagged_cbor(key)?;
        self.ops.push(BatchOp::Delete { key: key_bytes });
        Ok(())
    }

    /// Returns the number of staged operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if no operations are staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the staged operations in submission order.
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Converts the staged operations into an engine batch, preserving
    /// order.
    pub(crate) fn into_engine_batch(self) -> rocksdb::WriteBatch {
        let mut engine_batch = rocksdb::WriteBatch::default();
        for op in self.ops {
            match op {
                BatchOp::Put { key, value } => engine_batch.put(key, value),
                BatchOp::Delete { key } => engine_batch.delete(key),
            }
        }
        engine_batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_are_staged_in_order() {
        let key = ObfuscationKey::empty();
        let mut batch = Batch::new(&key);
        batch.put(&"alpha", &1u64).unwrap();
        batch.delete(&"beta").unwrap();
        batch.put(&"gamma", &2u64).unwrap();

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], BatchOp::Put { .. }));
        assert!(matches!(batch.ops()[1], BatchOp::Delete { .. }));
        assert!(matches!(batch.ops()[2], BatchOp::Put { .. }));
    }

    #[test]
    fn new_batch_is_empty() {
        let key = ObfuscationKey::empty();
        let batch = Batch::new(&key);
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn put_obfuscates_value_bytes_only() {
        let key = ObfuscationKey::from_bytes(vec![0x5a; 8]);
        let mut batch = Batch::new(&key);
        batch.put(&"k", &"payload").unwrap();

        let plain_key = veildb_codec::to_tagged_cbor(&"k").unwrap();
        let plain_value = veildb_codec::to_tagged_cbor(&"payload").unwrap();

        match &batch.ops()[0] {
            BatchOp::Put { key: k, value: v } => {
                assert_eq!(k, &plain_key);
                assert_ne!(v, &plain_value);

                let mut unmasked = v.clone();
                key.apply(&mut unmasked);
                assert_eq!(unmasked, plain_value);
            }
            BatchOp::Delete { .. } => panic!("expected a put"),
        }
    }

    #[test]
    fn empty_key_stages_plain_value_bytes() {
        let key = ObfuscationKey::empty();
        let mut batch = Batch::new(&key);
        batch.put(&"k", &42u64).unwrap();

        let plain_value = veildb_codec::to_tagged_cbor(&42u64).unwrap();
        match &batch.ops()[0] {
            BatchOp::Put { value, .. } => assert_eq!(value, &plain_value),
            BatchOp::Delete { .. } => panic!("expected a put"),
        }
    }
}
