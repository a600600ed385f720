//! Store handle over the embedded engine.

use crate::batch::Batch;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::iter::StoreIter;
use crate::obfuscate::{ObfuscationKey, OBFUSCATE_KEY_MARKER};
use rocksdb::{BlockBasedOptions, Cache, Env, Options, ReadOptions, WriteOptions, DB};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// A durable, ordered key-value store with transparent value obfuscation.
///
/// `Store` wraps an embedded RocksDB instance and adds generic encoding of
/// typed keys and values, XOR obfuscation of stored value bytes, and atomic
/// multi-operation batches with selectable durability.
///
/// The handle exclusively owns the engine instance and every resource
/// acquired at open time (block cache, volatile environment); all are
/// released, engine first, when the store is closed or dropped. The engine
/// holds an exclusive lock over the storage path, so only one handle can be
/// open per path at a time.
///
/// The wrapper adds no locking of its own: the engine serializes writers and
/// allows concurrent reads. A [`Batch`] must be built and submitted by a
/// single logical writer.
///
/// # Opening a Store
///
/// ```rust,ignore
/// use veildb_core::{Store, StoreConfig};
///
/// let store = Store::open(StoreConfig::new("my_store"))?;
/// store.write(&"alpha", &42u64, false)?;
/// assert_eq!(store.read::<_, u64>(&"alpha")?, Some(42));
/// ```
pub struct Store {
    /// The engine itself. Declared first so it is released before the cache
    /// and environment it uses.
    db: DB,
    /// Block cache shared by data blocks and index/filter blocks.
    #[allow(dead_code)]
    cache: Cache,
    /// Volatile environment backing in-memory stores.
    #[allow(dead_code)]
    env: Option<Env>,
    /// Resident obfuscation key, XORed into stored value bytes.
    obfuscate_key: ObfuscationKey,
    /// Configuration the store was opened with.
    config: StoreConfig,
}

impl Store {
    /// Opens (or creates) a store with the given configuration.
    ///
    /// With `wipe` set, any existing data at the path is destroyed first.
    /// With `in_memory` set, the store is backed by a volatile environment
    /// and nothing touches disk. The cache budget is split between the
    /// engine's block cache (half, shared with index and filter blocks) and
    /// its write buffer (a quarter). The obfuscation key is loaded or
    /// initialized immediately after the engine opens.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be opened, wiped, or the
    /// obfuscation key cannot be initialized.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let cache = Cache::new_lru_cache(config.cache_size / 2);

        let mut block_options = BlockBasedOptions::default();
        block_options.set_block_cache(&cache);
        block_options.set_cache_index_and_filter_blocks(true);

        let mut options = Options::default();
        options.create_if_missing(true);
        options.set_block_based_table_factory(&block_options);
        options.set_write_buffer_size(config.cache_size / 4);
        options.set_max_open_files(config.max_open_files);

        let env = if config.in_memory {
            let env = Env::mem_env()?;
            options.set_env(&env);
            Some(env)
        } else {
            None
        };

        if config.wipe {
            info!(path = %config.path.display(), "wiping existing store");
            DB::destroy(&options, &config.path)?;
        }

        let db = DB::open(&options, &config.path)?;
        info!(path = %config.path.display(), in_memory = config.in_memory, "opened store");

        let mut store = Self {
            db,
            cache,
            env,
            obfuscate_key: ObfuscationKey::empty(),
            config,
        };
        store.init_obfuscate_key()?;
        Ok(store)
    }

    /// Loads the persisted obfuscation key, or creates one for a new store.
    ///
    /// The reserved entry is read and written while the resident key is
    /// still empty, so the entry itself is never obfuscated. A store that
    /// predates obfuscation and already holds data keeps the empty identity
    /// key; generating one would make its existing plain values unreadable.
    fn init_obfuscate_key(&mut self) -> StoreResult<()> {
        if let Some(bytes) = self.read::<_, Vec<u8>>(&OBFUSCATE_KEY_MARKER)? {
            self.obfuscate_key = ObfuscationKey::from_bytes(bytes);
            return Ok(());
        }

        if !self.is_empty()? {
            return Ok(());
        }

        let key = ObfuscationKey::generate();
        self.write(&OBFUSCATE_KEY_MARKER, &key.as_bytes().to_vec(), false)?;
        self.obfuscate_key = key;
        info!(key = %self.obfuscate_key.to_hex(), "created new obfuscation key");
        Ok(())
    }

    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent. Stored bytes that fail to
    /// decode are also reported as `None`: corruption of an individual value
    /// is indistinguishable from absence at this layer. Any other engine
    /// failure is fatal and raised as [`StoreError::Engine`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be encoded or the engine fails.
    pub fn read<K, V>(&self, key: &K) -> StoreResult<Option<V>>
    where
        K: Serialize,
        V: DeserializeOwned,
    {
        let key_bytes = veildb_codec::to_tagged_cbor(key)?;
        let stored = self
            .db
            .get_pinned_opt(&key_bytes, &Self::read_options())
            .map_err(|err| {
                error!(%err, "engine read failure");
                StoreError::from(err)
            })?;

        let stored = match stored {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let mut value_bytes = stored.to_vec();
        self.obfuscate_key.apply(&mut value_bytes);
        match veildb_codec::from_tagged_cbor(&value_bytes) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Ok(None),
        }
    }

    /// Returns true if an entry exists under `key`, without decoding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be encoded or the engine fails.
    pub fn exists<K: Serialize>(&self, key: &K) -> StoreResult<bool> {
        let key_bytes = veildb_codec::to_tagged_cbor(key)?;
        let stored = self
            .db
            .get_pinned_opt(&key_bytes, &Self::read_options())
            .map_err(|err| {
                error!(%err, "engine read failure");
                StoreError::from(err)
            })?;
        Ok(stored.is_some())
    }

    /// Writes a single key-value pair.
    ///
    /// With `sync` set, blocks until the write is durably flushed to stable
    /// storage; otherwise returns once the write is buffered.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the engine rejects the write.
    pub fn write<K, V>(&self, key: &K, value: &V, sync: bool) -> StoreResult<()>
    where
        K: Serialize,
        V: Serialize,
    {
        let mut batch = self.batch();
        batch.put(key, value)?;
        self.write_batch(batch, sync)
    }

    /// Erases a single key.
    ///
    /// Erasing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the engine rejects the write.
    pub fn erase<K: Serialize>(&self, key: &K, sync: bool) -> StoreResult<()> {
        let mut batch = self.batch();
        batch.delete(key)?;
        self.write_batch(batch, sync)
    }

    /// Creates a new empty batch bound to the resident obfuscation key.
    #[must_use]
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(&self.obfuscate_key)
    }

    /// Applies all operations staged in `batch` as one atomic engine write.
    ///
    /// Either every operation becomes visible or none does; readers never
    /// observe an intermediate state, even across a crash. With `sync` set,
    /// blocks until the batch is durably flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the write.
    pub fn write_batch(&self, batch: Batch<'_>, sync: bool) -> StoreResult<()> {
        let mut write_options = WriteOptions::default();
        write_options.set_sync(sync);
        self.db
            .write_opt(batch.into_engine_batch(), &write_options)
            .map_err(|err| {
                error!(%err, "engine write failure");
                StoreError::from(err)
            })
    }

    /// Forces previously buffered writes to durable storage.
    ///
    /// Submits an empty batch with sync durability and blocks until it is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the write.
    pub fn sync(&self) -> StoreResult<()> {
        self.write_batch(self.batch(), true)
    }

    /// Does nothing and succeeds.
    ///
    /// Provided for interface parity with engines that require an explicit
    /// flush.
    pub fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Returns true if the store holds no entries other than the reserved
    /// obfuscation-key entry.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration fails.
    pub fn is_empty(&self) -> StoreResult<bool> {
        let marker = veildb_codec::to_tagged_cbor(&OBFUSCATE_KEY_MARKER)?;
        let mut iter = self.iter();
        iter.seek_to_first();
        while iter.valid() {
            if iter.key() != Some(marker.as_slice()) {
                return Ok(false);
            }
            iter.next();
        }
        iter.status()?;
        Ok(true)
    }

    /// Returns a forward cursor over all entries in key order.
    ///
    /// The cursor yields raw encoded bytes; the caller de-obfuscates and
    /// decodes values. Iteration reads skip the block cache to avoid
    /// evicting hot entries.
    #[must_use]
    pub fn iter(&self) -> StoreIter<'_> {
        StoreIter::new(self.db.raw_iterator_opt(Self::iter_options()))
    }

    /// Returns the resident obfuscation key.
    #[must_use]
    pub fn obfuscate_key(&self) -> &ObfuscationKey {
        &self.obfuscate_key
    }

    /// Returns the resident obfuscation key as a hex string.
    #[must_use]
    pub fn obfuscate_key_hex(&self) -> String {
        self.obfuscate_key.to_hex()
    }

    /// Returns the store path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Returns the configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Closes the store.
    ///
    /// Releases the engine instance and every resource acquired at open
    /// time, in reverse order of acquisition. Dropping the store is
    /// equivalent.
    pub fn close(self) {
        info!(path = %self.config.path.display(), "closing store");
        drop(self);
    }

    fn read_options() -> ReadOptions {
        let mut options = ReadOptions::default();
        options.set_verify_checksums(true);
        options
    }

    fn iter_options() -> ReadOptions {
        let mut options = Self::read_options();
        options.fill_cache(false);
        options
    }
}
