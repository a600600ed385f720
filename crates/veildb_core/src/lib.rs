//! # VeilDB Core
//!
//! A durable, ordered key-value store wrapper over an embedded RocksDB
//! engine.
//!
//! This crate provides:
//! - Generic encoding of typed keys and values via [`veildb_codec`]
//! - Transparent XOR obfuscation of stored value bytes
//! - Atomic multi-operation write batches with selectable durability
//! - Forward iteration over the full keyspace
//!
//! Keys are never obfuscated, only values; the obfuscation key itself is
//! persisted raw under a reserved entry and survives restarts. Obfuscation
//! deters casual inspection of storage files and is not a cryptographic
//! guarantee.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veildb_core::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("my_store"))?;
//!
//! store.write(&"alpha", &42u64, false)?;
//!
//! let mut batch = store.batch();
//! batch.put(&"beta", &7u64)?;
//! batch.delete(&"alpha")?;
//! store.write_batch(batch, true)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod iter;
mod obfuscate;
mod store;

pub use batch::{Batch, BatchOp};
pub use config::{StoreConfig, DEFAULT_CACHE_SIZE};
pub use error::{StoreError, StoreResult};
pub use iter::StoreIter;
pub use obfuscate::{ObfuscationKey, OBFUSCATE_KEY_LEN};
pub use store::Store;
