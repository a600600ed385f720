//! Store configuration.

use std::path::PathBuf;

/// Default total cache budget in bytes (8 MiB).
pub const DEFAULT_CACHE_SIZE: usize = 8 * 1024 * 1024;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the store directory.
    pub path: PathBuf,

    /// Total cache budget in bytes. Half goes to the engine's block cache
    /// (which also holds index and filter blocks), a quarter to the write
    /// buffer.
    pub cache_size: usize,

    /// Back the store with a volatile in-memory environment instead of
    /// persistent storage.
    pub in_memory: bool,

    /// Destroy any existing data at the path before opening.
    pub wipe: bool,

    /// Maximum number of files the engine keeps open.
    pub max_open_files: i32,
}

impl StoreConfig {
    /// Creates a configuration for the given path with default values.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache_size: DEFAULT_CACHE_SIZE,
            in_memory: false,
            wipe: false,
            max_open_files: 64,
        }
    }

    /// Creates a configuration for testing (small cache, volatile backing).
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self::new(path).cache_size(1024 * 1024).in_memory(true)
    }

    /// Sets the total cache budget in bytes.
    #[must_use]
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Sets whether to back the store with a volatile environment.
    #[must_use]
    pub fn in_memory(mut self, value: bool) -> Self {
        self.in_memory = value;
        self
    }

    /// Sets whether to destroy existing data before opening.
    #[must_use]
    pub fn wipe(mut self, value: bool) -> Self {
        self.wipe = value;
        self
    }

    /// Sets the engine's open-file limit.
    #[must_use]
    pub fn max_open_files(mut self, value: i32) -> Self {
        self.max_open_files = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = StoreConfig::new("some/path");
        assert_eq!(config.path, PathBuf::from("some/path"));
        assert_eq!(config.cache_size, DEFAULT_CACHE_SIZE);
        assert!(!config.in_memory);
        assert!(!config.wipe);
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new("db")
            .cache_size(1024)
            .in_memory(true)
            .wipe(true)
            .max_open_files(16);

        assert_eq!(config.cache_size, 1024);
        assert!(config.in_memory);
        assert!(config.wipe);
        assert_eq!(config.max_open_files, 16);
    }

    #[test]
    fn testing_preset_is_volatile() {
        let config = StoreConfig::for_testing("t");
        assert!(config.in_memory);
        assert!(config.cache_size < DEFAULT_CACHE_SIZE);
    }
}
