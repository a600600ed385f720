//! XOR obfuscation of stored value bytes.
//!
//! The obfuscation key deters casual inspection of raw storage files. It
//! provides no cryptographic guarantee: the key is persisted in the store
//! itself, unmasked, under a reserved entry.

use rand::RngCore;

/// Length in bytes of a generated obfuscation key.
pub const OBFUSCATE_KEY_LEN: usize = 8;

/// Reserved storage key the obfuscation key is persisted under.
///
/// The NUL prefix keeps the marker outside the printable key space used by
/// callers. The entry's value is the raw key bytes, never obfuscated.
pub(crate) const OBFUSCATE_KEY_MARKER: &str = "\0obfuscate_key";

/// A fixed-length random byte mask XORed into stored value bytes.
///
/// The key may be empty for stores created before obfuscation existed; the
/// empty key leaves data untouched. Once generated for a store, the key
/// bytes are immutable for the lifetime of that store's on-disk data.
#[derive(Clone, PartialEq, Eq)]
pub struct ObfuscationKey {
    bytes: Vec<u8>,
}

impl ObfuscationKey {
    /// Generates a fresh random key of [`OBFUSCATE_KEY_LEN`] bytes.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; OBFUSCATE_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from bytes read back from the reserved entry.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Creates the empty key, whose transform is the identity.
    #[must_use]
    pub fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Returns true if the key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the key as a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// XORs the key into `data` in place.
    ///
    /// Each output byte is `data[i] ^ key[i mod len]`. Applying the
    /// transform twice restores the original bytes. The empty key leaves
    /// `data` untouched.
    pub fn apply(&self, data: &mut [u8]) {
        if self.bytes.is_empty() {
            return;
        }
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= self.bytes[i % self.bytes.len()];
        }
    }
}

impl std::fmt::Debug for ObfuscationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObfuscationKey")
            .field("bytes", &self.to_hex())
            .finish()
    }
}
