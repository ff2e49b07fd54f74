//! Node identifiers and deterministic key derivation (component C).

use sha2::{Digest, Sha256};

use crate::errors::CoreError;

/// Domain separator baked into [`derive_iprf_key`]. Must never change: the
/// derivation is part of the cross-implementation contract.
const KEY_DERIVATION_CONTEXT: &[u8] = b"iprf-key-derivation-v1";

/// A 16-byte key consumed by the Block-PRF (component A) and TablePRP's
/// Counter RBG (component B).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DerivedKey([u8; 16]);

impl DerivedKey {
    /// Wrap a caller-owned 16-byte key directly (no hashing).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// Manual Debug impl so key material never ends up in a log line.
impl core::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for DerivedKey {
    type Error = CoreError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() != 16 {
            return Err(CoreError::InvalidKeyLength {
                actual: value.len(),
            });
        }
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(value);
        Ok(Self(bytes))
    }
}

/// Derive a deterministic 16-byte iPRF key from a master secret and a
/// context string: `SHA-256(master_secret ‖ separator ‖ context)`,
/// truncated to 16 bytes.
///
/// The separator is fixed and must be reproduced byte-for-byte by any
/// compatible implementation.
pub fn derive_iprf_key(master_secret: &[u8], context: &str) -> DerivedKey {
    let mut hasher = Sha256::new();
    hasher.update(master_secret);
    hasher.update(KEY_DERIVATION_CONTEXT);
    hasher.update(context.as_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; 16];
    key.copy_from_slice(&digest[0..16]);
    DerivedKey(key)
}

/// Collision-free 64-bit identifier for the tree node spanning bin interval
/// `[low, high]` under an iPRF of domain `n`.
///
/// `SHA-256(be_u64(low) ‖ be_u64(high) ‖ be_u64(n))`, first 8 bytes read
/// big-endian. `n` here is always the iPRF's *original* domain, never a
/// shrinking subtree ball count (collapsing the two would make forward and
/// inverse disagree on which bin an element lands in).
pub fn encode_node(low: u64, high: u64, n: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(low.to_be_bytes());
    hasher.update(high.to_be_bytes());
    hasher.update(n.to_be_bytes());
    let digest = hasher.finalize();
    u64::from_be_bytes(digest[0..8].try_into().unwrap())
}
