//! Single-block keyed PRF over 128-bit inputs (component A).

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::keys::DerivedKey;

/// A keyed pseudorandom function built from AES-128 in single-block ECB
/// mode, truncated to its high 8 output bytes.
///
/// `prf_eval` is deterministic given the key and cannot fail. The key
/// schedule is built once at construction; cloning an `Aes128` instance is
/// cheap, so `BlockPrf` is `Clone` and safe to hand to worker threads.
#[derive(Clone)]
pub struct BlockPrf {
    cipher: Aes128,
}

impl BlockPrf {
    pub fn new(key: DerivedKey) -> Self {
        Self {
            cipher: Aes128::new(GenericArray::from_slice(key.as_bytes())),
        }
    }

    /// Evaluate the PRF at `x`: encrypt a block with `x` in the low 8 bytes
    /// (big-endian) and the high 8 bytes zero, returning the high 8
    /// ciphertext bytes as a big-endian `u64`.
    pub fn prf_eval(&self, x: u64) -> u64 {
        let mut block = [0u8; 16];
        block[8..16].copy_from_slice(&x.to_be_bytes());
        self.encrypt_raw_block(block)
    }

    /// Encrypt a caller-assembled 16-byte block and return its high 8 bytes
    /// as a big-endian `u64`. Used by `CounterRbg`, whose input layout
    /// differs from `prf_eval`'s.
    pub(crate) fn encrypt_raw_block(&self, block: [u8; 16]) -> u64 {
        let mut block = GenericArray::from(block);
        self.cipher.encrypt_block(&mut block);
        u64::from_be_bytes(block[0..8].try_into().unwrap())
    }
}
