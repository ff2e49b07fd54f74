//! Deterministic counter-mode random-bit generator (component B).

use rand_core::RngCore;

use crate::keys::DerivedKey;
use crate::prf::BlockPrf;

/// Deterministic counter-mode RBG driven by the Block-PRF.
///
/// Not safe for concurrent use: `uint64` mutates an internal counter. It is
/// only ever shared within a single `TablePrp::new` call, never across
/// threads.
pub struct CounterRbg {
    prf: BlockPrf,
    counter: u64,
}

impl CounterRbg {
    pub fn new(key: DerivedKey) -> Self {
        Self {
            prf: BlockPrf::new(key),
            counter: 0,
        }
    }

    /// Next uniform `u64`. The counter's high 32 bits go in the cipher
    /// input's *low* half, and the full counter's low 32 bits duplicate into
    /// the cipher input's *high* half, preserved bit-exactly because
    /// TablePRP output depends on it.
    pub fn uint64(&mut self) -> u64 {
        let c = self.counter;
        let mut block = [0u8; 16];
        block[0..8].copy_from_slice(&c.to_be_bytes());
        block[8..16].copy_from_slice(&(c >> 32).to_be_bytes());

        let r = self.prf.encrypt_raw_block(block);
        self.counter = self.counter.wrapping_add(1);
        r
    }

    /// Uniform integer in `[0, n)`, unbiased via rejection sampling.
    pub fn uint64_n(&mut self, n: u64) -> u64 {
        if n <= 1 {
            return 0;
        }
        if n.is_power_of_two() {
            return self.uint64() & (n - 1);
        }

        let max_val = u64::MAX;
        let threshold = max_val - (max_val % n);
        loop {
            let r = self.uint64();
            if r < threshold {
                return r % n;
            }
        }
    }
}

impl RngCore for CounterRbg {
    fn next_u32(&mut self) -> u32 {
        (self.uint64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.uint64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut chunks = dst.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.uint64().to_be_bytes());
        }
        let rem = chunks.into_remainder();
        if !rem.is_empty() {
            let word = self.uint64().to_be_bytes();
            rem.copy_from_slice(&word[..rem.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dst);
        Ok(())
    }
}
