//! Table-backed pseudorandom permutation built from a deterministic
//! Fisher–Yates shuffle (component E).

use tracing::debug;

use crate::errors::CoreError;
use crate::keys::DerivedKey;
use crate::rbg::CounterRbg;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Perfect bijection on `[0, n)` with O(1) forward and inverse lookups.
///
/// Immutable after construction; `forward`/`inverse` tables are plain
/// `Vec<u64>`, so cloning is O(n) but safe to share across threads as
/// read-only data (wrap in `Arc` for zero-copy sharing).
pub struct TablePrp {
    domain: u64,
    forward: Vec<u64>,
    inverse: Vec<u64>,
}

impl TablePrp {
    /// Build a table-backed PRP over `[0, n)` keyed by `key`, via Fisher–
    /// Yates driven by a [`CounterRbg`] seeded from `key`.
    ///
    /// Fails with [`CoreError::InvalidKeyLength`] if `key` is not 16 bytes,
    /// or [`CoreError::InvalidDomain`] if `n == 0`.
    pub fn new(n: u64, key: &[u8]) -> Result<Self, CoreError> {
        let key = DerivedKey::try_from(key)?;
        if n == 0 {
            return Err(CoreError::InvalidDomain { n, m: 0 });
        }

        let mut perm: Vec<u64> = (0..n).collect();
        let mut rbg = CounterRbg::new(key);

        #[cfg(feature = "progress")]
        let bar = progress_bar(n);

        for i in (1..n).rev() {
            let j = rbg.uint64_n(i + 1);
            perm.swap(i as usize, j as usize);

            #[cfg(feature = "progress")]
            if i % (n / 100).max(1) == 0 {
                bar.set_position(n - i);
            }
        }

        #[cfg(feature = "progress")]
        bar.finish_and_clear();

        let (forward, inverse) = build_tables(&perm);

        debug!(n, "constructed TablePrp");

        Ok(Self {
            domain: n,
            forward,
            inverse,
        })
    }

    /// Domain size `n`.
    pub fn domain(&self) -> u64 {
        self.domain
    }

    /// `P(x)`. Fails with [`CoreError::OutOfRangeArgument`] if `x >= n`.
    pub fn forward(&self, x: u64) -> Result<u64, CoreError> {
        self.forward
            .get(x as usize)
            .copied()
            .ok_or(CoreError::OutOfRangeArgument {
                value: x,
                bound: self.domain,
            })
    }

    /// `P^-1(y)`. Fails with [`CoreError::OutOfRangeArgument`] if `y >= n`.
    pub fn inverse(&self, y: u64) -> Result<u64, CoreError> {
        self.inverse
            .get(y as usize)
            .copied()
            .ok_or(CoreError::OutOfRangeArgument {
                value: y,
                bound: self.domain,
            })
    }

    /// Verify the tables form a valid bijection: complete, and round-trip
    /// consistent for every `x`. Runs in `O(n)`; intended for tests.
    pub fn verify_bijection(&self) -> bool {
        if self.forward.len() as u64 != self.domain || self.inverse.len() as u64 != self.domain {
            return false;
        }
        (0..self.domain).all(|x| {
            let y = self.forward[x as usize];
            y < self.domain && self.inverse[y as usize] == x
        })
    }
}

#[cfg(feature = "progress")]
fn progress_bar(n: u64) -> ProgressBar {
    let bar = ProgressBar::new(n);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} shuffled ({eta} remaining)")
    {
        bar.set_style(style);
    }
    bar
}

// `inverse[perm[x]] = x` is a scatter write: every slot is touched exactly
// once (perm is a bijection), but target indices aren't contiguous, so
// there's no safe data-parallel split without extra bookkeeping. Only the
// `forward` copy, a pure element-wise clone, is worth parallelizing.
#[cfg(feature = "parallel")]
fn build_tables(perm: &[u64]) -> (Vec<u64>, Vec<u64>) {
    use rayon::prelude::*;

    let forward: Vec<u64> = perm.par_iter().copied().collect();
    let mut inverse = vec![0u64; perm.len()];
    for (x, &y) in perm.iter().enumerate() {
        inverse[y as usize] = x as u64;
    }
    (forward, inverse)
}

#[cfg(not(feature = "parallel"))]
fn build_tables(perm: &[u64]) -> (Vec<u64>, Vec<u64>) {
    let forward = perm.to_vec();
    let mut inverse = vec![0u64; perm.len()];
    for (x, &y) in perm.iter().enumerate() {
        inverse[y as usize] = x as u64;
    }
    (forward, inverse)
}
