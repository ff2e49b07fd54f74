//! The binomial-tree invertible PRF: forward evaluation and output-sensitive
//! inverse enumeration (component D).

use tracing::trace;

use crate::binomial::sample_binomial;
use crate::errors::CoreError;
use crate::keys::{encode_node, DerivedKey};
use crate::prf::BlockPrf;

/// Invertible pseudorandom function mapping `[0, n)` onto `[0, m)`.
///
/// Immutable after construction; cheap to `Clone` (the only owned state is
/// the block cipher's key schedule), so independent copies can be handed to
/// worker threads for concurrent forward/inverse evaluation.
#[derive(Clone)]
pub struct Iprf {
    prf: BlockPrf,
    domain: u64,
    range: u64,
    tree_depth: u32,
}

impl Iprf {
    /// Construct an iPRF over `[0, n) -> [0, m)` keyed by `key`.
    ///
    /// Fails with [`CoreError::InvalidKeyLength`] if `key` is not 16 bytes,
    /// or [`CoreError::InvalidDomain`] if `n == 0` or `m == 0`.
    pub fn new(key: &[u8], n: u64, m: u64) -> Result<Self, CoreError> {
        let key = DerivedKey::try_from(key)?;
        if n == 0 || m == 0 {
            return Err(CoreError::InvalidDomain { n, m });
        }

        let tree_depth = if m <= 1 {
            0
        } else {
            (m as f64).log2().ceil() as u32
        };

        trace!(n, m, tree_depth, "constructed iPRF");

        Ok(Self {
            prf: BlockPrf::new(key),
            domain: n,
            range: m,
            tree_depth,
        })
    }

    /// Domain size `n`.
    pub fn domain(&self) -> u64 {
        self.domain
    }

    /// Range size `m`.
    pub fn range(&self) -> u64 {
        self.range
    }

    /// `⌈log₂ m⌉`, recorded for capacity estimates only (not consulted by
    /// `forward`/`inverse`).
    pub fn tree_depth(&self) -> u32 {
        self.tree_depth
    }

    /// Expected preimage size `⌈n / m⌉`.
    pub fn expected_preimage_size(&self) -> u64 {
        (self.domain + self.range - 1) / self.range
    }

    /// Evaluate `x ∈ [0, n) -> y ∈ [0, m)`.
    ///
    /// `x >= n` is absorbed and returns `0`; this call never fails.
    pub fn forward(&self, x: u64) -> u64 {
        if x >= self.domain {
            return 0;
        }
        if self.range == 1 {
            return 0;
        }

        let mut low = 0u64;
        let mut high = self.range - 1;
        let mut ball_count = self.domain;
        let mut ball_index = x;

        while low < high {
            let mid = (low + high) / 2;
            let left_bins = mid - low + 1;
            let total_bins = high - low + 1;
            let p = left_bins as f64 / total_bins as f64;

            let node_id = encode_node(low, high, self.domain);
            let left_count = sample_binomial(self.prf.prf_eval(node_id), ball_count, p);

            if ball_index < left_count {
                high = mid;
                ball_count = left_count;
            } else {
                low = mid + 1;
                ball_index -= left_count;
                ball_count -= left_count;
            }
        }

        low
    }

    /// Enumerate all `x ∈ [0, n)` with `forward(x) == y`, sorted ascending.
    ///
    /// `y >= m` is absorbed and returns an empty list; this call never
    /// fails.
    pub fn inverse(&self, y: u64) -> Vec<u64> {
        if y >= self.range {
            return Vec::new();
        }
        if self.range == 1 {
            return (0..self.domain).collect();
        }

        let mut result = Vec::new();
        self.enumerate_recursive(y, 0, self.range - 1, self.domain, 0, self.domain - 1, &mut result);
        result.sort_unstable();
        result
    }

    /// Recursive inverse tree walk. `n_original` (`self.domain`) is fixed
    /// across the whole recursion and used only for node-ID generation;
    /// `ball_count` (= `end_idx - start_idx + 1`) shrinks per subtree and
    /// drives the binomial split. Collapsing the two breaks bit-exactness
    /// with `forward`.
    #[allow(clippy::too_many_arguments)]
    fn enumerate_recursive(
        &self,
        target: u64,
        low: u64,
        high: u64,
        ball_count: u64,
        start_idx: u64,
        end_idx: u64,
        result: &mut Vec<u64>,
    ) {
        if ball_count == 0 {
            return;
        }

        if low == high {
            if low == target {
                result.extend(start_idx..=end_idx);
            }
            return;
        }

        let mid = (low + high) / 2;
        let left_bins = mid - low + 1;
        let total_bins = high - low + 1;
        let p = left_bins as f64 / total_bins as f64;

        let node_id = encode_node(low, high, self.domain);
        let left_count = sample_binomial(self.prf.prf_eval(node_id), ball_count, p);
        let right_count = ball_count - left_count;
        let split_idx = start_idx + left_count;

        if target <= mid {
            if left_count > 0 {
                self.enumerate_recursive(target, low, mid, left_count, start_idx, split_idx - 1, result);
            }
        } else if right_count > 0 {
            self.enumerate_recursive(target, mid + 1, high, right_count, split_idx, end_idx, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::derive_iprf_key;
    use std::collections::HashSet;

    fn test_key() -> [u8; 16] {
        *derive_iprf_key(b"test-key", "suite").as_bytes()
    }

    #[test]
    fn construction_rejects_bad_key_length() {
        let err = Iprf::new(&[0u8; 15], 1000, 100).unwrap_err();
        assert_eq!(err, CoreError::InvalidKeyLength { actual: 15 });
    }

    #[test]
    fn construction_rejects_zero_domain_or_range() {
        let key = test_key();
        assert_eq!(
            Iprf::new(&key, 0, 100).unwrap_err(),
            CoreError::InvalidDomain { n: 0, m: 100 }
        );
        assert_eq!(
            Iprf::new(&key, 100, 0).unwrap_err(),
            CoreError::InvalidDomain { n: 100, m: 0 }
        );
    }

    #[test]
    fn forward_range_property() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        for x in 0..1000u64 {
            assert!(iprf.forward(x) < 100);
        }
    }

    #[test]
    fn determinism_across_instances() {
        let key = test_key();
        let a = Iprf::new(&key, 1000, 100).unwrap();
        let b = Iprf::new(&key, 1000, 100).unwrap();
        for x in 0..1000u64 {
            assert_eq!(a.forward(x), b.forward(x));
        }
    }

    #[test]
    fn inverse_soundness_and_completeness() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();

        let mut expected: Vec<Vec<u64>> = vec![Vec::new(); 100];
        for x in 0..1000u64 {
            expected[iprf.forward(x) as usize].push(x);
        }

        for y in 0..100u64 {
            let got = iprf.inverse(y);
            assert_eq!(got, expected[y as usize]);
            for &x in &got {
                assert_eq!(iprf.forward(x), y);
            }
        }
    }

    #[test]
    fn inverse_is_strictly_increasing() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        for y in 0..100u64 {
            let got = iprf.inverse(y);
            for w in got.windows(2) {
                assert!(w[0] < w[1]);
            }
        }
    }

    #[test]
    fn round_trip() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        for x in 0..1000u64 {
            let y = iprf.forward(x);
            assert!(iprf.inverse(y).contains(&x));
        }
    }

    #[test]
    fn mass_conservation() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        let total: usize = (0..100u64).map(|y| iprf.inverse(y).len()).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn distribution_sanity_at_scale() {
        let key = test_key();
        let iprf = Iprf::new(&key, 10_000, 100).unwrap();

        let sizes: Vec<usize> = (0..100u64).map(|y| iprf.inverse(y).len()).collect();
        assert!(sizes.iter().all(|&s| s > 0));

        let mean: f64 = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        assert_eq!(mean, 100.0);

        let max = *sizes.iter().max().unwrap();
        assert!(max < 200, "max bin size {max} too large");

        let variance: f64 = sizes
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / sizes.len() as f64;
        assert!(variance.sqrt() < 50.0);
    }

    #[test]
    fn m_equals_one_maps_everything_to_zero() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 1).unwrap();
        for x in 0..1000u64 {
            assert_eq!(iprf.forward(x), 0);
        }
        assert_eq!(iprf.inverse(0), (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_domain_forward_is_absorbed() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        assert_eq!(iprf.forward(1500), 0);
    }

    #[test]
    fn out_of_range_inverse_is_absorbed() {
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        assert_eq!(iprf.inverse(500), Vec::<u64>::new());
    }

    #[test]
    fn expected_preimage_size_matches_ceiling_division() {
        let key = test_key();
        assert_eq!(Iprf::new(&key, 1000, 100).unwrap().expected_preimage_size(), 10);
        assert_eq!(Iprf::new(&key, 1001, 100).unwrap().expected_preimage_size(), 11);
    }

    #[test]
    fn forward_values_are_spread_across_range_not_collapsed() {
        // Regression guard for the "two domain parameters" bug: if an
        // implementation collapsed n_original into ball_count, forward
        // and inverse would silently disagree on some inputs.
        let key = test_key();
        let iprf = Iprf::new(&key, 1000, 100).unwrap();
        let outputs: HashSet<u64> = (0..1000u64).map(|x| iprf.forward(x)).collect();
        assert!(outputs.len() > 1);
    }
}
