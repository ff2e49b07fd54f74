//! Plinko iPRF library
//!
//! Core primitives for the invertible pseudorandom function (iPRF) at the
//! heart of the Plinko PIR scheme (Corrigan-Gibbs et al., ePrint 2022/1483):
//!
//! - `iprf`: the binomial-tree iPRF, forward evaluation and output-sensitive
//!   inverse enumeration.
//! - `table_prp`: a table-backed pseudorandom permutation with O(1) forward
//!   and inverse, built from a deterministic Fisher–Yates shuffle.
//! - `prf`: the single-block keyed PRF (AES-128) underneath both.
//! - `rbg`: the deterministic counter-mode random-bit generator used by
//!   `table_prp`'s shuffle.
//! - `keys`: node-identifier encoding and key derivation.
//! - `binomial`: the binomial inverse-CDF sampler driving the iPRF's tree
//!   splits.
//! - `errors`: the crate's error taxonomy.
//!
//! This crate is a purely in-process library: no I/O, no persistence, no
//! network transport. An `IPRF` or `TablePrp` is fully reconstructible from
//! `(key, n, m)` alone, which is what lets Plinko hints stay valid across
//! server restarts.

pub mod binomial;
pub mod errors;
pub mod iprf;
pub mod keys;
pub mod prf;
pub mod rbg;
pub mod table_prp;

pub use errors::CoreError;
pub use iprf::Iprf;
pub use keys::{derive_iprf_key, encode_node, DerivedKey};
pub use prf::BlockPrf;
pub use rbg::CounterRbg;
pub use table_prp::TablePrp;
