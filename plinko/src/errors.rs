//! Error taxonomy for the iPRF and TablePRP constructors and accessors.

use core::fmt;

/// Errors surfaced by this crate's public API.
///
/// Forward/inverse evaluation on `IPRF` never fails once constructed:
/// out-of-range arguments are absorbed instead (see
/// `IPRF::forward`/`IPRF::inverse`). Only construction, key conversion, and
/// `TablePrp`'s table lookups can fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CoreError {
    /// Key material whose byte length differs from the required 16 bytes.
    InvalidKeyLength { actual: usize },
    /// Domain or range size of zero at construction time.
    InvalidDomain { n: u64, m: u64 },
    /// `TablePrp::forward`/`inverse` called with an argument outside `[0, bound)`.
    OutOfRangeArgument { value: u64, bound: u64 },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidKeyLength { actual } => {
                write!(f, "key must be 16 bytes, got {actual}")
            }
            CoreError::InvalidDomain { n, m } => {
                write!(f, "domain and range must be non-zero, got n={n}, m={m}")
            }
            CoreError::OutOfRangeArgument { value, bound } => {
                write!(f, "argument {value} out of range [0, {bound})")
            }
        }
    }
}

impl std::error::Error for CoreError {}
