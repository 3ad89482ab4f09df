//! Jacobian sparsity descriptors.
//!
//! The descriptor determines how many simultaneous seed directions one
//! evaluation carries and how the compressed derivative output is unpacked
//! back into Jacobian coordinates. Dense needs `n` directions (no
//! compression); a banded or block-diagonal structure gets away with
//! `bandwidth` or `blocksize` directions regardless of `n`.

use crate::error::{Error, Result};

/// Structure of the Jacobian, as claimed by the caller.
///
/// The engine trusts this claim: a bandwidth or blocksize that does not
/// actually bound the function's sparsity silently produces a wrong Jacobian
/// (seed slots alias). Validating the claim against the true structure is the
/// caller's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sparsity {
    /// No structure assumed; `n` seed directions, `n × n` output storage.
    Dense,
    /// Band of `bandwidth` diagonals centred on the main diagonal.
    ///
    /// `bandwidth` must be odd so the band is symmetric: half-bandwidth
    /// `h = (bandwidth - 1) / 2` off-diagonals on each side.
    /// Output storage is `bandwidth × n`, one row per diagonal.
    Banded {
        /// Total number of diagonals in the band.
        bandwidth: usize,
    },
    /// Independent dense blocks of `blocksize × blocksize` along the diagonal.
    ///
    /// `blocksize` must divide `n`. Output storage is `blocksize × n`, each
    /// block's sub-Jacobian stored densely in its own column range.
    BlockDiagonal {
        /// Side length of each diagonal block.
        blocksize: usize,
    },
}

impl Sparsity {
    /// Number of simultaneous seed directions one evaluation carries.
    #[inline]
    pub fn seed_width(self, n: usize) -> usize {
        match self {
            Sparsity::Dense => n,
            Sparsity::Banded { bandwidth } => bandwidth,
            Sparsity::BlockDiagonal { blocksize } => blocksize,
        }
    }

    /// Number of rows the caller's output storage must have.
    #[inline]
    pub fn rows(self, n: usize) -> usize {
        // Coincides with seed_width for all three variants, but the two
        // concepts are distinct: one sizes tangent vectors, the other sizes
        // the caller's array.
        self.seed_width(n)
    }

    /// Check the descriptor's parameters against the problem size.
    pub fn validate(self, n: usize) -> Result<()> {
        match self {
            Sparsity::Dense => Ok(()),
            Sparsity::Banded { bandwidth } => {
                if bandwidth == 0 || bandwidth > n || bandwidth % 2 == 0 {
                    Err(Error::InvalidBandwidth { bandwidth, n })
                } else {
                    Ok(())
                }
            }
            Sparsity::BlockDiagonal { blocksize } => {
                if blocksize == 0 || blocksize > n || n % blocksize != 0 {
                    Err(Error::InvalidBlocksize { blocksize, n })
                } else {
                    Ok(())
                }
            }
        }
    }
}
