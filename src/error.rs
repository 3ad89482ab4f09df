//! Error type for the differentiation entry points.
//!
//! Every variant is a caller/usage error detected before the user function is
//! evaluated and before any output array is written. Nothing here is
//! transient: the caller fixes the parameters and calls again.

use crate::sparsity::Sparsity;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// A usage error raised by `gradient`, `jacobian`, or [`Workspace`] construction.
///
/// [`Workspace`]: crate::Workspace
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An output vector's length disagrees with the input length.
    #[error("output length {got} does not match input length {expected}")]
    ShapeMismatch {
        /// Required length (`x.len()`).
        expected: usize,
        /// Length the caller supplied.
        got: usize,
    },

    /// The Jacobian storage array has the wrong shape for the descriptor.
    #[error("jacobian storage must be {rows}x{cols} for this sparsity, got {got_rows}x{got_cols}")]
    StorageShape {
        /// Required row count.
        rows: usize,
        /// Required column count.
        cols: usize,
        /// Row count the caller supplied.
        got_rows: usize,
        /// Column count of the first offending row.
        got_cols: usize,
    },

    /// Bandwidth is zero, even, or exceeds the number of variables.
    #[error("bandwidth {bandwidth} is invalid for {n} variables: must be odd and in 1..={n}")]
    InvalidBandwidth {
        /// Claimed bandwidth.
        bandwidth: usize,
        /// Number of variables.
        n: usize,
    },

    /// Blocksize is zero, exceeds the number of variables, or does not divide it.
    #[error("blocksize {blocksize} is invalid for {n} variables: must divide {n} and be in 1..={n}")]
    InvalidBlocksize {
        /// Claimed blocksize.
        blocksize: usize,
        /// Number of variables.
        n: usize,
    },

    /// A supplied workspace was built for a different sparsity descriptor.
    #[error("workspace was built for {built:?} but {requested:?} was requested")]
    WorkspaceSparsity {
        /// Descriptor the workspace was constructed with.
        built: Sparsity,
        /// Descriptor requested for this call.
        requested: Sparsity,
    },

    /// A supplied workspace was built for a different problem size.
    #[error("workspace was built for {built} variables but the input has {requested}")]
    WorkspaceSize {
        /// Size the workspace was constructed with.
        built: usize,
        /// Size of this call's input.
        requested: usize,
    },
}
