//! Reusable dual-number storage for repeated Jacobian evaluations.
//!
//! Building the input and output dual vectors allocates `2·n` tangent slices
//! of `seed_width` floats each. For a solver that evaluates the same Jacobian
//! at many points, that cost is paid once by constructing a [`Workspace`] and
//! passing it to [`jacobian_with`](crate::jacobian_with); the convenience
//! wrapper [`jacobian`](crate::jacobian) builds a throwaway one per call.

use crate::dual::Dual;
use crate::error::Result;
use crate::float::Float;
use crate::sparsity::Sparsity;

/// Preallocated seeded storage for one `(Sparsity, n)` configuration.
///
/// The engine borrows the workspace exclusively for the duration of one
/// evaluation and leaves it dirty; reuse across calls is observationally
/// transparent. One workspace must not be shared between concurrent calls —
/// give each worker its own.
#[derive(Clone, Debug)]
pub struct Workspace<F: Float> {
    sparsity: Sparsity,
    inputs: Vec<Dual<F>>,
    outputs: Vec<Dual<F>>,
}

impl<F: Float> Workspace<F> {
    /// Allocate storage for `n` variables under the given sparsity descriptor.
    ///
    /// Fails if the descriptor's parameters are invalid for `n` (even or
    /// oversized bandwidth, non-divisor blocksize).
    pub fn new(sparsity: Sparsity, n: usize) -> Result<Self> {
        sparsity.validate(n)?;
        let width = sparsity.seed_width(n);
        Ok(Workspace {
            sparsity,
            inputs: (0..n).map(|_| Dual::constant(F::zero(), width)).collect(),
            outputs: (0..n).map(|_| Dual::constant(F::zero(), width)).collect(),
        })
    }

    /// The descriptor this workspace was built for.
    #[inline]
    pub fn sparsity(&self) -> Sparsity {
        self.sparsity
    }

    /// Number of variables this workspace was built for.
    #[inline]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the workspace holds zero variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Seed the inputs for an evaluation at `x`.
    ///
    /// Sets each input's primal to `x[j]`, zeroes every tangent, then places a
    /// unit tangent in the cyclically assigned slot `j mod seed_width`. For
    /// dense seeding the width is `n`, so every variable owns its own slot;
    /// for banded/block seeding the cyclic period is exactly wide enough that
    /// same-slot variables cannot interact within the claimed structure.
    ///
    /// Outputs are reset to zero constants so a stale tangent from the
    /// previous call can never survive into the decompression step.
    pub(crate) fn seed(&mut self, x: &[F]) {
        let width = self.inputs.first().map_or(0, Dual::seed_width);
        for (j, (input, &xj)) in self.inputs.iter_mut().zip(x.iter()).enumerate() {
            input.re = xj;
            for e in input.eps.iter_mut() {
                *e = F::zero();
            }
            input.eps[j % width] = F::one();
        }
        for output in self.outputs.iter_mut() {
            output.re = F::zero();
            for e in output.eps.iter_mut() {
                *e = F::zero();
            }
        }
    }

    /// Borrow the seeded inputs and the writable outputs for one evaluation.
    #[inline]
    pub(crate) fn io(&mut self) -> (&[Dual<F>], &mut [Dual<F>]) {
        (&self.inputs, &mut self.outputs)
    }

    /// The outputs written by the most recent evaluation.
    #[inline]
    pub(crate) fn outputs(&self) -> &[Dual<F>] {
        &self.outputs
    }
}
