use crate::dual::Dual;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::sparsity::Sparsity;
use crate::workspace::Workspace;

/// Differentiate a scalar function `f : R → R` at `x`.
///
/// Seeds a single-lane dual variable, evaluates `f` once, and returns
/// `(f(x), f'(x))`.
///
/// ```
/// let (f, df) = dunnart::derivative(|x| x.powi(2), 3.0);
/// assert_eq!(f, 9.0);
/// assert_eq!(df, 6.0);
/// ```
pub fn derivative<F: Float>(f: impl FnOnce(Dual<F>) -> Dual<F>, x: F) -> (F, F) {
    let y = f(Dual::variable(x));
    (y.re, y.eps[0])
}

/// Compute the gradient of a scalar function `f : R^n → R` at `x`.
///
/// This is dense Jacobian seeding applied to a single output: every variable
/// owns its own seed lane, so one evaluation produces a dual whose tangent
/// vector *is* the gradient. The function value is returned; the gradient is
/// written to `grad`.
///
/// Fails if `grad.len() != x.len()`.
///
/// ```
/// let mut g = [0.0; 2];
/// let f = dunnart::gradient(
///     |x| &x[0] * &x[0] + &x[1] * &x[1],
///     &[3.0, 4.0],
///     &mut g,
/// )
/// .unwrap();
/// assert_eq!(f, 25.0);
/// assert_eq!(g, [6.0, 8.0]);
/// ```
pub fn gradient<F: Float>(
    f: impl FnOnce(&[Dual<F>]) -> Dual<F>,
    x: &[F],
    grad: &mut [F],
) -> Result<F> {
    let n = x.len();
    if grad.len() != n {
        return Err(Error::ShapeMismatch {
            expected: n,
            got: grad.len(),
        });
    }
    let inputs: Vec<Dual<F>> = x
        .iter()
        .enumerate()
        .map(|(j, &xj)| Dual::with_tangent(xj, n, j))
        .collect();
    let y = f(&inputs);
    grad.copy_from_slice(&y.eps);
    Ok(y.re)
}

/// Jacobian-vector product (forward mode): `(f(x), J·v)`.
///
/// Evaluates `f` at `x` with single-lane duals seeded with `v` and returns the
/// directional derivative without forming the Jacobian. `f` may be
/// rectangular (`R^n → R^m`).
pub fn jvp<F: Float>(
    f: impl FnOnce(&[Dual<F>]) -> Vec<Dual<F>>,
    x: &[F],
    v: &[F],
) -> (Vec<F>, Vec<F>) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<F>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, vec![vi].into_boxed_slice()))
        .collect();
    let outputs = f(&inputs);
    let values = outputs.iter().map(|d| d.re).collect();
    let tangents = outputs.iter().map(|d| d.eps[0]).collect();
    (values, tangents)
}

/// Compute the Jacobian of `f : R^n → R^n` at `x`, exploiting `sparsity`.
///
/// `f` receives the seeded inputs and writes `n` outputs elementwise using
/// dual arithmetic. One evaluation carries all seed directions; the compressed
/// tangents are then unpacked into `jac`, whose required shape is
/// [`sparsity.rows(n)`](Sparsity::rows) rows of `n` columns (see [`Sparsity`]
/// for the per-variant layout). The function values land in `f_out`.
///
/// All validation happens before `f` is evaluated and before anything is
/// written: on `Err`, `f_out` and `jac` are untouched.
///
/// The sparsity claim is trusted. If the function's true structure is wider
/// than the claimed band or blocks, seed slots alias and the result is
/// silently wrong — there is no detection.
///
/// ```
/// use dunnart::Sparsity;
///
/// let mut f = [0.0; 2];
/// let mut jac = vec![vec![0.0; 2]; 2];
/// dunnart::jacobian(
///     |x, out| {
///         out[0] = &x[0] * &x[0];
///         out[1] = &x[0] + &x[1];
///     },
///     &[3.0, 4.0],
///     Sparsity::Dense,
///     &mut f,
///     &mut jac,
/// )
/// .unwrap();
/// assert_eq!(f, [9.0, 7.0]);
/// assert_eq!(jac, vec![vec![6.0, 0.0], vec![1.0, 1.0]]);
/// ```
pub fn jacobian<F: Float>(
    f: impl FnMut(&[Dual<F>], &mut [Dual<F>]),
    x: &[F],
    sparsity: Sparsity,
    f_out: &mut [F],
    jac: &mut [Vec<F>],
) -> Result<()> {
    let mut ws = Workspace::new(sparsity, x.len())?;
    jacobian_with(&mut ws, f, x, sparsity, f_out, jac)
}

/// Like [`jacobian`], but reusing a caller-owned [`Workspace`].
///
/// Avoids reallocating the seeded dual vectors on every call; reuse is
/// observationally transparent. Fails if the workspace was built for a
/// different descriptor or problem size.
pub fn jacobian_with<F: Float>(
    ws: &mut Workspace<F>,
    mut f: impl FnMut(&[Dual<F>], &mut [Dual<F>]),
    x: &[F],
    sparsity: Sparsity,
    f_out: &mut [F],
    jac: &mut [Vec<F>],
) -> Result<()> {
    let n = x.len();
    sparsity.validate(n)?;
    if f_out.len() != n {
        return Err(Error::ShapeMismatch {
            expected: n,
            got: f_out.len(),
        });
    }
    check_storage(jac, sparsity.rows(n), n)?;
    if ws.sparsity() != sparsity {
        return Err(Error::WorkspaceSparsity {
            built: ws.sparsity(),
            requested: sparsity,
        });
    }
    if ws.len() != n {
        return Err(Error::WorkspaceSize {
            built: ws.len(),
            requested: n,
        });
    }

    ws.seed(x);
    {
        let (inputs, outputs) = ws.io();
        f(inputs, outputs);
    }

    let outputs = ws.outputs();
    for (fi, out) in f_out.iter_mut().zip(outputs.iter()) {
        *fi = out.re;
    }
    match sparsity {
        Sparsity::Dense => decompress_dense(outputs, jac),
        Sparsity::Banded { bandwidth } => decompress_banded(outputs, bandwidth, jac),
        Sparsity::BlockDiagonal { blocksize } => decompress_block(outputs, blocksize, jac),
    }
    Ok(())
}

fn check_storage<F: Float>(jac: &[Vec<F>], rows: usize, cols: usize) -> Result<()> {
    if jac.len() != rows {
        return Err(Error::StorageShape {
            rows,
            cols,
            got_rows: jac.len(),
            got_cols: jac.first().map_or(0, Vec::len),
        });
    }
    for row in jac {
        if row.len() != cols {
            return Err(Error::StorageShape {
                rows,
                cols,
                got_rows: jac.len(),
                got_cols: row.len(),
            });
        }
    }
    Ok(())
}

/// Dense unpacking: column `j` owns seed lane `j`, so `jac[i][j]` is read
/// straight out of `outputs[i].eps[j]`.
fn decompress_dense<F: Float>(outputs: &[Dual<F>], jac: &mut [Vec<F>]) {
    for (row, out) in jac.iter_mut().zip(outputs.iter()) {
        row.copy_from_slice(&out.eps);
    }
}

/// Banded un-scattering: column `j` uses lane `j mod bandwidth`, and storage
/// row `r` holds the diagonal `j - i = r - h`. Diagonal entries falling
/// outside the matrix are written as literal zeros — the caller's array is
/// reused across calls, so they cannot be left unset.
fn decompress_banded<F: Float>(outputs: &[Dual<F>], bandwidth: usize, jac: &mut [Vec<F>]) {
    let n = outputs.len();
    let h = (bandwidth - 1) / 2;
    for j in 0..n {
        let lane = j % bandwidth;
        for (r, row) in jac.iter_mut().enumerate() {
            // Storage row r at column j is J(i, j) with i = j + h - r.
            let i = j + h;
            row[j] = if i >= r && i - r < n {
                outputs[i - r].eps[lane]
            } else {
                F::zero()
            };
        }
    }
}

/// Block-diagonal unpacking: one cyclic seed period is exactly one block, so
/// lane `k` within block `b` is global column `b·blocksize + k`, and the
/// block's rows are read from the same output range.
fn decompress_block<F: Float>(outputs: &[Dual<F>], blocksize: usize, jac: &mut [Vec<F>]) {
    let n = outputs.len();
    for b in 0..n / blocksize {
        for k in 0..blocksize {
            let j = b * blocksize + k;
            for (i, row) in jac.iter_mut().enumerate() {
                row[j] = outputs[b * blocksize + i].eps[k];
            }
        }
    }
}
