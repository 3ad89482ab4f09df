use approx::assert_relative_eq;
use dunnart::{jacobian, jacobian_with, Dual, Error, Sparsity, Workspace};

fn storage(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; cols]; rows]
}

/// Rebuild the full dense matrix from banded storage (row `r` at column `j`
/// holds `J(j + h - r, j)`).
fn dense_from_banded(banded: &[Vec<f64>], n: usize) -> Vec<Vec<f64>> {
    let bandwidth = banded.len();
    let h = (bandwidth - 1) / 2;
    let mut full = storage(n, n);
    for j in 0..n {
        for (r, row) in banded.iter().enumerate() {
            if j + h >= r && j + h - r < n {
                full[j + h - r][j] = row[j];
            }
        }
    }
    full
}

/// Tridiagonal test map: f_i = x_i² + 3·x_{i-1} − sin(x_{i+1}).
fn tridiag(x: &[Dual<f64>], out: &mut [Dual<f64>]) {
    let n = x.len();
    for i in 0..n {
        let mut acc = &x[i] * &x[i];
        if i > 0 {
            acc = acc + &x[i - 1] * 3.0;
        }
        if i + 1 < n {
            acc = acc - x[i + 1].clone().sin();
        }
        out[i] = acc;
    }
}

/// Two independent 2×2 blocks:
/// f_1 = x_1² + x_2, f_2 = x_1 + x_2², f_3 = x_3² + x_4, f_4 = x_3 + x_4².
fn two_blocks(x: &[Dual<f64>], out: &mut [Dual<f64>]) {
    for b in 0..x.len() / 2 {
        let (lo, hi) = (2 * b, 2 * b + 1);
        out[lo] = &(&x[lo] * &x[lo]) + &x[hi];
        out[hi] = &x[lo] + &(&x[hi] * &x[hi]);
    }
}

// ── Dense ──

#[test]
fn dense_identity_map() {
    let mut f = [0.0; 4];
    let mut jac = storage(4, 4);
    jacobian(
        |x, out| out.clone_from_slice(x),
        &[1.0, 2.0, 3.0, 4.0],
        Sparsity::Dense,
        &mut f,
        &mut jac,
    )
    .unwrap();
    assert_eq!(f, [1.0, 2.0, 3.0, 4.0]);
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(jac[i][j], if i == j { 1.0 } else { 0.0 });
        }
    }
}

#[test]
fn dense_diagonal_squares() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [0.0; 4];
    let mut jac = storage(4, 4);
    jacobian(
        |x, out| {
            for (o, xi) in out.iter_mut().zip(x.iter()) {
                *o = xi * xi;
            }
        },
        &x,
        Sparsity::Dense,
        &mut f,
        &mut jac,
    )
    .unwrap();
    for i in 0..4 {
        assert_relative_eq!(f[i], x[i] * x[i]);
        for j in 0..4 {
            assert_relative_eq!(jac[i][j], if i == j { 2.0 * x[i] } else { 0.0 });
        }
    }
}

#[test]
fn dense_full_coupling() {
    // f_0 = x_0·x_1, f_1 = x_0 + sin(x_1): J = [[x_1, x_0], [1, cos(x_1)]]
    let (a, b) = (3.0, 0.5);
    let mut f = [0.0; 2];
    let mut jac = storage(2, 2);
    jacobian(
        |x, out| {
            out[0] = &x[0] * &x[1];
            out[1] = &x[0] + &x[1].clone().sin();
        },
        &[a, b],
        Sparsity::Dense,
        &mut f,
        &mut jac,
    )
    .unwrap();
    assert_relative_eq!(jac[0][0], b, max_relative = 1e-12);
    assert_relative_eq!(jac[0][1], a, max_relative = 1e-12);
    assert_relative_eq!(jac[1][0], 1.0, max_relative = 1e-12);
    assert_relative_eq!(jac[1][1], b.cos(), max_relative = 1e-12);
}

// ── Banded ──

#[test]
fn banded_matches_dense_exactly() {
    let x = [0.3, -1.2, 2.5, 0.7, 1.1, -0.4, 1.9];
    let n = x.len();

    let mut f_dense = vec![0.0; n];
    let mut dense = storage(n, n);
    jacobian(tridiag, &x, Sparsity::Dense, &mut f_dense, &mut dense).unwrap();

    let mut f_banded = vec![0.0; n];
    let mut banded = storage(3, n);
    jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 3 },
        &mut f_banded,
        &mut banded,
    )
    .unwrap();

    // Same per-lane arithmetic, so the round trip is exact.
    assert_eq!(f_banded, f_dense);
    assert_eq!(dense_from_banded(&banded, n), dense);
}

#[test]
fn banded_structural_zeros_are_written() {
    let x = [1.0, 2.0, 3.0];
    let n = x.len();
    let mut f = vec![0.0; n];
    // Prefill with garbage: out-of-matrix diagonal entries must come back 0.
    let mut banded = vec![vec![999.0; n]; 3];
    jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 3 },
        &mut f,
        &mut banded,
    )
    .unwrap();
    // Row 0 holds J(j+1, j): column n-1 falls off the bottom.
    assert_eq!(banded[0][n - 1], 0.0);
    // Row 2 holds J(j-1, j): column 0 falls off the top.
    assert_eq!(banded[2][0], 0.0);
}

#[test]
fn bandwidth_one_is_the_diagonal() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [0.0; 4];
    let mut jac = storage(1, 4);
    jacobian(
        |x, out| {
            for (o, xi) in out.iter_mut().zip(x.iter()) {
                *o = xi * xi;
            }
        },
        &x,
        Sparsity::Banded { bandwidth: 1 },
        &mut f,
        &mut jac,
    )
    .unwrap();
    for j in 0..4 {
        assert_relative_eq!(jac[0][j], 2.0 * x[j]);
    }
}

#[test]
fn full_bandwidth_matches_dense() {
    let x = [0.3, -1.2, 2.5, 0.7, 1.1];
    let n = x.len();

    let mut f_dense = vec![0.0; n];
    let mut dense = storage(n, n);
    jacobian(tridiag, &x, Sparsity::Dense, &mut f_dense, &mut dense).unwrap();

    let mut f_banded = vec![0.0; n];
    let mut banded = storage(n, n);
    jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: n },
        &mut f_banded,
        &mut banded,
    )
    .unwrap();

    assert_eq!(dense_from_banded(&banded, n), dense);
}

// ── Block-diagonal ──

#[test]
fn block_diagonal_two_blocks() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [0.0; 4];
    let mut jac = storage(2, 4);
    jacobian(
        two_blocks,
        &x,
        Sparsity::BlockDiagonal { blocksize: 2 },
        &mut f,
        &mut jac,
    )
    .unwrap();

    assert_eq!(f, [3.0, 5.0, 13.0, 19.0]);
    // Block 0: [[2·x_0, 1], [1, 2·x_1]] in columns 0..2.
    assert_relative_eq!(jac[0][0], 2.0);
    assert_relative_eq!(jac[0][1], 1.0);
    assert_relative_eq!(jac[1][0], 1.0);
    assert_relative_eq!(jac[1][1], 4.0);
    // Block 1: [[2·x_2, 1], [1, 2·x_3]] in columns 2..4.
    assert_relative_eq!(jac[0][2], 6.0);
    assert_relative_eq!(jac[0][3], 1.0);
    assert_relative_eq!(jac[1][2], 1.0);
    assert_relative_eq!(jac[1][3], 8.0);
}

#[test]
fn block_diagonal_matches_dense_blocks() {
    let x = [0.4, -1.7, 2.2, 0.9, -0.3, 1.6];
    let n = x.len();
    let bs = 2;

    let mut f_dense = vec![0.0; n];
    let mut dense = storage(n, n);
    jacobian(two_blocks, &x, Sparsity::Dense, &mut f_dense, &mut dense).unwrap();

    let mut f_block = vec![0.0; n];
    let mut block = storage(bs, n);
    jacobian(
        two_blocks,
        &x,
        Sparsity::BlockDiagonal { blocksize: bs },
        &mut f_block,
        &mut block,
    )
    .unwrap();

    assert_eq!(f_block, f_dense);
    for b in 0..n / bs {
        for i in 0..bs {
            for k in 0..bs {
                let j = b * bs + k;
                assert_eq!(block[i][j], dense[b * bs + i][j]);
            }
        }
    }
    // Dense run confirms the map really is block-diagonal: off-block zeros.
    for i in 0..n {
        for j in 0..n {
            if i / bs != j / bs {
                assert_eq!(dense[i][j], 0.0);
            }
        }
    }
}

#[test]
fn blocksize_n_matches_dense() {
    let x = [0.3, -1.2, 2.5, 0.7];
    let n = x.len();

    let mut f_dense = vec![0.0; n];
    let mut dense = storage(n, n);
    jacobian(tridiag, &x, Sparsity::Dense, &mut f_dense, &mut dense).unwrap();

    let mut f_block = vec![0.0; n];
    let mut block = storage(n, n);
    jacobian(
        tridiag,
        &x,
        Sparsity::BlockDiagonal { blocksize: n },
        &mut f_block,
        &mut block,
    )
    .unwrap();

    assert_eq!(block, dense);
}

// ── Validation / fail-fast ──

#[test]
fn even_bandwidth_is_rejected_without_output() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [7.0; 4];
    let mut jac = vec![vec![7.0; 4]; 4];
    let err = jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 4 },
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(err, Error::InvalidBandwidth { bandwidth: 4, n: 4 });
    assert_eq!(f, [7.0; 4]);
    assert!(jac.iter().all(|row| row.iter().all(|&v| v == 7.0)));
}

#[test]
fn non_divisor_blocksize_is_rejected_without_output() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [7.0; 4];
    let mut jac = vec![vec![7.0; 4]; 3];
    let err = jacobian(
        two_blocks,
        &x,
        Sparsity::BlockDiagonal { blocksize: 3 },
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(err, Error::InvalidBlocksize { blocksize: 3, n: 4 });
    assert_eq!(f, [7.0; 4]);
}

#[test]
fn f_out_length_is_checked() {
    let mut f = [0.0; 3];
    let mut jac = storage(4, 4);
    let err = jacobian(
        tridiag,
        &[1.0, 2.0, 3.0, 4.0],
        Sparsity::Dense,
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(err, Error::ShapeMismatch { expected: 4, got: 3 });
}

#[test]
fn storage_shape_is_checked() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [0.0; 4];

    // Wrong row count for the banded layout.
    let mut jac = storage(4, 4);
    let err = jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 3 },
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::StorageShape {
            rows: 3,
            cols: 4,
            got_rows: 4,
            got_cols: 4
        }
    );

    // Ragged row.
    let mut jac = vec![vec![0.0; 4], vec![0.0; 3], vec![0.0; 4]];
    let err = jacobian(
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 3 },
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::StorageShape {
            rows: 3,
            cols: 4,
            got_rows: 3,
            got_cols: 3
        }
    );
}

// ── Workspace ──

#[test]
fn workspace_mismatch_is_rejected() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let mut f = [0.0; 4];

    let mut ws = Workspace::new(Sparsity::Dense, 4).unwrap();
    let mut jac = storage(3, 4);
    let err = jacobian_with(
        &mut ws,
        tridiag,
        &x,
        Sparsity::Banded { bandwidth: 3 },
        &mut f,
        &mut jac,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::WorkspaceSparsity {
            built: Sparsity::Dense,
            requested: Sparsity::Banded { bandwidth: 3 },
        }
    );

    let mut ws = Workspace::new(Sparsity::Dense, 6).unwrap();
    let mut jac = storage(4, 4);
    let err = jacobian_with(&mut ws, tridiag, &x, Sparsity::Dense, &mut f, &mut jac).unwrap_err();
    assert_eq!(err, Error::WorkspaceSize { built: 6, requested: 4 });
}

#[test]
fn workspace_reuse_is_transparent() {
    let sparsity = Sparsity::Banded { bandwidth: 3 };
    let x1 = [0.3, -1.2, 2.5, 0.7, 1.1];
    let x2 = [2.0, 0.1, -0.8, 1.4, -2.3];
    let n = x1.len();

    let mut ws = Workspace::new(sparsity, n).unwrap();
    for x in [&x1, &x2] {
        let mut f_ws = vec![0.0; n];
        let mut jac_ws = storage(3, n);
        jacobian_with(&mut ws, tridiag, x, sparsity, &mut f_ws, &mut jac_ws).unwrap();

        let mut f_fresh = vec![0.0; n];
        let mut jac_fresh = storage(3, n);
        jacobian(tridiag, x, sparsity, &mut f_fresh, &mut jac_fresh).unwrap();

        assert_eq!(f_ws, f_fresh);
        assert_eq!(jac_ws, jac_fresh);
    }
}
