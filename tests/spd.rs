use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spdfact::{
    CholeskyDecomposition, DynMatrix, DynVector, LdltDecomposition, LinalgError, Matrix3, Matrix4,
    Vector4,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// `B * B^T + n * I` with `B` uniform in [-1, 1).
fn random_spd(rng: &mut StdRng, n: usize) -> DynMatrix<f64> {
    let entries: Vec<f64> = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let b = DynMatrix::from_rows(n, n, &entries);
    let mut m = &b * &b.transpose();
    for i in 0..n {
        m[(i, i)] += n as f64;
    }
    m
}

fn random_vec(rng: &mut StdRng, n: usize) -> DynVector<f64> {
    let v: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    DynVector::from_vec(v)
}

fn tol_for(m: &DynMatrix<f64>) -> f64 {
    1e3 * f64::EPSILON * m.norm_inf().max(1.0)
}

fn assert_matrix_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64, msg: &str) {
    assert_eq!(a.nrows(), b.nrows(), "{}: row count", msg);
    assert_eq!(a.ncols(), b.ncols(), "{}: col count", msg);
    let diff = (a - b).max_abs();
    assert!(diff < tol, "{}: max diff {} >= {}", msg, diff, tol);
}

fn submatrix_without(m: &DynMatrix<f64>, idx: usize) -> DynMatrix<f64> {
    let n = m.nrows();
    let keep: Vec<usize> = (0..n).filter(|&k| k != idx).collect();
    DynMatrix::from_fn(n - 1, n - 1, |i, j| m[(keep[i], keep[j])])
}

fn leading(m: &DynMatrix<f64>, k: usize) -> DynMatrix<f64> {
    DynMatrix::from_fn(k, k, |i, j| m[(i, j)])
}

fn cofactor_det(m: &DynMatrix<f64>) -> f64 {
    let n = m.nrows();
    if n == 0 {
        return 1.0;
    }
    let mut det = 0.0;
    let mut sign = 1.0;
    for j in 0..n {
        let minor = DynMatrix::from_fn(n - 1, n - 1, |r, c| {
            m[(r + 1, if c < j { c } else { c + 1 })]
        });
        det += sign * m[(0, j)] * cofactor_det(&minor);
        sign = -sign;
    }
    det
}

// ── Factorization ───────────────────────────────────────────────────

#[test]
fn cholesky_round_trip() {
    let mut rng = StdRng::seed_from_u64(0);
    for &n in &[1, 2, 5, 12, 30] {
        let m = random_spd(&mut rng, n);
        let chol = CholeskyDecomposition::from_matrix(&m).unwrap();
        let l = chol.l_full().unwrap();
        for i in 0..n {
            assert!(l[(i, i)] > 0.0);
            for j in (i + 1)..n {
                assert_eq!(l[(i, j)], 0.0);
            }
        }
        assert_matrix_near(&(&l * &l.transpose()), &m, tol_for(&m), &format!("n = {}", n));
    }
}

#[test]
fn ldlt_round_trip() {
    let mut rng = StdRng::seed_from_u64(1);
    for &n in &[1, 3, 8, 20] {
        let m = random_spd(&mut rng, n);
        let ldlt = LdltDecomposition::from_matrix(&m).unwrap();
        let l = ldlt.l_full().unwrap();
        let d = ldlt.d_vector().unwrap();
        let ld = DynMatrix::from_fn(n, n, |i, j| l[(i, j)] * d[j]);
        assert_matrix_near(&(&ld * &l.transpose()), &m, tol_for(&m), &format!("n = {}", n));
        assert!(d.as_slice().iter().all(|&x| x > 0.0));
    }
}

#[test]
fn failure_modes() {
    let rect = DynMatrix::zeros(2, 3, 0.0_f64);
    assert_eq!(rect.cholesky().unwrap_err(), LinalgError::SizeMismatch);
    assert_eq!(rect.ldlt().unwrap_err(), LinalgError::SizeMismatch);

    let indefinite = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);
    assert_eq!(indefinite.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    assert_eq!(indefinite.ldlt().unwrap_err(), LinalgError::NotPositiveDefinite);

    // singular to working precision
    let singular = DynMatrix::from_rows(2, 2, &[1.0, 1.0, 1.0, 1.0]);
    assert_eq!(singular.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
}

#[test]
fn error_is_std_error() {
    fn boxed() -> Result<(), Box<dyn std::error::Error>> {
        let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        m.cholesky()?;
        Ok(())
    }
    let e = boxed().unwrap_err();
    assert_eq!(e.to_string(), "matrix is not symmetric positive definite");
}

// ── Solves, determinant, inverse ────────────────────────────────────

#[test]
fn solve_residuals() {
    let mut rng = StdRng::seed_from_u64(2);
    let n = 10;
    let m = random_spd(&mut rng, n);
    let b = random_vec(&mut rng, n);

    let mut chol = CholeskyDecomposition::from_matrix(&m).unwrap();
    let mut ldlt = LdltDecomposition::from_matrix(&m).unwrap();

    let mut xc = DynVector::zeros(0, 0.0);
    chol.solve(&mut xc, &b).unwrap();
    let mut xl: Vec<f64> = Vec::new();
    ldlt.solve(&mut xl, &b).unwrap();

    let r = &m * &xc;
    for i in 0..n {
        assert!((r[i] - b[i]).abs() < 1e-10, "cholesky residual at {}", i);
        assert!((xc[i] - xl[i]).abs() < 1e-10, "ldlt disagrees at {}", i);
    }

    // in place, the way active-set solvers call it
    let mut x = b.as_slice().to_vec();
    chol.solve_in_place(&mut x).unwrap();
    for i in 0..n {
        assert!((x[i] - xc[i]).abs() < 1e-12);
    }

    let entries: Vec<f64> = (0..n * 3).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let bm = DynMatrix::from_rows(n, 3, &entries);
    let mut xm = DynMatrix::zeros(0, 0, 0.0);
    chol.solve_matrix(&mut xm, &bm).unwrap();
    assert_matrix_near(&(&m * &xm), &bm, 1e-10, "matrix solve");
}

#[test]
fn determinant_against_cofactor_expansion() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in 1..=5 {
        let m = random_spd(&mut rng, n);
        let expected = cofactor_det(&m);
        let chol = m.cholesky().unwrap();
        let ldlt = m.ldlt().unwrap();
        let dc = chol.determinant().unwrap();
        let dl = ldlt.determinant().unwrap();
        let tol = 1e-10 * expected.abs();
        assert!((dc - expected).abs() < tol, "n = {}: {} vs {}", n, dc, expected);
        assert!((dl - expected).abs() < tol, "n = {}: {} vs {}", n, dl, expected);
        assert!((chol.ln_det().unwrap() - expected.ln()).abs() < 1e-10);
    }
}

#[test]
fn inverse_property() {
    let mut rng = StdRng::seed_from_u64(4);
    let n = 7;
    let m = random_spd(&mut rng, n);
    let id = DynMatrix::eye(n, 0.0);

    let mut chol = m.cholesky().unwrap();
    assert_matrix_near(&(&m * &chol.inverse().unwrap()), &id, 1e-10, "cholesky");
    let mut ldlt = m.ldlt().unwrap();
    assert_matrix_near(&(&m * &ldlt.inverse().unwrap()), &id, 1e-10, "ldlt");
}

#[test]
fn condition_estimate_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    for &n in &[2, 6, 15] {
        let m = random_spd(&mut rng, n);
        let mut chol = m.cholesky().unwrap();
        let exact = m.norm_inf() * chol.inverse().unwrap().norm_inf();
        let est = chol.condition_estimate(&m).unwrap();
        assert!(est <= exact * (1.0 + 1e-9), "n = {}: {} > {}", n, est, exact);
        assert!(est >= exact / 100.0, "n = {}: {} << {}", n, est, exact);

        let ldlt = m.ldlt().unwrap();
        let est_l = ldlt.condition_estimate(&m).unwrap();
        assert!(est_l <= exact * (1.0 + 1e-9), "ldlt n = {}: {} > {}", n, est_l, exact);
        assert!(est_l > 0.0);
    }
}

// ── Incremental update / downdate ───────────────────────────────────

#[test]
fn update_consistency() {
    let mut rng = StdRng::seed_from_u64(6);
    let n = 8;
    let full = random_spd(&mut rng, n + 1);
    let mut chol = CholeskyDecomposition::from_matrix(&leading(&full, n)).unwrap();

    let col: Vec<f64> = (0..=n).map(|i| full[(i, n)]).collect();
    assert!(chol.try_add_row_and_column(&col, 1e-12).unwrap());
    assert_eq!(chol.order(), n + 1);

    let direct = full.cholesky().unwrap();
    assert_matrix_near(
        &chol.l_full().unwrap(),
        &direct.l_full().unwrap(),
        1e-12,
        "updated factor",
    );
}

#[test]
fn downdate_consistency_every_index() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 6;
    let m = random_spd(&mut rng, n);
    for idx in 0..n {
        let mut chol = m.cholesky().unwrap();
        chol.delete_row_and_column(idx).unwrap();
        let reduced = submatrix_without(&m, idx);
        let direct = reduced.cholesky().unwrap();
        assert_matrix_near(
            &chol.l_full().unwrap(),
            &direct.l_full().unwrap(),
            1e-12,
            &format!("delete {}", idx),
        );
    }
}

#[test]
fn four_by_four_delete_scenario() {
    let m = Matrix4::new([
        [10.0_f64, 2.0, 3.0, 1.0],
        [2.0, 8.0, 1.0, 2.0],
        [3.0, 1.0, 9.0, 4.0],
        [1.0, 2.0, 4.0, 8.0],
    ]);
    let mut chol = m.cholesky().unwrap();
    chol.delete_row_and_column(1).unwrap();

    let reduced = Matrix3::new([[10.0_f64, 3.0, 1.0], [3.0, 9.0, 4.0], [1.0, 4.0, 8.0]]);
    let direct = reduced.cholesky().unwrap();
    assert_matrix_near(
        &chol.l_full().unwrap(),
        &direct.l_full().unwrap(),
        1e-12,
        "delete(1)",
    );

    let b = Vector4::from_array([1.0, 2.0, 3.0, 4.0]);
    let mut x = Vector4::<f64>::zeros();
    // order is now 3
    assert_eq!(chol.solve(&mut x, &b), Err(LinalgError::SizeMismatch));
}

#[test]
fn rejected_update_leaves_factor() {
    let mut rng = StdRng::seed_from_u64(8);
    let n = 5;
    let m = random_spd(&mut rng, n);
    let mut chol = m.cholesky().unwrap();
    let before = chol.l_full().unwrap();

    // a copy of column 0 with a smaller diagonal: new pivot is -1e-3
    let mut col: Vec<f64> = (0..n).map(|i| m[(i, 0)]).collect();
    col.push(m[(0, 0)] - 1e-3);
    assert_eq!(chol.try_add_row_and_column(&col, 1e-8), Ok(false));
    assert_eq!(chol.order(), n);
    assert_eq!(chol.l_full().unwrap(), before);
    assert_eq!(
        chol.add_row_and_column(&col),
        Err(LinalgError::NotPositiveDefinite)
    );
    assert_eq!(chol.order(), n);
}

#[test]
fn active_set_sequence() {
    // grow from empty, drop, re-add, solving in place after each step
    let mut rng = StdRng::seed_from_u64(9);
    let n = 9;
    let m = random_spd(&mut rng, n);
    let mut active: Vec<usize> = Vec::new();
    let mut chol = CholeskyDecomposition::with_capacity(2);

    let add = |chol: &mut CholeskyDecomposition<f64>, active: &mut Vec<usize>, k: usize| {
        let mut col: Vec<f64> = active.iter().map(|&a| m[(a, k)]).collect();
        col.push(m[(k, k)]);
        chol.add_row_and_column(&col).unwrap();
        active.push(k);
    };

    for k in [0, 3, 5, 1, 8] {
        add(&mut chol, &mut active, k);
    }
    chol.delete_row_and_column(1).unwrap();
    active.remove(1);
    add(&mut chol, &mut active, 6);
    chol.delete_row_and_column(0).unwrap();
    active.remove(0);

    assert_eq!(chol.order(), active.len());
    assert!(chol.capacity() >= active.len());

    let sub = DynMatrix::from_fn(active.len(), active.len(), |i, j| {
        m[(active[i], active[j])]
    });
    let direct = sub.cholesky().unwrap();
    assert_matrix_near(
        &chol.l_full().unwrap(),
        &direct.l_full().unwrap(),
        1e-12,
        "active set factor",
    );

    let mut x: Vec<f64> = (0..active.len()).map(|i| i as f64).collect();
    let b = DynVector::from_slice(&x);
    chol.solve_in_place(&mut x).unwrap();
    let r = &sub * &DynVector::from_slice(&x);
    for i in 0..active.len() {
        assert!((r[i] - b[i]).abs() < 1e-10);
    }
}

// ── Scalar types and storage ────────────────────────────────────────

#[test]
fn single_precision() {
    let m = Matrix3::new([
        [4.0_f32, 12.0, -16.0],
        [12.0, 37.0, -43.0],
        [-16.0, -43.0, 98.0],
    ]);
    let chol = m.cholesky().unwrap();
    let mut l = Matrix3::<f32>::zeros();
    chol.l_into(&mut l).unwrap();
    assert!((l[(2, 1)] - 5.0).abs() < 1e-5);
    assert!((chol.determinant().unwrap() - 36.0).abs() < 1e-3);
}

#[test]
fn raw_buffer_access() {
    let m = DynMatrix::from_rows(2, 2, &[4.0, 2.0, 2.0, 3.0]);
    let mut chol = CholeskyDecomposition::<f64>::with_capacity(5);
    chol.factor(&m).unwrap();
    let w = chol.width();
    assert_eq!(w, 5);
    let raw = chol.as_slice();
    assert!((raw[0] - 2.0).abs() < 1e-12);
    assert!((raw[w] - 1.0).abs() < 1e-12);
    assert!((raw[w + 1] - 2.0_f64.sqrt()).abs() < 1e-12);
}
