use num_traits::Float;
use core::marker::PhantomData;
use core::fmt::{Debug, Display, LowerExp};
use core::ops::{Index, IndexMut};
use crate::linalg::{LinAlg, LinAlgEx};

/// `num::Float`-generic [`LinAlgEx`] implementation
///
/// All numeric operations are written in pure Rust, but slow.
#[derive(Debug, Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F> LinAlg for FloatGeneric<F>
where F: Float + Debug + Display + LowerExp + 'static
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn inner_prod(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn adds(s: F, y: &mut[F])
    {
        for v in y {
            *v = *v + s;
        }
    }

    fn abssum(x: &[F], incx: usize) -> F
    {
        if incx == 0 {
            F::zero()
        }
        else {
            let mut sum = F::zero();
            for u in x.chunks(incx) {
                sum = sum + u[0].abs();
            }
            sum
        }
    }

    fn absmax(x: &[F]) -> F
    {
        x.iter().fold(F::zero(), |m, u| m.max(u.abs()))
    }

    fn transform_di(alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), x.len());
        assert_eq!(mat.len(), y.len());

        for (i, v) in y.iter_mut().enumerate() {
            *v = if beta == F::zero() {
                alpha * mat[i] * x[i]
            }
            else {
                alpha * mat[i] * x[i] + beta * *v
            };
        }
    }
}

//

struct MatIdx<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a[F],
    transpose: bool,
}

impl<'a, F: Float> MatIdx<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        let (r, c) = if !self.transpose {(r, c)} else {(c, r)};

        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdx<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

//

struct MatIdxMut<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a mut[F],
}

impl<'a, F: Float> MatIdxMut<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }

    fn col_vec(&self, c: usize) -> &[F]
    {
        assert!(c < self.n_col);

        let (_, v) = self.mat.split_at(c * self.n_row);
        let (v, _) = v.split_at(self.n_row);

        v
    }

    fn swap_rows(&mut self, r1: usize, r2: usize)
    {
        if r1 != r2 {
            for c in 0.. self.n_col {
                let i1 = self.idx((r1, c));
                let i2 = self.idx((r2, c));
                self.mat.swap(i1, i2);
            }
        }
    }

    fn set_eye(&mut self)
    {
        for c in 0.. self.n_col {
            for r in 0.. self.n_row {
                self[(r, c)] = if r == c {F::one()} else {F::zero()};
            }
        }
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdxMut<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

impl<'a, F: Float> IndexMut<(usize, usize)> for MatIdxMut<'a, F>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output
    {
        let i = self.idx(index);
        &mut self.mat[i]
    }
}

//

const JACOBI_MAX_SWEEP: usize = 64;

fn all_finite<F: Float>(x: &[F]) -> bool
{
    x.iter().all(|u| u.is_finite())
}

// One-sided Jacobi: rotates columns of w until mutually orthogonal, accumulating the rotations in v.
// Returns false if not converged within JACOBI_MAX_SWEEP sweeps.
fn jacobi_orth<F: Float>(w: &mut MatIdxMut<F>, v: &mut MatIdxMut<F>) -> bool
{
    let f0 = F::zero();
    let f1 = F::one();
    let f2 = f1 + f1;
    let tol = F::epsilon() * F::from(w.n_row.max(1)).unwrap_or(f1);
    let n = w.n_col;

    for _ in 0.. JACOBI_MAX_SWEEP {
        let mut conv = true;

        for i in 0.. n {
            for j in i + 1.. n {
                let mut a = f0;
                let mut b = f0;
                let mut d = f0;
                for k in 0.. w.n_row {
                    let wi = w[(k, i)];
                    let wj = w[(k, j)];
                    a = a + wi * wi;
                    b = b + wj * wj;
                    d = d + wi * wj;
                }

                if d != f0 && d.abs() > tol * (a * b).sqrt() {
                    conv = false;

                    let zeta = (b - a) / (f2 * d);
                    let t = if zeta >= f0 {
                        f1 / (zeta + (f1 + zeta * zeta).sqrt())
                    }
                    else {
                        -f1 / (-zeta + (f1 + zeta * zeta).sqrt())
                    };
                    let c = (f1 + t * t).sqrt().recip();
                    let s = c * t;

                    for k in 0.. w.n_row {
                        let wi = w[(k, i)];
                        let wj = w[(k, j)];
                        w[(k, i)] = c * wi - s * wj;
                        w[(k, j)] = s * wi + c * wj;
                    }
                    for k in 0.. v.n_row {
                        let vi = v[(k, i)];
                        let vj = v[(k, j)];
                        v[(k, i)] = c * vi - s * vj;
                        v[(k, j)] = s * vi + c * vj;
                    }
                }
            }
        }

        if conv {
            return true;
        }
    }

    false
}

// Orthonormal vector of length `len` orthogonal to all of `basis`, by Gram-Schmidt over unit vectors.
fn complete_basis<F: Float>(len: usize, basis: &[Vec<F>]) -> Vec<F>
{
    let mut best = vec![F::zero(); len];
    let mut best_norm = F::neg_infinity();

    for e in 0.. len {
        let mut cand = vec![F::zero(); len];
        cand[e] = F::one();

        // twice is enough
        for _ in 0.. 2 {
            for b in basis {
                let d = cand.iter().zip(b).fold(F::zero(), |s, (x, y)| s + *x * *y);
                for (x, y) in cand.iter_mut().zip(b) {
                    *x = *x - d * *y;
                }
            }
        }

        let nrm = cand.iter().fold(F::zero(), |s, x| s + *x * *x).sqrt();
        if nrm > best_norm {
            best_norm = nrm;
            best = cand;
        }
    }

    for x in best.iter_mut() {
        *x = *x / best_norm;
    }
    best
}

//

impl<F> LinAlgEx for FloatGeneric<F>
where F: Float + Debug + Display + LowerExp + 'static
{
    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        let mat = MatIdx {
            n_row, n_col, mat, transpose,
        };

        for r in 0.. y.len() {
            let mut mat_x = F::zero();
            for c in 0.. x.len() {
                mat_x = mat_x + mat[(r, c)] * x[c];
            }
            y[r] = if beta == F::zero() {
                alpha * mat_x
            }
            else {
                alpha * mat_x + beta * y[r]
            };
        }
    }

    fn solve_ge(n: usize, nrhs: usize, mat: &mut[F], ipiv: &mut[i32], b: &mut[F]) -> i32
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(ipiv.len(), n);
        assert_eq!(b.len(), n * nrhs);

        // same negative info as LAPACKE_dgesv input checks
        if !all_finite(mat) {
            log::warn!("solve_ge: non-finite matrix entry");
            return -4;
        }
        if !all_finite(b) {
            log::warn!("solve_ge: non-finite right-hand side entry");
            return -7;
        }

        let f0 = F::zero();
        let mut info = 0;

        let mut lu = MatIdxMut {
            n_row: n, n_col: n, mat,
        };

        // factorization
        for k in 0.. n {
            let mut p = k;
            for i in k + 1.. n {
                if lu[(i, k)].abs() > lu[(p, k)].abs() {
                    p = i;
                }
            }
            ipiv[k] = (p + 1) as i32;

            if lu[(p, k)] == f0 {
                if info == 0 {
                    info = (k + 1) as i32;
                }
                continue;
            }

            lu.swap_rows(k, p);

            let pivot = lu[(k, k)];
            for i in k + 1.. n {
                lu[(i, k)] = lu[(i, k)] / pivot;
            }
            for j in k + 1.. n {
                let lkj = lu[(k, j)];
                for i in k + 1.. n {
                    lu[(i, j)] = lu[(i, j)] - lu[(i, k)] * lkj;
                }
            }
        }

        if info != 0 {
            return info;
        }

        let mut rhs = MatIdxMut {
            n_row: n, n_col: nrhs, mat: b,
        };

        for k in 0.. n {
            rhs.swap_rows(k, (ipiv[k] - 1) as usize);
        }

        for c in 0.. nrhs {
            // forward, unit lower
            for k in 0.. n {
                let bk = rhs[(k, c)];
                for i in k + 1.. n {
                    rhs[(i, c)] = rhs[(i, c)] - lu[(i, k)] * bk;
                }
            }
            // backward, upper
            for k in (0.. n).rev() {
                let bk = rhs[(k, c)] / lu[(k, k)];
                rhs[(k, c)] = bk;
                for i in 0.. k {
                    rhs[(i, c)] = rhs[(i, c)] - lu[(i, k)] * bk;
                }
            }
        }

        0
    }

    fn svd_ge_worklen(n_row: usize, n_col: usize) -> usize
    {
        let p = n_row.max(n_col);
        let q = n_row.min(n_col);

        p * q + q * q
    }

    fn svd_ge(n_row: usize, n_col: usize, mat: &mut[F], s: &mut[F], u: &mut[F], vt: &mut[F], work: &mut[F]) -> i32
    {
        let k = n_row.min(n_col);

        assert_eq!(mat.len(), n_row * n_col);
        assert_eq!(s.len(), k);
        assert_eq!(u.len(), n_row * k);
        assert_eq!(vt.len(), k * n_col);
        assert!(work.len() >= Self::svd_ge_worklen(n_row, n_col));

        if k == 0 {
            return 0;
        }
        // same negative info as LAPACKE_dgesvd input checks
        if !all_finite(mat) {
            log::warn!("svd_ge: non-finite matrix entry");
            return -6;
        }

        // work on A if tall, A^T if wide: w is p x q with p >= q
        let tall = n_row >= n_col;
        let p = n_row.max(n_col);
        let q = k;

        let (w, rest) = work.split_at_mut(p * q);
        let (v, _) = rest.split_at_mut(q * q);

        let src = MatIdx {
            n_row, n_col, mat: &*mat, transpose: !tall,
        };
        let mut w = MatIdxMut {
            n_row: p, n_col: q, mat: w,
        };
        for c in 0.. q {
            for r in 0.. p {
                w[(r, c)] = src[(r, c)];
            }
        }

        let mut v = MatIdxMut {
            n_row: q, n_col: q, mat: v,
        };
        v.set_eye();

        if !jacobi_orth(&mut w, &mut v) {
            log::warn!("one-sided Jacobi did not converge within {} sweeps", JACOBI_MAX_SWEEP);
            return 1;
        }

        let sv: Vec<F> = (0.. q).map(|c| Self::norm(w.col_vec(c))).collect();
        let mut order: Vec<usize> = (0.. q).collect();
        order.sort_by(|&i, &j| sv[j].partial_cmp(&sv[i]).unwrap_or(core::cmp::Ordering::Equal));

        let sv_max = sv[order[0]];
        let tol = F::from(p).unwrap_or(F::one()) * F::epsilon() * sv_max;

        // left vectors of the working problem, in descending order
        let mut lw: Vec<Vec<F>> = Vec::with_capacity(q);
        for &c in order.iter() {
            let col = if sv[c] > tol && sv[c] > F::zero() {
                w.col_vec(c).iter().map(|x| *x / sv[c]).collect()
            }
            else {
                complete_basis(p, &lw)
            };
            lw.push(col);
        }

        for (j, &c) in order.iter().enumerate() {
            s[j] = sv[c];
        }

        let mut mu = MatIdxMut {
            n_row, n_col: k, mat: u,
        };
        let mut mvt = MatIdxMut {
            n_row: k, n_col, mat: vt,
        };

        if tall {
            // A = W V^T: U from w, V^T from v
            for j in 0.. k {
                for r in 0.. n_row {
                    mu[(r, j)] = lw[j][r];
                }
                for c in 0.. n_col {
                    mvt[(j, c)] = v[(c, order[j])];
                }
            }
        }
        else {
            // A^T = W V^T, so A = V W^T
            for j in 0.. k {
                for r in 0.. n_row {
                    mu[(r, j)] = v[(r, order[j])];
                }
                for c in 0.. n_col {
                    mvt[(j, c)] = lw[j][c];
                }
            }
        }

        0
    }
}

//

#[test]
fn test_floatgeneric_solve()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    // column-major
    let a = &mut [
        2., 4., -2.,
        1., -6., 7.,
        1., 0., 2.,
    ];
    let b = &mut [5., -2., 9.];
    let ipiv = &mut [0; 3];

    let info = L::solve_ge(3, 1, a, ipiv, b);
    assert_eq!(info, 0);
    assert_float_eq!(b.as_ref(), [1., 1., 2.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_floatgeneric_solve_singular()
{
    type L = FloatGeneric<f64>;

    let a = &mut [
        1., 2.,
        2., 4.,
    ];
    let b = &mut [1., 1.];
    let ipiv = &mut [0; 2];

    let info = L::solve_ge(2, 1, a, ipiv, b);
    assert_eq!(info, 2);
}

#[test]
fn test_floatgeneric_non_finite()
{
    type L = FloatGeneric<f64>;

    let a = &mut [
        f64::NAN, 2.,
        1., 3.,
    ];
    let s = &mut [0.; 2];
    let u = &mut [0.; 4];
    let vt = &mut [0.; 4];
    let work = &mut vec![0.; L::svd_ge_worklen(2, 2)];
    assert_eq!(L::svd_ge(2, 2, a, s, u, vt, work), -6);

    let b = &mut [1., 1.];
    let ipiv = &mut [0; 2];
    assert_eq!(L::solve_ge(2, 1, a, ipiv, b), -4);

    let a = &mut [
        1., 0.,
        0., 1.,
    ];
    let b = &mut [f64::INFINITY, 1.];
    assert_eq!(L::solve_ge(2, 1, a, ipiv, b), -7);
}

#[test]
fn test_floatgeneric_svd_wide()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    // 2 x 3, column-major
    let a_ref = [
        3., 2.,
        2., 3.,
        2., -2.,
    ];
    let a = &mut a_ref.clone();
    let s = &mut [0.; 2];
    let u = &mut [0.; 4];
    let vt = &mut [0.; 6];
    let work = &mut vec![0.; L::svd_ge_worklen(2, 3)];

    let info = L::svd_ge(2, 3, a, s, u, vt, work);
    assert_eq!(info, 0);
    assert_float_eq!(s.as_ref(), [5., 3.].as_ref(), abs_all <= 1e-12);

    // reconstruct
    for c in 0.. 3 {
        for r in 0.. 2 {
            let mut e = 0.;
            for j in 0.. 2 {
                e += u[j * 2 + r] * s[j] * vt[c * 2 + j];
            }
            assert_float_eq!(e, a_ref[c * 2 + r], abs <= 1e-12);
        }
    }
}
