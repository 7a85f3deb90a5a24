use crate::linalg::{LinAlg, LinAlgEx};

//

/// `f64`-specific [`LinAlgEx`] implementation using `cblas` and `lapacke`
///
/// You need a [BLAS/LAPACK source](https://github.com/blas-lapack-rs/blas-lapack-rs.github.io/wiki#sources) to link.
#[derive(Debug, Clone)]
pub struct F64LAPACK;

impl LinAlg for F64LAPACK
{
    type F = f64;

    fn norm(x: &[f64]) -> f64
    {
        unsafe { cblas::dnrm2(x.len() as i32, x, 1) }
    }

    fn inner_prod(x: &[f64], y: &[f64]) -> f64
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::ddot(x.len() as i32, x, 1, y, 1) }
    }

    fn copy(x: &[f64], y: &mut[f64])
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::dcopy(x.len() as i32, x, 1, y, 1) }
    }

    fn scale(alpha: f64, x: &mut[f64])
    {
        unsafe { cblas::dscal(x.len() as i32, alpha, x, 1) }
    }

    fn add(alpha: f64, x: &[f64], y: &mut[f64])
    {
        assert_eq!(x.len(), y.len());

        unsafe { cblas::daxpy(x.len() as i32, alpha, x, 1, y, 1) }
    }

    fn adds(s: f64, y: &mut[f64])
    {
        let one = &[1.];

        unsafe { cblas::daxpy(y.len() as i32, s, one, 0, y, 1) }
    }

    fn abssum(x: &[f64], incx: usize) -> f64
    {
        if incx == 0 {
            0.
        }
        else {
            unsafe { cblas::dasum(((x.len() + (incx - 1)) / incx) as i32, x, incx as i32) }
        }
    }

    fn absmax(x: &[f64]) -> f64
    {
        if x.is_empty() {
            0.
        }
        else {
            let i = unsafe { cblas::idamax(x.len() as i32, x, 1) };
            x[i as usize].abs()
        }
    }

    fn transform_di(alpha: f64, mat: &[f64], x: &[f64], beta: f64, y: &mut[f64])
    {
        assert_eq!(mat.len(), x.len());
        assert_eq!(mat.len(), y.len());

        unsafe { cblas::dsbmv(
            cblas::Layout::ColumnMajor, cblas::Part::Upper,
            mat.len() as i32, 0,
            alpha, mat, 1,
            x, 1,
            beta, y, 1
        ) }
    }
}

//

impl LinAlgEx for F64LAPACK
{
    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: f64, mat: &[f64], x: &[f64], beta: f64, y: &mut[f64])
    {
        assert_eq!(mat.len(), n_row * n_col);

        let trans = if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);

            cblas::Transpose::Ordinary
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);

            cblas::Transpose::None
        };

        unsafe { cblas::dgemv(
            cblas::Layout::ColumnMajor, trans,
            n_row as i32, n_col as i32,
            alpha, mat, n_row as i32,
            x, 1,
            beta, y, 1
        ) }
    }

    fn solve_ge(n: usize, nrhs: usize, mat: &mut[f64], ipiv: &mut[i32], b: &mut[f64]) -> i32
    {
        assert_eq!(mat.len(), n * n);
        assert_eq!(ipiv.len(), n);
        assert_eq!(b.len(), n * nrhs);

        if n == 0 {
            return 0;
        }

        unsafe {
            lapacke::dgesv(
                lapacke::Layout::ColumnMajor,
                n as i32, nrhs as i32,
                mat, n as i32, ipiv,
                b, n as i32)
        }
    }

    fn svd_ge_worklen(n_row: usize, n_col: usize) -> usize
    {
        n_row.min(n_col).max(1)
    }

    fn svd_ge(n_row: usize, n_col: usize, mat: &mut[f64], s: &mut[f64], u: &mut[f64], vt: &mut[f64], work: &mut[f64]) -> i32
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

        // superb receives the unconverged superdiagonal, min(m, n) - 1 entries
        let (superb, _) = work.split_at_mut(k - 1);

        unsafe {
            lapacke::dgesvd(
                lapacke::Layout::ColumnMajor, b'S', b'S',
                n_row as i32, n_col as i32,
                mat, n_row as i32,
                s,
                u, n_row as i32,
                vt, k as i32,
                superb)
        }
    }
}

//

#[cfg(test)]
use intel_mkl_src as _;

#[test]
fn test_f64lapack_solve()
{
    use float_eq::assert_float_eq;

    type L = F64LAPACK;

    // column-major
    let a = &mut [
        2., 4., -2.,
        1., -6., 7.,
        1., 0., 2.,
    ];
    let b = &mut [5., -2., 9.];
    let ipiv = &mut [0; 3];
    assert_eq!(L::solve_ge(3, 1, a, ipiv, b), 0);
    assert_float_eq!(b.as_ref(), [1., 1., 2.].as_ref(), abs_all <= 1e-12);

    let a = &mut [
        1., 2.,
        2., 4.,
    ];
    let b = &mut [1., 1.];
    let ipiv = &mut [0; 2];
    assert!(L::solve_ge(2, 1, a, ipiv, b) > 0);
}

#[test]
fn test_f64lapack_svd()
{
    use float_eq::assert_float_eq;

    type L = F64LAPACK;

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
    assert_eq!(work.len(), 2);

    assert_eq!(L::svd_ge(2, 3, a, s, u, vt, work), 0);
    assert_float_eq!(s.as_ref(), [5., 3.].as_ref(), abs_all <= 1e-12);

    for c in 0.. 3 {
        for r in 0.. 2 {
            let mut e = 0.;
            for j in 0.. 2 {
                e += u[j * 2 + r] * s[j] * vt[c * 2 + j];
            }
            assert_float_eq!(e, a_ref[c * 2 + r], abs <= 1e-12);
        }
    }

    // single column: superb is empty
    let a = &mut [3., 4.];
    let s = &mut [0.; 1];
    let u = &mut [0.; 2];
    let vt = &mut [0.; 1];
    let work = &mut vec![0.; L::svd_ge_worklen(2, 1)];
    assert_eq!(L::svd_ge(2, 1, a, s, u, vt, work), 0);
    assert_float_eq!(s[0], 5., abs <= 1e-12);
    assert_float_eq!((u[0] * s[0] * vt[0]).abs(), 3., abs <= 1e-12);
}

#[test]
fn test_f64lapack_non_finite()
{
    type L = F64LAPACK;

    let a = &mut [
        f64::NAN, 2.,
        1., 3.,
    ];
    let s = &mut [0.; 2];
    let u = &mut [0.; 4];
    let vt = &mut [0.; 4];
    let work = &mut vec![0.; L::svd_ge_worklen(2, 2)];
    assert!(L::svd_ge(2, 2, a, s, u, vt, work) < 0);
}
