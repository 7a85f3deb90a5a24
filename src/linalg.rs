//! Linear algebra backends

use num_traits::Float;
use core::fmt::{Debug, Display, LowerExp};

/// Linear algebra trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Vector kernels which [`crate::Vector`] is built on.
/// All slices passed to a kernel are contiguous, local data.
pub trait LinAlg: 'static
{
    /// Floating point data type used as scalars.
    type F: Float + Debug + Display + LowerExp + 'static;

    /// Calculate 2-norm (or euclidean norm) \\(\\|x\\|_2=\sqrt{\sum_i x_i^2}\\).
    ///
    /// Returns the calculated norm.
    /// * `x` is a vector \\(x\\).
    fn norm(x: &[Self::F]) -> Self::F;

    /// Calculate inner product \\(x^T y\\).
    ///
    /// Returns the calculated product.
    /// * `x` and `y` shall have the same length.
    fn inner_prod(x: &[Self::F], y: &[Self::F]) -> Self::F;

    /// Copy from a vector to another vector.
    ///
    /// * `x` is a slice to copy.
    /// * `y` is a slice being copied to.
    ///   `x` and `y` shall have the same length.
    fn copy(x: &[Self::F], y: &mut[Self::F]);

    /// Calculate \\(\alpha x\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\) before entry, \\(\alpha x\\) on exit.
    fn scale(alpha: Self::F, x: &mut[Self::F]);

    /// Calculate \\(\alpha x + y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha x + y\\) on exit.
    ///   `x` and `y` shall have the same length.
    fn add(alpha: Self::F, x: &[Self::F], y: &mut[Self::F]);

    /// Calculate \\(s\mathbb{1} + y\\).
    ///
    /// * `s` is a scalar \\(s\\).
    /// * `y` is a vector \\(y\\) before entry, \\(s\mathbb{1} + y\\) on exit.
    fn adds(s: Self::F, y: &mut[Self::F]);

    /// Calculate 1-norm (or sum of absolute values) \\(\\|x\\|_1=\sum_i |x_i|\\).
    ///
    /// Returns the calculated norm.
    /// * `x` is a vector \\(x\\).
    /// * `incx` is spacing between elements of `x`
    fn abssum(x: &[Self::F], incx: usize) -> Self::F;

    /// Calculate infinity-norm \\(\\|x\\|_\infty=\max_i |x_i|\\).
    ///
    /// Returns the calculated norm, zero for an empty `x`.
    fn absmax(x: &[Self::F]) -> Self::F;

    /// Calculate \\(\alpha D x + \beta y\\),
    /// where \\(D={\bf diag}(d)\\) is a diagonal matrix.
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `mat` is a diagonal vector \\(d\\) of \\(D\\).
    /// * `x` is a vector \\(x\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha D x + \beta y\\) on exit.
    ///   `mat`, `x` and `y` shall have the same length.
    fn transform_di(alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut[Self::F]);
}

/// Linear algebra extended subtrait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// Dense matrix kernels used by [`crate::DenseSerialMatrix`].
/// The factorization routines follow LAPACK conventions:
/// they return `info`, zero on success and nonzero as a diagnostic code.
pub trait LinAlgEx: LinAlg + Clone
{
    /// Calculates \\(\alpha G x + \beta y\\).
    ///
    /// * If `transpose` is `true`, Calculate \\(\alpha G^T x + \beta y\\) instead.
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `n_row` is a number of rows of \\(G\\).
    /// * `n_col` is a number of columns of \\(G\\).
    /// * `mat` is a matrix \\(G\\), stored in column-major.
    ///   The length of `mat` shall be `n_row * n_col`.
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be `n_col` (or `n_row` if `transpose` is `true`).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry,
    ///   \\(\alpha G x + \beta y\\) (or \\(\alpha G^T x + \beta y\\) if `transpose` is `true`) on exit.
    ///   The length of `y` shall be `n_row` (or `n_col` if `transpose` is `true`).
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut[Self::F]);

    /// Solves \\(G X = B\\) by LU factorization with partial pivoting, as `dgesv`.
    ///
    /// Returns `info`: `0` on success, `i > 0` if \\(U_{ii}\\) is exactly zero (one-based).
    /// * `n` is a number of rows and columns of \\(G\\).
    /// * `nrhs` is a number of columns of \\(B\\).
    /// * `mat` is \\(G\\) in column-major before entry, its LU factors on exit.
    ///   The length of `mat` shall be `n * n`.
    /// * `ipiv` receives one-based pivot indices. The length of `ipiv` shall be `n`.
    /// * `b` is \\(B\\) in column-major before entry, \\(X\\) on exit.
    ///   The length of `b` shall be `n * nrhs`.
    fn solve_ge(n: usize, nrhs: usize, mat: &mut[Self::F], ipiv: &mut[i32], b: &mut[Self::F]) -> i32;

    /// Query of a length of work slice that [`LinAlgEx::svd_ge`] requires.
    ///
    /// Returns a length of work slice.
    fn svd_ge_worklen(n_row: usize, n_col: usize) -> usize;

    /// Thin singular value decomposition \\(G = U {\bf diag}(s) V^T\\), as `dgesvd` with `jobu = jobvt = 'S'`.
    ///
    /// Returns `info`: `0` on success, `i > 0` if the decomposition did not converge.
    /// Let \\(k = \min(m, n)\\).
    /// * `n_row` is \\(m\\), `n_col` is \\(n\\).
    /// * `mat` is \\(G\\) in column-major. It is destroyed on exit.
    /// * `s` receives singular values in descending order. The length shall be \\(k\\).
    /// * `u` receives \\(U\\), \\(m \times k\\) in column-major.
    /// * `vt` receives \\(V^T\\), \\(k \times n\\) in column-major.
    /// * `work` slice is used for temporal variables, see [`LinAlgEx::svd_ge_worklen`].
    fn svd_ge(n_row: usize, n_col: usize, mat: &mut[Self::F], s: &mut[Self::F], u: &mut[Self::F], vt: &mut[Self::F], work: &mut[Self::F]) -> i32;
}
