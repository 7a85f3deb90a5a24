//! Dense serial matrix

use std::any::Any;
use num_traits::{Zero, Float};
use crate::linalg::LinAlgEx;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator};
use crate::solver::{SolverState, SolveStatus};
use crate::error::OpError;

//

/// Dense serial matrix
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Matrix \\(A \in \mathbb{R}^{m \times n}\\) from a domain of \\(n\\) entries to a range of \\(m\\) entries,
/// stored in column-major.
/// Assembled with [`DenseSerialMatrix::add_to_row`] and friends, and then wrapped with [`DenseSerialMatrix::into_operator`].
#[derive(Clone)]
pub struct DenseSerialMatrix<L: LinAlgEx>
{
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
    data: Vec<L::F>,
}

impl<L: LinAlgEx> DenseSerialMatrix<L>
{
    /// Creates a zero matrix.
    pub fn new(domain: &VectorSpace<L>, range: &VectorSpace<L>) -> Self
    {
        DenseSerialMatrix {
            domain: domain.clone(),
            range: range.clone(),
            data: vec![L::F::zero(); domain.dim() * range.dim()],
        }
    }

    fn from_data(domain: VectorSpace<L>, range: VectorSpace<L>, data: Vec<L::F>) -> Self
    {
        assert_eq!(data.len(), domain.dim() * range.dim());

        DenseSerialMatrix {
            domain, range, data
        }
    }

    /// Number of rows \\(m\\).
    pub fn num_rows(&self) -> usize
    {
        self.range.dim()
    }

    /// Number of columns \\(n\\).
    pub fn num_cols(&self) -> usize
    {
        self.domain.dim()
    }

    fn idx(&self, r: usize, c: usize) -> usize
    {
        c * self.num_rows() + r
    }

    fn check_row(&self, row: usize) -> Result<(), OpError>
    {
        if row < self.num_rows() {
            Ok(())
        }
        else {
            log::error!("row {} of a matrix with {} rows", row, self.num_rows());
            Err(OpError::IndexOutOfRange)
        }
    }

    /// Adds `vals` to the entries of `row` at columns `cols`.
    pub fn add_to_row(&mut self, row: usize, cols: &[usize], vals: &[L::F]) -> Result<(), OpError>
    {
        self.check_row(row)?;

        if cols.len() != vals.len() {
            log::error!("add_to_row: {} columns, {} values", cols.len(), vals.len());
            return Err(OpError::DimensionMismatch);
        }
        if let Some(c) = cols.iter().find(|c| **c >= self.num_cols()) {
            log::error!("add_to_row: column {} of a matrix with {} columns", c, self.num_cols());
            return Err(OpError::IndexOutOfRange);
        }

        for (c, v) in cols.iter().zip(vals) {
            let i = self.idx(row, *c);
            self.data[i] = self.data[i] + *v;
        }
        Ok(())
    }

    /// Overwrites all entries of `row` with `vals`.
    pub fn set_row(&mut self, row: usize, vals: &[L::F]) -> Result<(), OpError>
    {
        self.check_row(row)?;

        if vals.len() != self.num_cols() {
            log::error!("set_row: {} values for {} columns", vals.len(), self.num_cols());
            return Err(OpError::DimensionMismatch);
        }

        for (c, v) in vals.iter().enumerate() {
            let i = self.idx(row, c);
            self.data[i] = *v;
        }
        Ok(())
    }

    /// Sets entry \\(A_{rc}\\).
    ///
    /// Panics if out of range.
    pub fn set(&mut self, r: usize, c: usize, v: L::F)
    {
        assert!(r < self.num_rows() && c < self.num_cols());

        let i = self.idx(r, c);
        self.data[i] = v;
    }

    /// Entry \\(A_{rc}\\).
    ///
    /// Panics if out of range.
    pub fn get(&self, r: usize, c: usize) -> L::F
    {
        assert!(r < self.num_rows() && c < self.num_cols());

        self.data[self.idx(r, c)]
    }

    /// Sets all entries to zero.
    pub fn zero(&mut self)
    {
        for u in self.data.iter_mut() {
            *u = L::F::zero();
        }
    }

    /// Column-major entries.
    pub fn data(&self) -> &[L::F]
    {
        &self.data
    }

    /// Wraps this matrix, which becomes immutable.
    pub fn into_operator(self) -> LinearOperator<L>
    {
        LinearOperator::new(self)
    }

    fn op_impl(&self, transpose: bool, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>)
    {
        let (nr, nc) = (self.num_rows(), self.num_cols());

        if nr > 0 && nc > 0 {
            y.zip_mut(x, |x, y| L::transform_ge(transpose, nr, nc, alpha, &self.data, x, beta, y));
        }
        else if beta == L::F::zero() {
            y.zero();
        }
        else {
            y.scale(beta);
        }
    }
}

impl<L: LinAlgEx> Operator<L> for DenseSerialMatrix<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.domain.clone()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.range.clone()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op_impl(false, alpha, x, beta, y);
        Ok(())
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op_impl(true, alpha, x, beta, y);
        Ok(())
    }

    fn description(&self) -> String
    {
        format!("DenseSerialMatrix[{}x{}]", self.num_rows(), self.num_cols())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

impl<L: LinAlgEx> core::fmt::Display for DenseSerialMatrix<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error>
    {
        let (nr, nc) = (self.num_rows(), self.num_cols());
        if nr == 0 || nc == 0 {
            write!(f, "[ ]")?;
        }
        else {
            write!(f, "[ {:.3e}", self.get(0, 0))?;
            if nc > 2 {
                write!(f, " ...")?;
            }
            if nc > 1 {
                write!(f, " {:.3e}", self.get(0, nc - 1))?;
            }

            if nr > 2 {
                writeln!(f)?;
                write!(f, "  ...")?;
            }

            if nr > 1 {
                writeln!(f)?;
                write!(f, "  {:.3e}", self.get(nr - 1, 0))?;
                if nc > 2 {
                    write!(f, " ...")?;
                }
                if nc > 1 {
                    write!(f, " {:.3e}", self.get(nr - 1, nc - 1))?;
                }
            }
            write!(f, " ]")?;
        }

        write!(f, " ({} x {}) Dense", nr, nc)
    }
}

//

/// Factory of [`DenseSerialMatrix`] for a fixed domain and range.
pub struct DenseSerialMatrixFactory<L: LinAlgEx>
{
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
}

impl<L: LinAlgEx> DenseSerialMatrixFactory<L>
{
    pub fn new(domain: &VectorSpace<L>, range: &VectorSpace<L>) -> Self
    {
        DenseSerialMatrixFactory {
            domain: domain.clone(),
            range: range.clone(),
        }
    }

    pub fn domain(&self) -> &VectorSpace<L>
    {
        &self.domain
    }

    pub fn range(&self) -> &VectorSpace<L>
    {
        &self.range
    }

    /// Creates a zero matrix.
    pub fn create_matrix(&self) -> DenseSerialMatrix<L>
    {
        DenseSerialMatrix::new(&self.domain, &self.range)
    }
}

//

fn as_dense<L: LinAlgEx>(a: &LinearOperator<L>) -> Result<&DenseSerialMatrix<L>, OpError>
{
    match a.downcast_ref::<DenseSerialMatrix<L>>() {
        Some(m) => Ok(m),
        None => {
            log::error!("{} is not a dense serial matrix", a.description());
            Err(OpError::NotDense)
        },
    }
}

/// Solves \\(A x = b\\) by LU factorization.
///
/// Fails with [`OpError`] if `a` is not a square [`DenseSerialMatrix`] or the spaces of `b`, `x` do not match.
/// A singular \\(A\\) is not an error: the returned state is [`SolveStatus::Crashed`] carrying the LAPACK `info`,
/// and `x` is left unchanged.
pub fn dense_solve<L: LinAlgEx>(a: &LinearOperator<L>, b: &Vector<L>, x: &mut Vector<L>) -> Result<SolverState<L::F>, OpError>
{
    let mat = as_dense(a)?;
    let n = mat.num_rows();

    if n != mat.num_cols() {
        log::error!("dense_solve: {}x{} matrix is not square", n, mat.num_cols());
        return Err(OpError::DimensionMismatch);
    }
    mat.range.check_compatible(b.space(), "dense_solve")?;
    mat.domain.check_compatible(x.space(), "dense_solve")?;

    let mut lu = mat.data.clone();
    let mut ipiv = vec![0; n];
    let mut rhs = b.to_vec();

    let info = L::solve_ge(n, 1, &mut lu, &mut ipiv, &mut rhs);

    if info != 0 {
        log::warn!("dense_solve: dgesv info={}", info);
        return Ok(SolverState::crashed(format!("solve crashed with dgesv info={}", info), info));
    }

    x.with_mut(|x| L::copy(&rhs, x));
    log::debug!("dense_solve: solved {}x{}", n, n);
    Ok(SolverState::new(SolveStatus::Converged, "dgesv success".to_string(), 0, L::F::zero()))
}

/// Thin singular value decomposition \\(A = U {\bf diag}(\sigma) V^T\\).
pub struct DenseSvd<L: LinAlgEx>
{
    /// \\(U\\), \\(m \times s\\).
    pub u: LinearOperator<L>,
    /// \\(\sigma\\) in descending order, in a space of \\(s = \min(m, n)\\) entries.
    pub sigma: Vector<L>,
    /// \\(V^T\\), \\(s \times n\\).
    pub vt: LinearOperator<L>,
}

/// Computes the thin singular value decomposition of `a`.
///
/// Fails with [`OpError::NotDense`] if `a` is not a [`DenseSerialMatrix`].
/// A decomposition failure is not an error: the returned state is [`SolveStatus::Crashed`]
/// carrying the LAPACK `info`, with no decomposition.
pub fn dense_svd<L: LinAlgEx>(a: &LinearOperator<L>) -> Result<(SolverState<L::F>, Option<DenseSvd<L>>), OpError>
{
    let mat = as_dense(a)?;
    let (m, n) = (mat.num_rows(), mat.num_cols());
    let k = m.min(n);

    let mut work_a = mat.data.clone();
    let mut s = vec![L::F::zero(); k];
    let mut u = vec![L::F::zero(); m * k];
    let mut vt = vec![L::F::zero(); k * n];
    let mut work = vec![L::F::zero(); L::svd_ge_worklen(m, n)];

    let info = L::svd_ge(m, n, &mut work_a, &mut s, &mut u, &mut vt, &mut work);

    if info != 0 {
        log::warn!("dense_svd: dgesvd info={}", info);
        return Ok((SolverState::crashed(format!("svd crashed with dgesvd info={}", info), info), None));
    }

    let s_space = VectorSpace::new(k);
    let sigma = s_space.create_member_from(&s)?;
    let u = DenseSerialMatrix::from_data(s_space.clone(), mat.range.clone(), u).into_operator();
    let vt = DenseSerialMatrix::from_data(mat.domain.clone(), s_space, vt).into_operator();

    log::debug!("dense_svd: {}x{}, largest singular value {:.3e}", m, n, s.first().copied().unwrap_or(L::F::nan()));
    Ok((
        SolverState::new(SolveStatus::Converged, "dgesvd success".to_string(), 0, L::F::zero()),
        Some(DenseSvd {u, sigma, vt})
    ))
}

//

#[test]
fn test_dense_assembly()
{
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let d = VectorSpace::<La>::new(3);
    let r = VectorSpace::<La>::new(2);
    let mut a = DenseSerialMatrixFactory::new(&d, &r).create_matrix();
    a.set_row(0, &[1., 2., 3.]).unwrap();
    a.add_to_row(1, &[0, 2], &[4., 6.]).unwrap();
    a.add_to_row(1, &[2], &[1.]).unwrap();
    assert_eq!(a.get(1, 2), 7.);
    assert_eq!(a.add_to_row(2, &[0], &[1.]).unwrap_err(), OpError::IndexOutOfRange);
    assert_eq!(a.add_to_row(0, &[3], &[1.]).unwrap_err(), OpError::IndexOutOfRange);
    assert_eq!(a.set_row(0, &[1.]).unwrap_err(), OpError::DimensionMismatch);

    let a = a.into_operator();
    let x = d.create_member_from(&[1., 1., 1.]).unwrap();
    let mut y = r.create_member();
    a.apply_op(&x, &mut y).unwrap();
    assert_eq!(y.to_vec(), vec![6., 11.]);

    let mut z = d.create_member();
    a.apply_transpose(&y, &mut z).unwrap();
    assert_eq!(z.to_vec(), vec![50., 12., 95.]);
}

#[test]
fn test_dense_solve()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let s = VectorSpace::<La>::new(2);
    let mut a = DenseSerialMatrix::new(&s, &s);
    a.set_row(0, &[2., 1.]).unwrap();
    a.set_row(1, &[1., 3.]).unwrap();
    let a = a.into_operator();

    let b = s.create_member_from(&[3., 5.]).unwrap();
    let mut x = s.create_member();
    let state = dense_solve(&a, &b, &mut x).unwrap();
    assert_eq!(state.status(), SolveStatus::Converged);
    assert_float_eq!(x.to_vec().as_slice(), [0.8, 1.4].as_ref(), abs_all <= 1e-12);

    let not_dense = crate::identity_operator(&s);
    assert_eq!(dense_solve(&not_dense, &b, &mut x).unwrap_err(), OpError::NotDense);
}
