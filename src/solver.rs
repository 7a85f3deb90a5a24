//! Linear solvers on operators

use num_traits::{Float, Zero, One};
use core::marker::PhantomData;
use crate::linalg::{LinAlg, LinAlgEx};
use crate::vector::Vector;
use crate::operator::{LinearOperator, Transp};
use crate::lincomb::OpTimesLC;
use crate::op_zero::is_zero_operator;
use crate::dense::dense_solve;
use crate::error::OpError;

//

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus
{
    Converged,
    /// Numerical breakdown, including singular matrices.
    Crashed,
    FailedToConverge,
}

/// Solver state
///
/// Numerical outcome of a solve, returned as a value: an informative message,
/// the number of iterations, the relative residual,
/// and the `info` code of a native routine (zero unless one failed).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverState<F: Float>
{
    status: SolveStatus,
    msg: String,
    iters: usize,
    resid: F,
    info: i32,
}

impl<F: Float> SolverState<F>
{
    pub fn new(status: SolveStatus, msg: String, iters: usize, resid: F) -> Self
    {
        SolverState {
            status, msg, iters, resid, info: 0
        }
    }

    /// [`SolveStatus::Crashed`] state of a native routine which returned `info`.
    pub fn crashed(msg: String, info: i32) -> Self
    {
        SolverState {
            status: SolveStatus::Crashed,
            msg,
            iters: 0,
            resid: F::nan(),
            info,
        }
    }

    pub fn status(&self) -> SolveStatus
    {
        self.status
    }

    pub fn msg(&self) -> &str
    {
        &self.msg
    }

    pub fn iters(&self) -> usize
    {
        self.iters
    }

    pub fn resid(&self) -> F
    {
        self.resid
    }

    pub fn info(&self) -> i32
    {
        self.info
    }

    pub fn is_converged(&self) -> bool
    {
        self.status == SolveStatus::Converged
    }
}

impl<F: Float + core::fmt::LowerExp> core::fmt::Display for SolverState<F>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{:?}: {} (iters={}, resid={:.3e}", self.status, self.msg, self.iters, self.resid)?;
        if self.info != 0 {
            write!(f, ", info={}", self.info)?;
        }
        write!(f, ")")
    }
}

//

/// Linear solver trait.
pub trait LinearSolver<L: LinAlg>
{
    /// Solves \\(K x = b\\).
    ///
    /// Returns the numerical outcome, or [`OpError`] for a programming error such as mismatched spaces.
    /// * `x` is an initial guess before entry, the solution on exit if converged.
    fn solve(&self, op: &LinearOperator<L>, b: &Vector<L>, x: &mut Vector<L>) -> Result<SolverState<L::F>, OpError>;
}

//

/// Krylov solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KrylovParam<F: Float>
{
    /// Max iteration number.
    pub max_iter: usize,
    /// Tolerance of the residual relative to \\(\\|b\\|_2\\).
    pub tol: F,
    /// Tolerance of small positive value to detect breakdown.
    pub eps_zero: F,
    /// Period of iterations to output progress log (for debug level). `0` means no periodic log.
    pub log_period: usize,
}

impl<F: Float> Default for KrylovParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap_or_else(F::one);

        KrylovParam {
            max_iter: 500,
            tol: ten.powi(-10),
            eps_zero: ten.powi(-14),
            log_period: 0,
        }
    }
}

/// Unpreconditioned BiCGSTAB solver.
pub struct BicgstabSolver<L: LinAlg>
{
    par: KrylovParam<L::F>,
}

impl<L: LinAlg> BicgstabSolver<L>
{
    /// Creates an instance with default parameters.
    pub fn new() -> Self
    {
        BicgstabSolver {
            par: KrylovParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`BicgstabSolver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut KrylovParam<L::F>)
    {
        f(&mut self.par);
        self
    }

    fn breakdown(&self, den: L::F, norm_b: L::F) -> bool
    {
        den.abs().sqrt() / norm_b < self.par.eps_zero
    }
}

impl<L: LinAlg> Default for BicgstabSolver<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> LinearSolver<L> for BicgstabSolver<L>
{
    fn solve(&self, op: &LinearOperator<L>, b: &Vector<L>, x: &mut Vector<L>) -> Result<SolverState<L::F>, OpError>
    {
        let f0 = L::F::zero();
        let tol = self.par.tol;

        op.range().check_compatible(b.space(), "bicgstab rhs")?;
        op.domain().check_compatible(x.space(), "bicgstab solution")?;

        log::debug!("{:?}", self.par);

        let norm_b = b.norm2();
        if norm_b < tol {
            x.zero();
            log::debug!("bicgstab: zero rhs");
            return Ok(SolverState::new(SolveStatus::Converged, "RHS was zero".to_string(), 0, f0));
        }

        let mut x0 = x.copy();
        let mut ap = b.space().create_member();
        op.apply_op(&x0, &mut ap)?;
        let mut r0 = b.space().create_member();
        r0.assign(b - &ap)?;

        let mut resid = r0.norm2() / norm_b;
        if resid < tol {
            log::debug!("bicgstab: initial residual {:.3e}", resid);
            return Ok(SolverState::new(SolveStatus::Converged, "initial resid was zero".to_string(), 0, resid));
        }

        let mut p0 = r0.copy();
        let r0_hat = r0.copy();
        let mut x_mid = x.space().create_member();
        let mut r_mid = b.space().create_member();
        let mut ar_mid = b.space().create_member();
        let mut xk = x.space().create_member();
        let mut rk = b.space().create_member();

        for k in 1..= self.par.max_iter {
            op.apply_op(&p0, &mut ap)?;

            let den = ap.dot(&r0_hat)?;
            if self.breakdown(den, norm_b) {
                log::warn!("bicgstab: failure mode 1 at {}", k);
                return Ok(SolverState::new(SolveStatus::Crashed, "BICGSTAB failure mode 1".to_string(), k, resid));
            }
            let a0 = r0.dot(&r0_hat)? / den;

            x_mid.assign(&x0 + OpTimesLC::scaled(a0, &p0))?;
            r_mid.assign(&r0 - OpTimesLC::scaled(a0, &ap))?;

            resid = r_mid.norm2() / norm_b;
            if resid < tol {
                x.accept_copy_of(&x_mid)?;
                log::debug!("bicgstab: converged at {} (half step), resid {:.3e}", k, resid);
                return Ok(SolverState::new(SolveStatus::Converged, "converged".to_string(), k, resid));
            }

            op.apply_op(&r_mid, &mut ar_mid)?;

            let den = ar_mid.dot(&ar_mid)?;
            if self.breakdown(den, norm_b) {
                log::warn!("bicgstab: failure mode 2 at {}", k);
                return Ok(SolverState::new(SolveStatus::Crashed, "BICGSTAB failure mode 2".to_string(), k, resid));
            }
            let w = r_mid.dot(&ar_mid)? / den;

            xk.assign(&x_mid + OpTimesLC::scaled(w, &r_mid))?;
            rk.assign(&r_mid - OpTimesLC::scaled(w, &ar_mid))?;

            resid = rk.norm2() / norm_b;
            if resid < tol {
                x.accept_copy_of(&xk)?;
                log::debug!("bicgstab: converged at {}, resid {:.3e}", k, resid);
                return Ok(SolverState::new(SolveStatus::Converged, "converged".to_string(), k, resid));
            }

            let den = w * r0.dot(&r0_hat)?;
            if self.breakdown(den, norm_b) {
                log::warn!("bicgstab: failure mode 3 at {}", k);
                return Ok(SolverState::new(SolveStatus::Crashed, "BICGSTAB failure mode 3".to_string(), k, resid));
            }
            let beta = a0 * rk.dot(&r0_hat)? / den;

            p0.assign(&rk + OpTimesLC::scaled(beta, &p0) - OpTimesLC::scaled(beta * w, &ap))?;
            r0.accept_copy_of(&rk)?;
            x0.accept_copy_of(&xk)?;

            if self.par.log_period > 0 && k % self.par.log_period == 0 {
                log::debug!("bicgstab: {}: resid {:.3e}", k, resid);
            }
            else {
                log::trace!("bicgstab: {}: resid {:.3e}", k, resid);
            }
        }

        log::warn!("bicgstab: failed to converge in {} iterations", self.par.max_iter);
        Ok(SolverState::new(SolveStatus::FailedToConverge, "BICGSTAB failed to converge".to_string(), self.par.max_iter, resid))
    }
}

//

/// Direct solver of a [`crate::DenseSerialMatrix`] operator, see [`dense_solve`].
pub struct DenseLuSolver<L: LinAlgEx>
{
    ph_l: PhantomData<L>,
}

impl<L: LinAlgEx> DenseLuSolver<L>
{
    pub fn new() -> Self
    {
        DenseLuSolver {
            ph_l: PhantomData,
        }
    }
}

impl<L: LinAlgEx> Default for DenseLuSolver<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlgEx> LinearSolver<L> for DenseLuSolver<L>
{
    fn solve(&self, op: &LinearOperator<L>, b: &Vector<L>, x: &mut Vector<L>) -> Result<SolverState<L::F>, OpError>
    {
        dense_solve(op, b, x)
    }
}

//

/// Block lower-triangular solver
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Forward substitution over the blocks of a [`crate::BlockOp`]:
/// \\[
/// K_{ii} x_i = b_i - \sum_{j<i} K_{ij} x_j,
/// \\]
/// each diagonal block solved by an inner solver.
/// Blocks above the diagonal are ignored.
/// `x` is overwritten only when every block converged.
pub struct BlockTriangularSolver<L: LinAlg>
{
    inner: Box<dyn LinearSolver<L>>,
}

impl<L: LinAlg> BlockTriangularSolver<L>
{
    pub fn new(inner: Box<dyn LinearSolver<L>>) -> Self
    {
        BlockTriangularSolver {
            inner
        }
    }
}

impl<L: LinAlg> LinearSolver<L> for BlockTriangularSolver<L>
{
    fn solve(&self, op: &LinearOperator<L>, b: &Vector<L>, x: &mut Vector<L>) -> Result<SolverState<L::F>, OpError>
    {
        let f1 = L::F::one();
        let n = op.num_block_rows();

        if n != op.num_block_cols() {
            log::error!("block triangular solve of {}x{} blocks", n, op.num_block_cols());
            return Err(OpError::DimensionMismatch);
        }
        op.range().check_compatible(b.space(), "block triangular rhs")?;
        op.domain().check_compatible(x.space(), "block triangular solution")?;

        let mut sol = x.copy();
        let mut iters = 0;
        let mut resid = L::F::zero();

        for i in 0.. n {
            let mut rhs = b.get_block(i)?.copy();
            for j in 0.. i {
                let aij = op.get_block(i, j)?;
                if is_zero_operator(&aij) {
                    continue;
                }
                aij.apply(Transp::NoTrans, &sol.get_block(j)?, &mut rhs, -f1, f1)?;
            }

            let mut xi = sol.get_block(i)?;
            let state = self.inner.solve(&op.get_block(i, i)?, &rhs, &mut xi)?;
            if !state.is_converged() {
                log::warn!("block triangular: block {}: {}", i, state.msg());
                return Ok(state);
            }
            iters += state.iters();
            resid = resid.max(state.resid());
        }

        x.accept_copy_of(&sol)?;
        log::debug!("block triangular: {} blocks solved", n);
        Ok(SolverState::new(SolveStatus::Converged, "block triangular solve converged".to_string(), iters, resid))
    }
}

//

/// Solver configuration, see [`build_solver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolverConfig<F: Float>
{
    /// [`BicgstabSolver`].
    Bicgstab(KrylovParam<F>),
    /// [`DenseLuSolver`].
    DenseLu,
    /// [`BlockTriangularSolver`] with the inner solver of the diagonal blocks.
    BlockTriangular(Box<SolverConfig<F>>),
}

/// Builds the solver `config` describes.
pub fn build_solver<L: LinAlgEx>(config: &SolverConfig<L::F>) -> Box<dyn LinearSolver<L>>
{
    match config {
        SolverConfig::Bicgstab(p) => {
            let p = p.clone();
            Box::new(BicgstabSolver::new().par(|par| *par = p))
        },
        SolverConfig::DenseLu => Box::new(DenseLuSolver::new()),
        SolverConfig::BlockTriangular(inner) => Box::new(BlockTriangularSolver::new(build_solver(inner))),
    }
}

//

#[test]
fn test_bicgstab_diag()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use crate::op_diagonal::diagonal_operator;

    type La = FloatGeneric<f64>;

    let _ = env_logger::builder().is_test(true).try_init();

    let d = Vector::<La>::from_vec(vec![1., 2., 4., 8.]);
    let op = diagonal_operator(&d);
    let b = d.space().create_member_from(&[1., 1., 1., 1.]).unwrap();
    let mut x = d.space().create_member();

    let state = BicgstabSolver::new().par(|p| p.max_iter = 50).solve(&op, &b, &mut x).unwrap();
    assert!(state.is_converged(), "{}", state);
    assert_float_eq!(x.to_vec().as_slice(), [1., 0.5, 0.25, 0.125].as_ref(), abs_all <= 1e-8);
}

#[test]
fn test_bicgstab_zero_rhs()
{
    use crate::FloatGeneric;
    use crate::op_identity::identity_operator;

    type La = FloatGeneric<f64>;

    let b = Vector::<La>::from_vec(vec![0., 0.]);
    let mut x = b.space().create_member_from(&[5., 5.]).unwrap();
    let state = BicgstabSolver::new().solve(&identity_operator(b.space()), &b, &mut x).unwrap();
    assert_eq!(state.status(), SolveStatus::Converged);
    assert_eq!(state.msg(), "RHS was zero");
    assert_eq!(x.to_vec(), vec![0., 0.]);
}
