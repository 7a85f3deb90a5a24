//! Linear operator

use std::rc::Rc;
use std::any::Any;
use num_traits::{Zero, One};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::error::OpError;
use crate::op_block::BlockOp;

//

/// Transpose flag of [`LinearOperator::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transp
{
    /// Applies \\(K\\).
    NoTrans,
    /// Applies \\(K^T\\).
    Trans,
}

impl Transp
{
    /// The other mode.
    pub fn flip(self) -> Self
    {
        match self {
            Transp::NoTrans => Transp::Trans,
            Transp::Trans => Transp::NoTrans,
        }
    }
}

/// Linear operator trait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Expresses a linear operator \\(K: \mathcal{D} \to \mathcal{R}\\)
/// from its [`Operator::domain`] to its [`Operator::range`].
///
/// Implementations are called through [`LinearOperator::apply`],
/// which has already checked the spaces of `x` and `y` and guarantees that `x` does not alias `y`.
pub trait Operator<L: LinAlg>
{
    /// Domain space \\(\mathcal{D}\\).
    fn domain(&self) -> VectorSpace<L>;

    /// Range space \\(\mathcal{R}\\).
    fn range(&self) -> VectorSpace<L>;

    /// Calculate \\(\alpha K x + \beta y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x \in \mathcal{D}\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y \in \mathcal{R}\\) before entry,
    ///   \\(\alpha K x + \beta y\\) on exit.
    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>;

    /// Calculate \\(\alpha K^T x + \beta y\\).
    ///
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `x` is a vector \\(x \in \mathcal{R}\\).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y \in \mathcal{D}\\) before entry,
    ///   \\(\alpha K^T x + \beta y\\) on exit.
    ///
    /// Operators without a transpose mode keep this default, which fails.
    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let _ = (alpha, x, beta, y);
        log::error!("{} does not implement the transpose mode", self.description());
        Err(OpError::UnsupportedOperation)
    }

    /// Human-readable description.
    fn description(&self) -> String;

    /// Upcast used by the composite factories to recognize concrete operators.
    fn as_any(&self) -> &dyn Any;
}

//

/// Linear operator handle
///
/// Reference-counted handle to an [`Operator`].
/// Cloning shares the operator; operators are immutable once wrapped,
/// so a single operator may be a child of any number of composites.
pub struct LinearOperator<L: LinAlg>
{
    ptr: Rc<dyn Operator<L>>,
}

impl<L: LinAlg> Clone for LinearOperator<L>
{
    fn clone(&self) -> Self
    {
        LinearOperator {
            ptr: Rc::clone(&self.ptr),
        }
    }
}

impl<L: LinAlg> LinearOperator<L>
{
    /// Wraps a concrete operator.
    pub fn new<O: Operator<L> + 'static>(op: O) -> Self
    {
        LinearOperator {
            ptr: Rc::new(op),
        }
    }

    /// Checks if both handles share the same operator.
    pub fn ptr_eq(&self, other: &LinearOperator<L>) -> bool
    {
        Rc::as_ptr(&self.ptr) as *const () == Rc::as_ptr(&other.ptr) as *const ()
    }

    pub fn domain(&self) -> VectorSpace<L>
    {
        self.ptr.domain()
    }

    pub fn range(&self) -> VectorSpace<L>
    {
        self.ptr.range()
    }

    pub fn description(&self) -> String
    {
        self.ptr.description()
    }

    /// Concrete operator of type `T`, if it is one.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T>
    {
        self.ptr.as_any().downcast_ref::<T>()
    }

    /// Calculate \\(y := \alpha K x + \beta y\\), or \\(y := \alpha K^T x + \beta y\\) with [`Transp::Trans`].
    ///
    /// Fails with [`OpError::DimensionMismatch`] if `x` or `y` does not belong to the corresponding space.
    /// `x` may alias `y`.
    /// With \\(\alpha = 0\\) the operator is not invoked and `x` is not read.
    pub fn apply(&self, transp: Transp, x: &Vector<L>, y: &mut Vector<L>, alpha: L::F, beta: L::F) -> Result<(), OpError>
    {
        let (dom, ran) = match transp {
            Transp::NoTrans => (self.domain(), self.range()),
            Transp::Trans => (self.range(), self.domain()),
        };

        if !dom.is_compatible(x.space()) || !ran.is_compatible(y.space()) {
            log::error!("apply {:?} of {}: x in {}, y in {}", transp, self.description(), x.space(), y.space());
            return Err(OpError::DimensionMismatch);
        }

        log::trace!("apply {:?} {}", transp, self.description());

        // quick return as dgemv: x is not read
        if alpha == L::F::zero() {
            if beta == L::F::zero() {
                y.zero();
            }
            else if beta != L::F::one() {
                y.scale(beta);
            }
            return Ok(());
        }

        let x_copy;
        let x = if x.aliases(y) {
            x_copy = x.copy();
            &x_copy
        }
        else {
            x
        };

        match transp {
            Transp::NoTrans => self.ptr.op(alpha, x, beta, y),
            Transp::Trans => self.ptr.trans_op(alpha, x, beta, y),
        }
    }

    /// Calculate \\(y := K x\\).
    pub fn apply_op(&self, x: &Vector<L>, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.apply(Transp::NoTrans, x, y, L::F::one(), L::F::zero())
    }

    /// Calculate \\(y := K^T x\\).
    pub fn apply_transpose(&self, x: &Vector<L>, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.apply(Transp::Trans, x, y, L::F::one(), L::F::zero())
    }

    /// Transposed operator, see [`crate::transposed_operator`].
    pub fn transpose(&self) -> LinearOperator<L>
    {
        crate::op_transposed::transposed_operator(self)
    }

    /// Number of block rows: that of a [`BlockOp`], otherwise one.
    pub fn num_block_rows(&self) -> usize
    {
        match self.downcast_ref::<BlockOp<L>>() {
            Some(b) => b.num_block_rows(),
            None => 1,
        }
    }

    /// Number of block columns: that of a [`BlockOp`], otherwise one.
    pub fn num_block_cols(&self) -> usize
    {
        match self.downcast_ref::<BlockOp<L>>() {
            Some(b) => b.num_block_cols(),
            None => 1,
        }
    }

    /// Block `(i, j)`. An operator which is not a [`BlockOp`] is its own single block.
    pub fn get_block(&self, i: usize, j: usize) -> Result<LinearOperator<L>, OpError>
    {
        if let Some(b) = self.downcast_ref::<BlockOp<L>>() {
            b.get_block(i, j)
        }
        else if i == 0 && j == 0 {
            Ok(self.clone())
        }
        else {
            log::error!("block ({}, {}) of non-block operator {}", i, j, self.description());
            Err(OpError::IndexOutOfRange)
        }
    }
}

impl<L: LinAlg> core::fmt::Display for LinearOperator<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{}", self.description())
    }
}

impl<L: LinAlg> core::fmt::Debug for LinearOperator<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "LinearOperator({})", self.description())
    }
}

//

impl<'a, 'b, L: LinAlg> core::ops::Add<&'b LinearOperator<L>> for &'a LinearOperator<L>
{
    type Output = Result<LinearOperator<L>, OpError>;

    fn add(self, rhs: &'b LinearOperator<L>) -> Self::Output
    {
        crate::op_added::added_operator(&[self.clone(), rhs.clone()])
    }
}

impl<'a, 'b, L: LinAlg> core::ops::Sub<&'b LinearOperator<L>> for &'a LinearOperator<L>
{
    type Output = Result<LinearOperator<L>, OpError>;

    fn sub(self, rhs: &'b LinearOperator<L>) -> Self::Output
    {
        crate::op_added::added_operator(&[self.clone(), -rhs])
    }
}

impl<'a, 'b, L: LinAlg> core::ops::Mul<&'b LinearOperator<L>> for &'a LinearOperator<L>
{
    type Output = Result<LinearOperator<L>, OpError>;

    fn mul(self, rhs: &'b LinearOperator<L>) -> Self::Output
    {
        crate::op_composed::composed_operator(&[self.clone(), rhs.clone()])
    }
}

impl<'a, L: LinAlg> core::ops::Neg for &'a LinearOperator<L>
{
    type Output = LinearOperator<L>;

    fn neg(self) -> Self::Output
    {
        crate::op_scaled::scaled_operator(-L::F::one(), self)
    }
}

impl<L: LinAlg> core::ops::Neg for LinearOperator<L>
{
    type Output = LinearOperator<L>;

    fn neg(self) -> Self::Output
    {
        -&self
    }
}

macro_rules! impl_scalar_mul_op {
    ($f:ty) => {
        impl<'a, L: LinAlg<F=$f>> core::ops::Mul<&'a LinearOperator<L>> for $f
        {
            type Output = LinearOperator<L>;

            fn mul(self, rhs: &'a LinearOperator<L>) -> Self::Output
            {
                crate::op_scaled::scaled_operator(self, rhs)
            }
        }

        impl<L: LinAlg<F=$f>> core::ops::Mul<LinearOperator<L>> for $f
        {
            type Output = LinearOperator<L>;

            fn mul(self, rhs: LinearOperator<L>) -> Self::Output
            {
                crate::op_scaled::scaled_operator(self, &rhs)
            }
        }
    };
}

impl_scalar_mul_op!(f64);
impl_scalar_mul_op!(f32);
