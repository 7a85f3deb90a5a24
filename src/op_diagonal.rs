//! Diagonal operator

use std::any::Any;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator};
use crate::error::OpError;

//

/// Diagonal operator \\(D = {\bf diag}(d)\\).
///
/// Holds a handle to \\(d\\), sharing its storage.
pub struct DiagonalOp<L: LinAlg>
{
    diag: Vector<L>,
}

impl<L: LinAlg> DiagonalOp<L>
{
    /// Diagonal vector \\(d\\).
    pub fn diagonal(&self) -> &Vector<L>
    {
        &self.diag
    }
}

impl<L: LinAlg> Operator<L> for DiagonalOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.diag.space().clone()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.diag.space().clone()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        y.zip2_mut(&self.diag, x, |d, x, y| L::transform_di(alpha, d, x, beta, y));
        Ok(())
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op(alpha, x, beta, y)
    }

    fn description(&self) -> String
    {
        format!("DiagonalOp[{}]", self.diag.dim())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Operator \\({\bf diag}(d)\\) on the space of `diag`.
pub fn diagonal_operator<L: LinAlg>(diag: &Vector<L>) -> LinearOperator<L>
{
    LinearOperator::new(DiagonalOp {
        diag: diag.clone()
    })
}
