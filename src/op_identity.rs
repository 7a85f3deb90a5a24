//! Identity operator

use std::any::Any;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator};
use crate::error::OpError;

//

/// Identity operator \\(I: \mathcal{D} \to \mathcal{D}\\).
pub struct IdentityOp<L: LinAlg>
{
    space: VectorSpace<L>,
}

impl<L: LinAlg> IdentityOp<L>
{
    pub fn new(space: VectorSpace<L>) -> Self
    {
        IdentityOp {
            space
        }
    }
}

impl<L: LinAlg> Operator<L> for IdentityOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.space.clone()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.space.clone()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        y.update_scaled(alpha, x, beta)
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        y.update_scaled(alpha, x, beta)
    }

    fn description(&self) -> String
    {
        format!("IdentityOp[{}]", self.space.dim())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Identity operator on `space`.
pub fn identity_operator<L: LinAlg>(space: &VectorSpace<L>) -> LinearOperator<L>
{
    LinearOperator::new(IdentityOp::new(space.clone()))
}

/// Checks if `op` is an [`IdentityOp`].
pub fn is_identity_operator<L: LinAlg>(op: &LinearOperator<L>) -> bool
{
    op.downcast_ref::<IdentityOp<L>>().is_some()
}
