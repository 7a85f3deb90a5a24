//! Transposed operator

use std::any::Any;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator, Transp};
use crate::op_zero::{ZeroOp, zero_operator};
use crate::op_identity::IdentityOp;
use crate::op_diagonal::DiagonalOp;
use crate::error::OpError;

//

/// Transposed operator \\(K^T\\), delegating each mode to the other mode of \\(K\\).
pub struct TransposedOp<L: LinAlg>
{
    op: LinearOperator<L>,
}

impl<L: LinAlg> TransposedOp<L>
{
    /// Untransposed operator \\(K\\).
    pub fn operand(&self) -> &LinearOperator<L>
    {
        &self.op
    }
}

impl<L: LinAlg> Operator<L> for TransposedOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.op.range()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.op.domain()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op.apply(Transp::Trans, x, y, alpha, beta)
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op.apply(Transp::NoTrans, x, y, alpha, beta)
    }

    fn description(&self) -> String
    {
        format!("({})^T", self.op.description())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Operator \\(K^T\\).
///
/// * Transposing a [`TransposedOp`] returns the very handle it wraps.
/// * Transposing a zero operator returns a zero operator with domain and range swapped.
/// * Identity and diagonal operators are their own transposes.
pub fn transposed_operator<L: LinAlg>(op: &LinearOperator<L>) -> LinearOperator<L>
{
    if let Some(t) = op.downcast_ref::<TransposedOp<L>>() {
        log::debug!("transposed_operator: double transpose of {} elided", t.op.description());
        t.op.clone()
    }
    else if op.downcast_ref::<ZeroOp<L>>().is_some() {
        zero_operator(&op.range(), &op.domain())
    }
    else if op.downcast_ref::<IdentityOp<L>>().is_some() || op.downcast_ref::<DiagonalOp<L>>().is_some() {
        op.clone()
    }
    else {
        LinearOperator::new(TransposedOp {
            op: op.clone()
        })
    }
}
