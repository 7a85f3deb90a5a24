//! Scaled operator

use std::any::Any;
use num_traits::{Zero, One};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator, Transp};
use crate::op_zero::{zero_operator, is_zero_operator};
use crate::error::OpError;

//

/// Scaled operator \\(s K\\).
pub struct ScaledOp<L: LinAlg>
{
    scale: L::F,
    op: LinearOperator<L>,
}

impl<L: LinAlg> ScaledOp<L>
{
    /// Scale \\(s\\).
    pub fn scale(&self) -> L::F
    {
        self.scale
    }

    /// Unscaled operator \\(K\\).
    pub fn operand(&self) -> &LinearOperator<L>
    {
        &self.op
    }
}

impl<L: LinAlg> Operator<L> for ScaledOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.op.domain()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.op.range()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op.apply(Transp::NoTrans, x, y, alpha * self.scale, beta)
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.op.apply(Transp::Trans, x, y, alpha * self.scale, beta)
    }

    fn description(&self) -> String
    {
        format!("{}*{}", self.scale, self.op.description())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Operator \\(s K\\).
///
/// * A unit scale returns `op` itself.
/// * A zero scale, or a zero `op`, returns a zero operator of the same shape.
/// * Scaling a [`ScaledOp`] folds both scales into one.
pub fn scaled_operator<L: LinAlg>(scale: L::F, op: &LinearOperator<L>) -> LinearOperator<L>
{
    if scale == L::F::one() {
        log::debug!("scaled_operator: unit scale of {} elided", op.description());
        op.clone()
    }
    else if scale == L::F::zero() || is_zero_operator(op) {
        log::debug!("scaled_operator: {}*{} collapsed to zero", scale, op.description());
        zero_operator(&op.domain(), &op.range())
    }
    else if let Some(s) = op.downcast_ref::<ScaledOp<L>>() {
        scaled_operator(scale * s.scale, &s.op)
    }
    else {
        LinearOperator::new(ScaledOp {
            scale, op: op.clone()
        })
    }
}
