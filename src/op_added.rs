//! Sum of operators

use std::any::Any;
use num_traits::One;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator, Transp};
use crate::op_zero::{zero_operator, is_zero_operator};
use crate::error::OpError;

//

/// Sum of operators \\(K_0 + K_1 + \cdots\\) sharing one domain and one range.
///
/// Terms are accumulated into a temporary which is then combined into `y` once,
/// so `y` is never an intermediate accumulator.
pub struct AddedOp<L: LinAlg>
{
    ops: Vec<LinearOperator<L>>,
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
}

impl<L: LinAlg> AddedOp<L>
{
    /// Terms of the sum.
    pub fn operands(&self) -> &[LinearOperator<L>]
    {
        &self.ops
    }

    fn sum(&self, transp: Transp, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let f1 = L::F::one();

        let mut tmp = y.space().create_member();
        for op in self.ops.iter() {
            op.apply(transp, x, &mut tmp, f1, f1)?;
        }

        y.update_scaled(alpha, &tmp, beta)
    }
}

impl<L: LinAlg> Operator<L> for AddedOp<L>
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
        self.sum(Transp::NoTrans, alpha, x, beta, y)
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.sum(Transp::Trans, alpha, x, beta, y)
    }

    fn description(&self) -> String
    {
        let terms: Vec<String> = self.ops.iter().map(|op| op.description()).collect();
        format!("({})", terms.join(" + "))
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Sum of `ops`.
///
/// Fails with [`OpError::EmptyOperands`] if `ops` is empty,
/// or [`OpError::IncompatibleSpaces`] if the operands do not share the domain and the range.
///
/// * Zero operators are dropped and nested sums are flattened.
/// * If one term remains, it is returned itself.
/// * If no term remains, a single zero operator is returned.
pub fn added_operator<L: LinAlg>(ops: &[LinearOperator<L>]) -> Result<LinearOperator<L>, OpError>
{
    let first = match ops.first() {
        Some(op) => op,
        None => {
            log::error!("added_operator: no operand");
            return Err(OpError::EmptyOperands);
        },
    };
    let domain = first.domain();
    let range = first.range();

    for op in ops.iter() {
        if !domain.is_compatible(&op.domain()) || !range.is_compatible(&op.range()) {
            log::error!("added_operator: {} does not match {}", op.description(), first.description());
            return Err(OpError::IncompatibleSpaces);
        }
    }

    let mut terms = Vec::new();
    for op in ops.iter() {
        if let Some(a) = op.downcast_ref::<AddedOp<L>>() {
            terms.extend(a.ops.iter().cloned());
        }
        else if is_zero_operator(op) {
            log::debug!("added_operator: zero term dropped");
        }
        else {
            terms.push(op.clone());
        }
    }

    match terms.len() {
        0 => Ok(zero_operator(&domain, &range)),
        1 => Ok(terms.swap_remove(0)),
        _ => Ok(LinearOperator::new(AddedOp {
            ops: terms, domain, range
        })),
    }
}
