//! Product of operators

use std::any::Any;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator, Transp};
use crate::op_zero::{zero_operator, is_zero_operator};
use crate::op_identity::{identity_operator, is_identity_operator};
use crate::error::OpError;

//

/// Product of operators \\(K_0 K_1 \cdots K_{n-1}\\).
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The input first passes through \\(K_{n-1}\\), the factor closest to it.
/// The transpose mode applies \\(K_0^T\\) first and \\(K_{n-1}^T\\) last.
pub struct ComposedOp<L: LinAlg>
{
    ops: Vec<LinearOperator<L>>,
}

impl<L: LinAlg> ComposedOp<L>
{
    /// Factors of the product, the one closest to the output first.
    pub fn operands(&self) -> &[LinearOperator<L>]
    {
        &self.ops
    }
}

impl<L: LinAlg> Operator<L> for ComposedOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.ops[self.ops.len() - 1].domain()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.ops[0].range()
    }

    fn op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let n = self.ops.len();

        let mut cur = x.clone();
        for op in self.ops[1..].iter().rev() {
            let mut t = op.range().create_member();
            op.apply_op(&cur, &mut t)?;
            cur = t;
        }

        self.ops[0].apply(Transp::NoTrans, &cur, y, alpha, beta)?;
        log::trace!("composed: {} factors applied", n);
        Ok(())
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let n = self.ops.len();

        let mut cur = x.clone();
        for op in self.ops[.. n - 1].iter() {
            let mut t = op.domain().create_member();
            op.apply_transpose(&cur, &mut t)?;
            cur = t;
        }

        self.ops[n - 1].apply(Transp::Trans, &cur, y, alpha, beta)?;
        log::trace!("composed^T: {} factors applied", n);
        Ok(())
    }

    fn description(&self) -> String
    {
        let factors: Vec<String> = self.ops.iter().map(|op| op.description()).collect();
        format!("({})", factors.join(" * "))
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Product of `ops`, applied right to left.
///
/// Fails with [`OpError::EmptyOperands`] if `ops` is empty,
/// or [`OpError::IncompatibleSpaces`] if the domain of a factor does not match the range of the next one.
///
/// * If any factor is a zero operator, a zero operator from the domain of the last factor
///   to the range of the first factor is returned.
/// * Identity operators are dropped and nested products are flattened.
/// * If one factor remains, it is returned itself; if none, an identity operator.
pub fn composed_operator<L: LinAlg>(ops: &[LinearOperator<L>]) -> Result<LinearOperator<L>, OpError>
{
    let (first, last) = match (ops.first(), ops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            log::error!("composed_operator: no operand");
            return Err(OpError::EmptyOperands);
        },
    };

    for w in ops.windows(2) {
        if !w[0].domain().is_compatible(&w[1].range()) {
            log::error!("composed_operator: domain of {} does not match range of {}", w[0].description(), w[1].description());
            return Err(OpError::IncompatibleSpaces);
        }
    }

    if ops.iter().any(|op| is_zero_operator(op)) {
        log::debug!("composed_operator: zero factor, collapsed to zero");
        return Ok(zero_operator(&last.domain(), &first.range()));
    }

    let mut factors = Vec::new();
    for op in ops.iter() {
        if let Some(c) = op.downcast_ref::<ComposedOp<L>>() {
            factors.extend(c.ops.iter().cloned());
        }
        else if is_identity_operator(op) {
            log::debug!("composed_operator: identity factor dropped");
        }
        else {
            factors.push(op.clone());
        }
    }

    match factors.len() {
        0 => Ok(identity_operator(&first.range())),
        1 => Ok(factors.swap_remove(0)),
        _ => Ok(LinearOperator::new(ComposedOp {
            ops: factors
        })),
    }
}
