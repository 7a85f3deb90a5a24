//! Zero operator

use std::any::Any;
use num_traits::Zero;
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator};
use crate::error::OpError;

//

/// Zero operator \\(0: \mathcal{D} \to \mathcal{R}\\).
///
/// Applying it only scales `y` by `beta` and never reads `x`.
pub struct ZeroOp<L: LinAlg>
{
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
}

impl<L: LinAlg> ZeroOp<L>
{
    pub fn new(domain: VectorSpace<L>, range: VectorSpace<L>) -> Self
    {
        ZeroOp {
            domain, range
        }
    }

    fn scale_y(beta: L::F, y: &mut Vector<L>)
    {
        if beta == L::F::zero() {
            y.zero();
        }
        else {
            y.scale(beta);
        }
    }
}

impl<L: LinAlg> Operator<L> for ZeroOp<L>
{
    fn domain(&self) -> VectorSpace<L>
    {
        self.domain.clone()
    }

    fn range(&self) -> VectorSpace<L>
    {
        self.range.clone()
    }

    fn op(&self, _alpha: L::F, _x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        Self::scale_y(beta, y);
        Ok(())
    }

    fn trans_op(&self, _alpha: L::F, _x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        Self::scale_y(beta, y);
        Ok(())
    }

    fn description(&self) -> String
    {
        format!("ZeroOp[{} -> {}]", self.domain.dim(), self.range.dim())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Zero operator from `domain` to `range`.
pub fn zero_operator<L: LinAlg>(domain: &VectorSpace<L>, range: &VectorSpace<L>) -> LinearOperator<L>
{
    LinearOperator::new(ZeroOp::new(domain.clone(), range.clone()))
}

/// Checks if `op` is a [`ZeroOp`].
pub fn is_zero_operator<L: LinAlg>(op: &LinearOperator<L>) -> bool
{
    op.downcast_ref::<ZeroOp<L>>().is_some()
}

//

#[test]
fn test_zero_beta()
{
    use crate::FloatGeneric;
    use crate::operator::Transp;

    type La = FloatGeneric<f64>;

    let d = VectorSpace::<La>::new(3);
    let r = VectorSpace::<La>::new(2);
    let z = zero_operator(&d, &r);

    let x = d.create_member_from(&[f64::NAN, 1., 2.]).unwrap();
    let mut y = r.create_member_from(&[3., 4.]).unwrap();
    z.apply(Transp::NoTrans, &x, &mut y, 1., 1.).unwrap();
    assert_eq!(y.to_vec(), vec![3., 4.]);
    z.apply(Transp::NoTrans, &x, &mut y, 1., 0.5).unwrap();
    assert_eq!(y.to_vec(), vec![1.5, 2.]);

    let mut w = d.create_member_from(&[f64::NAN, 1., 1.]).unwrap();
    z.apply(Transp::Trans, &y, &mut w, 1., 0.).unwrap();
    assert_eq!(w.to_vec(), vec![0., 0., 0.]);
}
