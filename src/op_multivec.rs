//! Multi-vector operator

use std::any::Any;
use num_traits::{Zero, One};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator};
use crate::error::OpError;

//

/// Multi-vector operator \\(M = [c_0, c_1, \cdots]\\)
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Its columns \\(c_i\\) share the range space; the domain has one entry per column.
/// * \\(M x = \sum_i x_i c_i\\).
/// * \\((M^T x)_i = c_i^T x\\).
pub struct MultiVectorOp<L: LinAlg>
{
    cols: Vec<Vector<L>>,
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
}

impl<L: LinAlg> MultiVectorOp<L>
{
    /// Columns.
    pub fn columns(&self) -> &[Vector<L>]
    {
        &self.cols
    }

    fn combine(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let xs = x.to_vec();

        if beta == L::F::zero() {
            y.zero();
        }
        else {
            y.scale(beta);
        }
        for (c, xi) in self.cols.iter().zip(xs) {
            y.update(alpha * xi, c)?;
        }
        Ok(())
    }
}

impl<L: LinAlg> Operator<L> for MultiVectorOp<L>
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
        if self.cols.iter().any(|c| c.aliases(y)) {
            let mut tmp = self.range.create_member();
            self.combine(alpha, x, L::F::zero(), &mut tmp)?;
            y.update_scaled(L::F::one(), &tmp, beta)
        }
        else {
            self.combine(alpha, x, beta, y)
        }
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let mut dots = Vec::with_capacity(self.cols.len());
        for c in self.cols.iter() {
            dots.push(c.dot(x)?);
        }

        y.with_mut(|y| {
            for (v, d) in y.iter_mut().zip(dots) {
                *v = if beta == L::F::zero() {
                    alpha * d
                }
                else {
                    alpha * d + beta * *v
                };
            }
        });
        Ok(())
    }

    fn description(&self) -> String
    {
        format!("MultiVectorOp[{} columns of {}]", self.cols.len(), self.range.dim())
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// Operator whose columns are `cols`.
///
/// `domain` is the space of the column coefficients; a new space of `cols.len()` entries if `None`.
/// Fails with [`OpError::EmptyOperands`] if `cols` is empty,
/// or [`OpError::IncompatibleSpaces`] if the columns do not share a space or `domain` has a wrong dimension.
pub fn multi_vector_operator<L: LinAlg>(cols: &[Vector<L>], domain: Option<&VectorSpace<L>>) -> Result<LinearOperator<L>, OpError>
{
    let range = match cols.first() {
        Some(c) => c.space().clone(),
        None => {
            log::error!("multi_vector_operator: no column");
            return Err(OpError::EmptyOperands);
        },
    };

    for (i, c) in cols.iter().enumerate() {
        if !range.is_compatible(c.space()) {
            log::error!("multi_vector_operator: column {} in {}, column 0 in {}", i, c.space(), range);
            return Err(OpError::IncompatibleSpaces);
        }
    }

    let domain = match domain {
        Some(d) if d.dim() == cols.len() => d.clone(),
        Some(d) => {
            log::error!("multi_vector_operator: {} for {} columns", d, cols.len());
            return Err(OpError::IncompatibleSpaces);
        },
        None => VectorSpace::new(cols.len()),
    };

    Ok(LinearOperator::new(MultiVectorOp {
        cols: cols.to_vec(), domain, range
    }))
}

//

#[test]
fn test_multivec()
{
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let c0 = Vector::<La>::from_vec(vec![1., 0., 1.]);
    let c1 = c0.space().create_member_from(&[0., 2., 0.]).unwrap();
    let m = multi_vector_operator(&[c0.clone(), c1], None).unwrap();
    assert_eq!(m.domain().dim(), 2);

    let x = m.domain().create_member_from(&[3., 4.]).unwrap();
    let mut y = m.range().create_member();
    m.apply_op(&x, &mut y).unwrap();
    assert_eq!(y.to_vec(), vec![3., 8., 3.]);

    let mut z = m.domain().create_member();
    m.apply_transpose(&y, &mut z).unwrap();
    assert_eq!(z.to_vec(), vec![6., 16.]);

    let bad = Vector::<La>::from_vec(vec![1., 2.]);
    assert_eq!(multi_vector_operator(&[c0, bad], None).unwrap_err(), OpError::IncompatibleSpaces);
}
