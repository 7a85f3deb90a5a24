//! Block operator

use std::any::Any;
use num_traits::{Zero, One};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{Operator, LinearOperator, Transp};
use crate::op_zero::{zero_operator, is_zero_operator};
use crate::error::OpError;

//

/// Block operator
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Operator between product spaces, made of blocks \\(K_{ij}\\)
/// from block \\(j\\) of the domain to block \\(i\\) of the range:
/// \\[
/// y_i = \sum_j K_{ij} x_j.
/// \\]
/// Assembled with [`BlockOp::set_block`] and then wrapped with [`BlockOp::into_operator`].
/// Blocks not set are zero operators.
pub struct BlockOp<L: LinAlg>
{
    domain: VectorSpace<L>,
    range: VectorSpace<L>,
    domain_blocks: Vec<VectorSpace<L>>,
    range_blocks: Vec<VectorSpace<L>>,
    blocks: Vec<Vec<LinearOperator<L>>>,
}

impl<L: LinAlg> BlockOp<L>
{
    /// Creates a block operator with all-zero blocks.
    pub fn new(domain: &VectorSpace<L>, range: &VectorSpace<L>) -> Self
    {
        let domain_blocks = domain.block_spaces();
        let range_blocks = range.block_spaces();

        let blocks = range_blocks.iter().map(|r| {
            domain_blocks.iter().map(|d| zero_operator(d, r)).collect()
        }).collect();

        BlockOp {
            domain: domain.clone(),
            range: range.clone(),
            domain_blocks,
            range_blocks,
            blocks,
        }
    }

    pub fn num_block_rows(&self) -> usize
    {
        self.range_blocks.len()
    }

    pub fn num_block_cols(&self) -> usize
    {
        self.domain_blocks.len()
    }

    fn check_index(&self, i: usize, j: usize) -> Result<(), OpError>
    {
        if i < self.num_block_rows() && j < self.num_block_cols() {
            Ok(())
        }
        else {
            log::error!("block ({}, {}) of a {}x{} block operator", i, j, self.num_block_rows(), self.num_block_cols());
            Err(OpError::IndexOutOfRange)
        }
    }

    /// Block \\(K_{ij}\\).
    pub fn get_block(&self, i: usize, j: usize) -> Result<LinearOperator<L>, OpError>
    {
        self.check_index(i, j)?;

        Ok(self.blocks[i][j].clone())
    }

    /// Sets block \\(K_{ij}\\) to `op`.
    ///
    /// Fails with [`OpError::IncompatibleSpaces`] if `op` does not map domain block `j` to range block `i`.
    pub fn set_block(&mut self, i: usize, j: usize, op: &LinearOperator<L>) -> Result<(), OpError>
    {
        self.check_index(i, j)?;

        if !self.domain_blocks[j].is_compatible(&op.domain()) || !self.range_blocks[i].is_compatible(&op.range()) {
            log::error!("block ({}, {}) expects {} -> {}, given {}", i, j, self.domain_blocks[j], self.range_blocks[i], op.description());
            return Err(OpError::IncompatibleSpaces);
        }

        self.blocks[i][j] = op.clone();
        Ok(())
    }

    /// Wraps this block operator, which becomes immutable.
    pub fn into_operator(self) -> LinearOperator<L>
    {
        LinearOperator::new(self)
    }

    fn block_apply(&self, transp: Transp, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        let f1 = L::F::one();

        let (n_out, n_in) = match transp {
            Transp::NoTrans => (self.num_block_rows(), self.num_block_cols()),
            Transp::Trans => (self.num_block_cols(), self.num_block_rows()),
        };

        for i in 0.. n_out {
            let mut yi = y.get_block(i)?;
            let mut first = true;

            for j in 0.. n_in {
                let blk = match transp {
                    Transp::NoTrans => &self.blocks[i][j],
                    Transp::Trans => &self.blocks[j][i],
                };
                if is_zero_operator(blk) {
                    continue;
                }

                let xj = x.get_block(j)?;
                blk.apply(transp, &xj, &mut yi, alpha, if first {beta} else {f1})?;
                first = false;
            }

            if first {
                if beta == L::F::zero() {
                    yi.zero();
                }
                else {
                    yi.scale(beta);
                }
            }
        }

        Ok(())
    }
}

impl<L: LinAlg> Operator<L> for BlockOp<L>
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
        self.block_apply(Transp::NoTrans, alpha, x, beta, y)
    }

    fn trans_op(&self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &mut Vector<L>) -> Result<(), OpError>
    {
        self.block_apply(Transp::Trans, alpha, x, beta, y)
    }

    fn description(&self) -> String
    {
        let mut s = format!("BlockOp[{}x{}](", self.num_block_rows(), self.num_block_cols());
        for (i, row) in self.blocks.iter().enumerate() {
            if i > 0 {
                s.push_str("; ");
            }
            let descs: Vec<String> = row.iter().map(|op| op.description()).collect();
            s.push_str(&descs.join(", "));
        }
        s.push(')');
        s
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

//

#[test]
fn test_block_set_get()
{
    use crate::FloatGeneric;
    use crate::op_identity::identity_operator;

    type S = VectorSpace<FloatGeneric<f64>>;

    let d = S::product(vec![S::new(2), S::new(3)]);
    let r = S::product(vec![S::new(2)]);
    let mut b = BlockOp::new(&d, &r);
    assert_eq!(b.num_block_rows(), 1);
    assert_eq!(b.num_block_cols(), 2);
    assert!(is_zero_operator(&b.get_block(0, 1).unwrap()));

    let i2 = identity_operator(&S::new(2));
    assert_eq!(b.set_block(0, 1, &i2).unwrap_err(), OpError::IncompatibleSpaces);
    assert_eq!(b.set_block(1, 0, &i2).unwrap_err(), OpError::IndexOutOfRange);
    b.set_block(0, 0, &i2).unwrap();
    assert!(b.get_block(0, 0).unwrap().ptr_eq(&i2));

    let op = b.into_operator();
    assert_eq!(op.num_block_cols(), 2);
    let x = d.create_member_from(&[1., 2., 3., 4., 5.]).unwrap();
    let mut y = r.create_member();
    op.apply_op(&x, &mut y).unwrap();
    assert_eq!(y.to_vec(), vec![1., 2.]);

    let mut w = d.create_member_from(&[9., 9., 9., 9., 9.]).unwrap();
    op.apply_transpose(&y, &mut w).unwrap();
    assert_eq!(w.to_vec(), vec![1., 2., 0., 0., 0.]);
}
