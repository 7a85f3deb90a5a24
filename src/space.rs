//! Vector spaces

use std::rc::Rc;
use std::cell::RefCell;
use core::marker::PhantomData;
use num_traits::Zero;
use crate::linalg::LinAlg;
use crate::vector::Vector;
use crate::error::OpError;

//

struct SpaceInner<L: LinAlg>
{
    dim: usize,
    blocks: Vec<VectorSpace<L>>,
    offsets: Vec<usize>,
    ph_l: PhantomData<L>,
}

/// Vector space
///
/// Reference-counted handle describing the layout of a [`Vector`]:
/// its dimension and, for a product space, the ordered sequence of child spaces.
/// Cloning the handle shares the description.
pub struct VectorSpace<L: LinAlg>
{
    inner: Rc<SpaceInner<L>>,
}

impl<L: LinAlg> Clone for VectorSpace<L>
{
    fn clone(&self) -> Self
    {
        VectorSpace {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<L: LinAlg> VectorSpace<L>
{
    /// Creates a space of `dim` entries without block structure.
    pub fn new(dim: usize) -> Self
    {
        VectorSpace {
            inner: Rc::new(SpaceInner {
                dim,
                blocks: Vec::new(),
                offsets: Vec::new(),
                ph_l: PhantomData,
            })
        }
    }

    /// Creates a product space, concatenating `blocks` in order.
    pub fn product(blocks: Vec<VectorSpace<L>>) -> Self
    {
        let mut offsets = Vec::with_capacity(blocks.len());
        let mut dim = 0;
        for b in blocks.iter() {
            offsets.push(dim);
            dim += b.dim();
        }

        VectorSpace {
            inner: Rc::new(SpaceInner {
                dim,
                blocks,
                offsets,
                ph_l: PhantomData,
            })
        }
    }

    /// Number of entries.
    pub fn dim(&self) -> usize
    {
        self.inner.dim
    }

    /// Checks if this is a product space.
    pub fn is_product(&self) -> bool
    {
        !self.inner.blocks.is_empty()
    }

    /// Number of blocks. A non-product space is its own single block.
    pub fn num_blocks(&self) -> usize
    {
        if self.is_product() {
            self.inner.blocks.len()
        }
        else {
            1
        }
    }

    /// Child space of block `i`.
    pub fn block(&self, i: usize) -> Result<VectorSpace<L>, OpError>
    {
        if !self.is_product() && i == 0 {
            Ok(self.clone())
        }
        else if let Some(b) = self.inner.blocks.get(i) {
            Ok(b.clone())
        }
        else {
            log::error!("block {} of a space with {} blocks", i, self.num_blocks());
            Err(OpError::IndexOutOfRange)
        }
    }

    /// All block spaces in order. A non-product space yields itself.
    pub fn block_spaces(&self) -> Vec<VectorSpace<L>>
    {
        if self.is_product() {
            self.inner.blocks.clone()
        }
        else {
            vec![self.clone()]
        }
    }

    /// Offset of block `i` within the entries of this space.
    pub(crate) fn block_offset(&self, i: usize) -> usize
    {
        if self.is_product() {
            self.inner.offsets[i]
        }
        else {
            0
        }
    }

    /// Checks if both handles share the same description.
    pub fn ptr_eq(&self, other: &VectorSpace<L>) -> bool
    {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Checks compatibility: same dimension and compatible block structure.
    pub fn is_compatible(&self, other: &VectorSpace<L>) -> bool
    {
        if self.ptr_eq(other) {
            return true;
        }
        if self.dim() != other.dim() {
            return false;
        }

        match (self.is_product(), other.is_product()) {
            (false, false) => true,
            (true, true) => {
                self.num_blocks() == other.num_blocks() &&
                self.inner.blocks.iter().zip(other.inner.blocks.iter()).all(|(a, b)| a.is_compatible(b))
            },
            (true, false) => {
                self.num_blocks() == 1 && self.inner.blocks[0].is_compatible(other)
            },
            (false, true) => {
                other.num_blocks() == 1 && other.inner.blocks[0].is_compatible(self)
            },
        }
    }

    pub(crate) fn check_compatible(&self, other: &VectorSpace<L>, what: &str) -> Result<(), OpError>
    {
        if self.is_compatible(other) {
            Ok(())
        }
        else {
            log::error!("{}: {} is not compatible with {}", what, other, self);
            Err(OpError::DimensionMismatch)
        }
    }

    /// Creates a new member of this space, filled with zeros.
    pub fn create_member(&self) -> Vector<L>
    {
        let data = vec![L::F::zero(); self.dim()];

        Vector::from_parts(self.clone(), Rc::new(RefCell::new(data)), 0)
    }

    /// Creates a new member of this space holding a copy of `values`.
    pub fn create_member_from(&self, values: &[L::F]) -> Result<Vector<L>, OpError>
    {
        if values.len() != self.dim() {
            log::error!("{} values given for {}", values.len(), self);
            return Err(OpError::DimensionMismatch);
        }

        Ok(Vector::from_parts(self.clone(), Rc::new(RefCell::new(values.to_vec())), 0))
    }
}

impl<L: LinAlg> PartialEq for VectorSpace<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.is_compatible(other)
    }
}

impl<L: LinAlg> core::fmt::Display for VectorSpace<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        if self.is_product() {
            write!(f, "ProductSpace[dim={}, blocks=[", self.dim())?;
            for (i, b) in self.inner.blocks.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", b)?;
            }
            write!(f, "]]")
        }
        else {
            write!(f, "VectorSpace[dim={}]", self.dim())
        }
    }
}

impl<L: LinAlg> core::fmt::Debug for VectorSpace<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{}", self)
    }
}

//

#[test]
fn test_space_compat()
{
    use crate::FloatGeneric;

    type S = VectorSpace<FloatGeneric<f64>>;

    let a = S::new(3);
    let b = S::new(3);
    let c = S::new(4);
    assert!(a.is_compatible(&b));
    assert!(!a.is_compatible(&c));

    let p = S::product(vec![S::new(2), S::new(3)]);
    let q = S::product(vec![S::new(2), S::new(3)]);
    let r = S::product(vec![S::new(3), S::new(2)]);
    assert_eq!(p.dim(), 5);
    assert_eq!(p, q);
    assert_ne!(p, r);
    assert!(!p.is_compatible(&S::new(5)));

    let single = S::product(vec![S::new(5)]);
    assert!(single.is_compatible(&S::new(5)));

    assert_eq!(a.num_blocks(), 1);
    assert!(a.block(0).unwrap().ptr_eq(&a));
    assert_eq!(a.block(1).unwrap_err(), OpError::IndexOutOfRange);
    assert_eq!(p.block_offset(1), 2);
}
