//! Vectors

use std::rc::Rc;
use std::cell::RefCell;
use num_traits::{Zero, One, Float};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::lincomb::LinearCombination;
use crate::error::OpError;

//

/// Vector
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Reference-counted handle to a segment of shared storage, tagged with the [`VectorSpace`] it belongs to.
/// Cloning the handle shares the storage; use [`Vector::copy`] for an independent duplicate.
/// Block views returned by [`Vector::get_block`] alias the segment of their parent.
///
/// Mutating methods take `&mut self`; other handles sharing the storage observe the change.
pub struct Vector<L: LinAlg>
{
    space: VectorSpace<L>,
    data: Rc<RefCell<Vec<L::F>>>,
    offset: usize,
}

impl<L: LinAlg> Clone for Vector<L>
{
    fn clone(&self) -> Self
    {
        Vector {
            space: self.space.clone(),
            data: Rc::clone(&self.data),
            offset: self.offset,
        }
    }
}

impl<L: LinAlg> Vector<L>
{
    pub(crate) fn from_parts(space: VectorSpace<L>, data: Rc<RefCell<Vec<L::F>>>, offset: usize) -> Self
    {
        assert!(offset + space.dim() <= data.borrow().len());

        Vector {
            space, data, offset
        }
    }

    /// Creates a vector in a new non-product space of `values.len()` entries.
    pub fn from_vec(values: Vec<L::F>) -> Self
    {
        let space = VectorSpace::new(values.len());

        Vector::from_parts(space, Rc::new(RefCell::new(values)), 0)
    }

    /// Space this vector belongs to.
    pub fn space(&self) -> &VectorSpace<L>
    {
        &self.space
    }

    /// Number of entries.
    pub fn dim(&self) -> usize
    {
        self.space.dim()
    }

    fn range(&self) -> core::ops::Range<usize>
    {
        self.offset.. self.offset + self.dim()
    }

    /// Checks if both handles refer to the same segment of the same storage.
    pub fn ptr_eq(&self, other: &Vector<L>) -> bool
    {
        Rc::ptr_eq(&self.data, &other.data) && self.offset == other.offset && self.dim() == other.dim()
    }

    /// Checks if any entry of `other` is also an entry of this vector.
    pub fn aliases(&self, other: &Vector<L>) -> bool
    {
        if !Rc::ptr_eq(&self.data, &other.data) || self.dim() == 0 || other.dim() == 0 {
            return false;
        }
        let a = self.range();
        let b = other.range();

        a.start < b.end && b.start < a.end
    }

    pub(crate) fn with_ref<R>(&self, f: impl FnOnce(&[L::F]) -> R) -> R
    {
        let data = self.data.borrow();
        f(&data[self.range()])
    }

    pub(crate) fn with_mut<R>(&mut self, f: impl FnOnce(&mut[L::F]) -> R) -> R
    {
        let r = self.range();
        let mut data = self.data.borrow_mut();
        f(&mut data[r])
    }

    /// Runs `f` with the entries of `x` and the mutable entries of `self`.
    /// `x` is read out first when it shares storage with `self`.
    pub(crate) fn zip_mut<R>(&mut self, x: &Vector<L>, f: impl FnOnce(&[L::F], &mut[L::F]) -> R) -> R
    {
        let x_v;
        let x_g;
        let xs: &[L::F] = if Rc::ptr_eq(&self.data, &x.data) {
            x_v = x.to_vec();
            &x_v
        }
        else {
            x_g = x.data.borrow();
            &x_g[x.range()]
        };

        self.with_mut(|y| f(xs, y))
    }

    /// Runs `f` with the entries of `a`, `b` and the mutable entries of `self`,
    /// with the same rule as [`Vector::zip_mut`].
    pub(crate) fn zip2_mut<R>(&mut self, a: &Vector<L>, b: &Vector<L>, f: impl FnOnce(&[L::F], &[L::F], &mut[L::F]) -> R) -> R
    {
        let a_v;
        let a_g;
        let a_s: &[L::F] = if Rc::ptr_eq(&self.data, &a.data) {
            a_v = a.to_vec();
            &a_v
        }
        else {
            a_g = a.data.borrow();
            &a_g[a.range()]
        };

        let b_v;
        let b_g;
        let b_s: &[L::F] = if Rc::ptr_eq(&self.data, &b.data) {
            b_v = b.to_vec();
            &b_v
        }
        else {
            b_g = b.data.borrow();
            &b_g[b.range()]
        };

        self.with_mut(|y| f(a_s, b_s, y))
    }

    /// Entry `i`.
    ///
    /// Panics if `i` is out of range.
    pub fn get(&self, i: usize) -> L::F
    {
        assert!(i < self.dim());
        self.with_ref(|x| x[i])
    }

    /// Sets entry `i` to `v`.
    ///
    /// Panics if `i` is out of range.
    pub fn set(&mut self, i: usize, v: L::F)
    {
        assert!(i < self.dim());
        self.with_mut(|x| x[i] = v);
    }

    /// Adds `v` to entry `i`.
    ///
    /// Panics if `i` is out of range.
    pub fn add_to_element(&mut self, i: usize, v: L::F)
    {
        assert!(i < self.dim());
        self.with_mut(|x| x[i] = x[i] + v);
    }

    fn check_indices(&self, indices: &[usize], n_values: usize, what: &str) -> Result<(), OpError>
    {
        if indices.len() != n_values {
            log::error!("{}: {} indices, {} values", what, indices.len(), n_values);
            return Err(OpError::DimensionMismatch);
        }
        if let Some(i) = indices.iter().find(|i| **i >= self.dim()) {
            log::error!("{}: index {} of a vector of {} entries", what, i, self.dim());
            return Err(OpError::IndexOutOfRange);
        }
        Ok(())
    }

    /// Sets entries `indices[k]` to `values[k]`.
    pub fn set_elements(&mut self, indices: &[usize], values: &[L::F]) -> Result<(), OpError>
    {
        self.check_indices(indices, values.len(), "set_elements")?;

        self.with_mut(|x| {
            for (i, v) in indices.iter().zip(values) {
                x[*i] = *v;
            }
        });
        Ok(())
    }

    /// Adds `values[k]` to entries `indices[k]`. Repeated indices accumulate.
    pub fn add_to_elements(&mut self, indices: &[usize], values: &[L::F]) -> Result<(), OpError>
    {
        self.check_indices(indices, values.len(), "add_to_elements")?;

        self.with_mut(|x| {
            for (i, v) in indices.iter().zip(values) {
                x[*i] = x[*i] + *v;
            }
        });
        Ok(())
    }

    /// Entries at `indices`.
    pub fn get_elements(&self, indices: &[usize]) -> Result<Vec<L::F>, OpError>
    {
        self.check_indices(indices, indices.len(), "get_elements")?;

        Ok(self.with_ref(|x| indices.iter().map(|i| x[*i]).collect()))
    }

    // First index of the entry preferred by `better` among those accepted by `admit`; NaN is skipped.
    fn find_extreme<A, B>(&self, admit: A, better: B) -> Option<(L::F, usize)>
    where A: Fn(L::F) -> bool, B: Fn(L::F, L::F) -> bool
    {
        self.with_ref(|x| {
            let mut found: Option<(L::F, usize)> = None;
            for (i, u) in x.iter().enumerate() {
                if u.is_nan() || !admit(*u) {
                    continue;
                }
                let replace = match found {
                    Some((m, _)) => better(*u, m),
                    None => true,
                };
                if replace {
                    found = Some((*u, i));
                }
            }
            found
        })
    }

    /// Largest entry, \\(-\infty\\) if there is none.
    pub fn max(&self) -> L::F
    {
        self.max_with_index().map_or(L::F::neg_infinity(), |(m, _)| m)
    }

    /// Smallest entry, \\(+\infty\\) if there is none.
    pub fn min(&self) -> L::F
    {
        self.min_with_index().map_or(L::F::infinity(), |(m, _)| m)
    }

    /// Largest entry and its first index.
    pub fn max_with_index(&self) -> Option<(L::F, usize)>
    {
        self.find_extreme(|_| true, |u, m| u > m)
    }

    /// Smallest entry and its first index.
    pub fn min_with_index(&self) -> Option<(L::F, usize)>
    {
        self.find_extreme(|_| true, |u, m| u < m)
    }

    /// Largest entry strictly less than `bound` and its first index, if any.
    pub fn max_less_than(&self, bound: L::F) -> Option<(L::F, usize)>
    {
        self.find_extreme(|u| u < bound, |u, m| u > m)
    }

    /// Smallest entry strictly greater than `bound` and its first index, if any.
    pub fn min_greater_than(&self, bound: L::F) -> Option<(L::F, usize)>
    {
        self.find_extreme(|u| u > bound, |u, m| u < m)
    }

    /// Copies the entries out.
    pub fn to_vec(&self) -> Vec<L::F>
    {
        self.with_ref(|x| x.to_vec())
    }

    /// New vector of the same space holding the same values, sharing nothing with `self`.
    pub fn copy(&self) -> Vector<L>
    {
        let data = self.to_vec();

        Vector::from_parts(self.space.clone(), Rc::new(RefCell::new(data)), 0)
    }

    /// Overwrites all entries with those of `x`.
    pub fn accept_copy_of(&mut self, x: &Vector<L>) -> Result<(), OpError>
    {
        self.space.check_compatible(&x.space, "accept_copy_of")?;

        if self.ptr_eq(x) {
            return Ok(());
        }
        self.zip_mut(x, |x, y| L::copy(x, y));
        Ok(())
    }

    /// Calculates \\(\alpha \cdot this\\).
    pub fn scale(&mut self, alpha: L::F)
    {
        self.with_mut(|x| L::scale(alpha, x));
    }

    /// Calculates \\(this + \alpha x\\).
    pub fn update(&mut self, alpha: L::F, x: &Vector<L>) -> Result<(), OpError>
    {
        self.space.check_compatible(&x.space, "update")?;

        self.zip_mut(x, |x, y| L::add(alpha, x, y));
        Ok(())
    }

    /// Calculates \\(\gamma \cdot this + \alpha x\\).
    ///
    /// With \\(\gamma = 0\\) the previous entries are not read.
    pub fn update_scaled(&mut self, alpha: L::F, x: &Vector<L>, gamma: L::F) -> Result<(), OpError>
    {
        self.space.check_compatible(&x.space, "update_scaled")?;

        self.zip_mut(x, |x, y| {
            if gamma == L::F::zero() {
                L::copy(x, y);
                L::scale(alpha, y);
            }
            else {
                if gamma != L::F::one() {
                    L::scale(gamma, y);
                }
                L::add(alpha, x, y);
            }
        });
        Ok(())
    }

    /// Calculates \\(\gamma \cdot this + \alpha x + \beta y\\).
    pub fn update2(&mut self, alpha: L::F, x: &Vector<L>, beta: L::F, y: &Vector<L>, gamma: L::F) -> Result<(), OpError>
    {
        self.space.check_compatible(&x.space, "update2")?;
        self.space.check_compatible(&y.space, "update2")?;

        let y = if self.aliases(y) {y.copy()} else {y.clone()};
        self.update_scaled(alpha, x, gamma)?;
        self.update(beta, &y)
    }

    /// Elementwise product, as a new vector.
    pub fn dot_star(&self, other: &Vector<L>) -> Result<Vector<L>, OpError>
    {
        self.space.check_compatible(&other.space, "dot_star")?;

        let mut r = self.space.create_member();
        self.with_ref(|a| other.with_ref(|b| {
            r.with_mut(|y| L::transform_di(L::F::one(), a, b, L::F::zero(), y))
        }));
        Ok(r)
    }

    /// Elementwise quotient \\(this_i / other_i\\), as a new vector.
    pub fn dot_slash(&self, other: &Vector<L>) -> Result<Vector<L>, OpError>
    {
        self.space.check_compatible(&other.space, "dot_slash")?;

        let mut r = self.space.create_member();
        self.with_ref(|a| other.with_ref(|b| {
            r.with_mut(|y| {
                for ((y, a), b) in y.iter_mut().zip(a).zip(b) {
                    *y = *a / *b;
                }
            })
        }));
        Ok(r)
    }

    /// Inner product.
    pub fn dot(&self, other: &Vector<L>) -> Result<L::F, OpError>
    {
        self.space.check_compatible(&other.space, "dot")?;

        Ok(self.with_ref(|a| other.with_ref(|b| L::inner_prod(a, b))))
    }

    /// 1-norm.
    pub fn norm1(&self) -> L::F
    {
        self.with_ref(|x| L::abssum(x, 1))
    }

    /// 2-norm.
    pub fn norm2(&self) -> L::F
    {
        self.with_ref(|x| L::norm(x))
    }

    /// Infinity-norm.
    pub fn norm_inf(&self) -> L::F
    {
        self.with_ref(|x| L::absmax(x))
    }

    /// Sets all entries to zero.
    pub fn zero(&mut self)
    {
        self.set_to_constant(L::F::zero());
    }

    /// Sets all entries to `alpha`.
    pub fn set_to_constant(&mut self, alpha: L::F)
    {
        self.with_mut(|x| {
            for u in x {
                *u = alpha;
            }
        });
    }

    /// Adds `s` to all entries.
    pub fn add_scalar(&mut self, s: L::F)
    {
        self.with_mut(|x| L::adds(s, x));
    }

    /// Elementwise absolute values, as a new vector.
    pub fn abs(&self) -> Vector<L>
    {
        let r = self.copy();
        r.data.borrow_mut().iter_mut().for_each(|u| *u = u.abs());
        r
    }

    /// Elementwise reciprocals, as a new vector.
    pub fn reciprocal(&self) -> Vector<L>
    {
        let r = self.copy();
        r.data.borrow_mut().iter_mut().for_each(|u| *u = u.recip());
        r
    }

    /// Number of blocks of the space.
    pub fn num_blocks(&self) -> usize
    {
        self.space.num_blocks()
    }

    /// Block `i`, as a handle aliasing the corresponding segment of this vector.
    pub fn get_block(&self, i: usize) -> Result<Vector<L>, OpError>
    {
        let space = self.space.block(i)?;

        Ok(Vector {
            space,
            data: Rc::clone(&self.data),
            offset: self.offset + self.space.block_offset(i),
        })
    }

    /// Copies `v` into block `i`.
    pub fn set_block(&mut self, i: usize, v: &Vector<L>) -> Result<(), OpError>
    {
        let mut b = self.get_block(i)?;
        b.accept_copy_of(v)
    }

    /// Assigns the value of a linear combination.
    ///
    /// If `expr` reads this vector, it is evaluated into a temporary first,
    /// so the result is as if every operand was read before any entry is written.
    pub fn assign<E: LinearCombination<L>>(&mut self, expr: E) -> Result<(), OpError>
    {
        self.space.check_compatible(&expr.space(), "assign")?;

        if expr.contains_vector(self) {
            log::trace!("assign: target is an operand, evaluating into a temporary");
            let tmp = expr.eval()?;
            self.accept_copy_of(&tmp)
        }
        else {
            expr.eval_into(self)
        }
    }

    /// Adds the value of a linear combination, with the aliasing rule of [`Vector::assign`].
    pub fn assign_add<E: LinearCombination<L>>(&mut self, expr: E) -> Result<(), OpError>
    {
        self.space.check_compatible(&expr.space(), "assign_add")?;

        if expr.contains_vector(self) {
            log::trace!("assign_add: target is an operand, evaluating into a temporary");
            let tmp = expr.eval()?;
            self.update(L::F::one(), &tmp)
        }
        else {
            expr.add_into(self, crate::lincomb::LcSign::Add)
        }
    }
}

impl<L: LinAlg> core::fmt::Display for Vector<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        if self.space.is_product() {
            writeln!(f, "ProductVector[")?;
            for i in 0.. self.num_blocks() {
                if let Ok(b) = self.get_block(i) {
                    writeln!(f, "block={}", i)?;
                    write!(f, "{}", b)?;
                }
            }
            writeln!(f, "]")
        }
        else {
            self.with_ref(|x| {
                for (i, u) in x.iter().enumerate() {
                    writeln!(f, "{}\t{:.6e}", i, u)?;
                }
                Ok(())
            })
        }
    }
}

impl<L: LinAlg> core::fmt::Debug for Vector<L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        f.debug_struct("Vector")
         .field("space", &self.space)
         .field("offset", &self.offset)
         .field("data", &self.to_vec())
         .finish()
    }
}

//

#[test]
fn test_vector_update()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let space = VectorSpace::<La>::new(3);
    let x = space.create_member_from(&[1., 2., 3.]).unwrap();
    let mut y = space.create_member_from(&[1., 1., 1.]).unwrap();

    y.update_scaled(2., &x, 3.).unwrap();
    assert_float_eq!(y.to_vec().as_slice(), [5., 7., 9.].as_ref(), abs_all <= 1e-12);

    y.update2(1., &x, -1., &y.clone(), 1.).unwrap();
    assert_float_eq!(y.to_vec().as_slice(), [1., 2., 3.].as_ref(), abs_all <= 1e-12);

    let mut z = x.clone();
    z.update(1., &x).unwrap();
    assert_float_eq!(x.to_vec().as_slice(), [2., 4., 6.].as_ref(), abs_all <= 1e-12);

    assert_float_eq!(x.dot(&y).unwrap(), 28., abs <= 1e-12);
    assert_float_eq!(x.norm1(), 12., abs <= 1e-12);
    assert_float_eq!(x.norm_inf(), 6., abs <= 1e-12);
    assert_float_eq!(x.dot_slash(&y).unwrap().to_vec().as_slice(), [2., 2., 2.].as_ref(), abs_all <= 1e-12);

    let w = VectorSpace::<La>::new(2).create_member();
    assert_eq!(y.update(1., &w).unwrap_err(), OpError::DimensionMismatch);
}

#[test]
fn test_vector_elements()
{
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let space = VectorSpace::<La>::new(5);
    let mut x = space.create_member_from(&[3., -1., 7., 7., -4.]).unwrap();

    assert_eq!(x.max(), 7.);
    assert_eq!(x.min(), -4.);
    assert_eq!(x.max_with_index(), Some((7., 2)));
    assert_eq!(x.min_with_index(), Some((-4., 4)));
    assert_eq!(x.max_less_than(7.), Some((3., 0)));
    assert_eq!(x.min_greater_than(-1.), Some((3., 0)));
    assert_eq!(x.max_less_than(-4.), None);
    assert_eq!(x.min_greater_than(7.), None);

    x.add_to_element(1, 2.);
    assert_eq!(x.get(1), 1.);

    x.set_elements(&[0, 4], &[10., 20.]).unwrap();
    x.add_to_elements(&[4, 4, 2], &[1., 1., -7.]).unwrap();
    assert_eq!(x.to_vec(), vec![10., 1., 0., 7., 22.]);
    assert_eq!(x.get_elements(&[4, 0]).unwrap(), vec![22., 10.]);

    assert_eq!(x.set_elements(&[0], &[1., 2.]).unwrap_err(), OpError::DimensionMismatch);
    assert_eq!(x.add_to_elements(&[5], &[1.]).unwrap_err(), OpError::IndexOutOfRange);
    assert_eq!(x.get_elements(&[9]).unwrap_err(), OpError::IndexOutOfRange);

    let mut n = space.create_member_from(&[f64::NAN, 2., f64::NAN, -3., 1.]).unwrap();
    assert_eq!(n.max_with_index(), Some((2., 1)));
    assert_eq!(n.min(), -3.);
    n.set_to_constant(f64::NAN);
    assert_eq!(n.max(), f64::NEG_INFINITY);
    assert_eq!(n.min_with_index(), None);
}

#[test]
fn test_vector_copy_independent()
{
    use crate::FloatGeneric;

    let x = Vector::<FloatGeneric<f64>>::from_vec(vec![1., 2.]);
    let mut c = x.copy();
    c.set(0, 5.);
    assert_eq!(x.get(0), 1.);
    assert!(!c.aliases(&x));
    assert!(x.clone().ptr_eq(&x));
}

#[test]
fn test_vector_blocks()
{
    use crate::FloatGeneric;

    type S = VectorSpace<FloatGeneric<f64>>;

    let space = S::product(vec![S::new(2), S::new(3)]);
    let mut x = space.create_member();
    let b1 = S::new(3).create_member_from(&[7., 8., 9.]).unwrap();
    x.set_block(1, &b1).unwrap();
    assert_eq!(x.to_vec(), vec![0., 0., 7., 8., 9.]);

    let mut b0 = x.get_block(0).unwrap();
    b0.set_to_constant(1.);
    assert_eq!(x.to_vec(), vec![1., 1., 7., 8., 9.]);

    assert!(x.aliases(&b0));
    assert!(!b0.aliases(&x.get_block(1).unwrap()));
    assert_eq!(x.get_block(2).unwrap_err(), OpError::IndexOutOfRange);
}
