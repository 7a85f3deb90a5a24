//! Linear combinations

use num_traits::{Zero, One};
use crate::linalg::LinAlg;
use crate::space::VectorSpace;
use crate::vector::Vector;
use crate::operator::{LinearOperator, Transp};
use crate::error::OpError;

//

/// Sign of a term added into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcSign
{
    Add,
    Subtract,
}

impl LcSign
{
    /// `1` or `-1`.
    pub fn value<F: num_traits::Float>(self) -> F
    {
        match self {
            LcSign::Add => F::one(),
            LcSign::Subtract => -F::one(),
        }
    }

    /// Sign of the product of both signs.
    pub fn compose(self, other: LcSign) -> LcSign
    {
        if self == other {
            LcSign::Add
        }
        else {
            LcSign::Subtract
        }
    }
}

/// Linear combination trait
///
/// A lazily evaluated expression of vectors and operators.
/// Nothing is computed until one of [`LinearCombination::eval`],
/// [`LinearCombination::eval_into`] or [`LinearCombination::add_into`] is called,
/// typically through [`Vector::assign`].
pub trait LinearCombination<L: LinAlg>
{
    /// Space of the value.
    fn space(&self) -> VectorSpace<L>;

    /// Evaluates into a new vector.
    fn eval(&self) -> Result<Vector<L>, OpError>;

    /// Overwrites `result` with the value.
    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>;

    /// Adds (or subtracts, per `sign`) the value into `result`.
    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>;

    /// Checks if `vec` is read by this expression.
    fn contains_vector(&self, vec: &Vector<L>) -> bool;

    /// Value as an operator input. A bare vector is passed by handle without copying.
    fn eval_operand(&self) -> Result<Vector<L>, OpError>
    {
        self.eval()
    }
}

impl<L: LinAlg> LinearCombination<L> for Vector<L>
{
    fn space(&self) -> VectorSpace<L>
    {
        Vector::space(self).clone()
    }

    fn eval(&self) -> Result<Vector<L>, OpError>
    {
        Ok(self.copy())
    }

    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>
    {
        result.accept_copy_of(self)
    }

    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>
    {
        result.update(sign.value(), self)
    }

    fn contains_vector(&self, vec: &Vector<L>) -> bool
    {
        self.aliases(vec)
    }

    fn eval_operand(&self) -> Result<Vector<L>, OpError>
    {
        Ok(self.clone())
    }
}

impl<'a, L: LinAlg> LinearCombination<L> for &'a Vector<L>
{
    fn space(&self) -> VectorSpace<L>
    {
        (*self).space().clone()
    }

    fn eval(&self) -> Result<Vector<L>, OpError>
    {
        (*self).eval()
    }

    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>
    {
        (*self).eval_into(result)
    }

    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>
    {
        (*self).add_into(result, sign)
    }

    fn contains_vector(&self, vec: &Vector<L>) -> bool
    {
        (*self).contains_vector(vec)
    }

    fn eval_operand(&self) -> Result<Vector<L>, OpError>
    {
        Ok((*self).clone())
    }
}

//

/// Child of a linear combination node.
pub enum LcNode<L: LinAlg>
{
    Vector(Vector<L>),
    OpTimes(Box<OpTimesLC<L>>),
    Sum(Box<LC2<L>>),
}

impl<L: LinAlg> LcNode<L>
{
    fn as_lc(&self) -> &dyn LinearCombination<L>
    {
        match self {
            LcNode::Vector(v) => v,
            LcNode::OpTimes(n) => n.as_ref(),
            LcNode::Sum(n) => n.as_ref(),
        }
    }
}

impl<L: LinAlg> LinearCombination<L> for LcNode<L>
{
    fn space(&self) -> VectorSpace<L>
    {
        self.as_lc().space()
    }

    fn eval(&self) -> Result<Vector<L>, OpError>
    {
        self.as_lc().eval()
    }

    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>
    {
        self.as_lc().eval_into(result)
    }

    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>
    {
        self.as_lc().add_into(result, sign)
    }

    fn contains_vector(&self, vec: &Vector<L>) -> bool
    {
        self.as_lc().contains_vector(vec)
    }

    fn eval_operand(&self) -> Result<Vector<L>, OpError>
    {
        self.as_lc().eval_operand()
    }
}

impl<L: LinAlg> From<Vector<L>> for LcNode<L>
{
    fn from(v: Vector<L>) -> Self
    {
        LcNode::Vector(v)
    }
}

impl<'a, L: LinAlg> From<&'a Vector<L>> for LcNode<L>
{
    fn from(v: &'a Vector<L>) -> Self
    {
        LcNode::Vector(v.clone())
    }
}

impl<L: LinAlg> From<OpTimesLC<L>> for LcNode<L>
{
    fn from(n: OpTimesLC<L>) -> Self
    {
        LcNode::OpTimes(Box::new(n))
    }
}

impl<L: LinAlg> From<LC2<L>> for LcNode<L>
{
    fn from(n: LC2<L>) -> Self
    {
        LcNode::Sum(Box::new(n))
    }
}

//

/// Node \\(\alpha K x\\), or \\(\alpha x\\) without an operator,
/// where \\(x\\) is a child node.
pub struct OpTimesLC<L: LinAlg>
{
    alpha: L::F,
    op: Option<LinearOperator<L>>,
    node: LcNode<L>,
}

impl<L: LinAlg> OpTimesLC<L>
{
    /// Node \\(\alpha x\\).
    pub fn scaled<N: Into<LcNode<L>>>(alpha: L::F, node: N) -> Self
    {
        OpTimesLC {
            alpha,
            op: None,
            node: node.into(),
        }
    }

    /// Node \\(\alpha K x\\).
    pub fn with_op<N: Into<LcNode<L>>>(alpha: L::F, op: &LinearOperator<L>, node: N) -> Self
    {
        OpTimesLC {
            alpha,
            op: Some(op.clone()),
            node: node.into(),
        }
    }

    /// Scale \\(\alpha\\).
    pub fn alpha(&self) -> L::F
    {
        self.alpha
    }

    /// Operator \\(K\\), or `None` for a plain scaling.
    pub fn op(&self) -> Option<&LinearOperator<L>>
    {
        self.op.as_ref()
    }

    /// Child node \\(x\\).
    pub fn node(&self) -> &LcNode<L>
    {
        &self.node
    }

    /// Multiplies the scale by `s`.
    fn rescale(mut self, s: L::F) -> Self
    {
        self.alpha = self.alpha * s;
        self
    }

    /// Left multiplication by `op`.
    /// A node without an operator takes `op` as its own; otherwise the node nests.
    fn premul(self, op: &LinearOperator<L>) -> Self
    {
        if self.op.is_none() {
            OpTimesLC {
                alpha: self.alpha,
                op: Some(op.clone()),
                node: self.node,
            }
        }
        else {
            OpTimesLC::with_op(L::F::one(), op, self)
        }
    }
}

impl<L: LinAlg> LinearCombination<L> for OpTimesLC<L>
{
    fn space(&self) -> VectorSpace<L>
    {
        match &self.op {
            Some(op) => op.range(),
            None => self.node.space(),
        }
    }

    fn eval(&self) -> Result<Vector<L>, OpError>
    {
        match &self.op {
            Some(op) => {
                let x = self.node.eval_operand()?;
                let mut result = op.range().create_member();
                op.apply(Transp::NoTrans, &x, &mut result, self.alpha, L::F::zero())?;
                Ok(result)
            },
            None => {
                let mut result = self.node.eval()?;
                if self.alpha != L::F::one() {
                    result.scale(self.alpha);
                }
                Ok(result)
            },
        }
    }

    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>
    {
        match &self.op {
            Some(op) => {
                let x = self.node.eval_operand()?;
                op.apply(Transp::NoTrans, &x, result, self.alpha, L::F::zero())
            },
            None => {
                self.node.eval_into(result)?;
                if self.alpha != L::F::one() {
                    result.scale(self.alpha);
                }
                Ok(())
            },
        }
    }

    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>
    {
        let x = self.node.eval_operand()?;
        let alpha = sign.value::<L::F>() * self.alpha;

        match &self.op {
            Some(op) => op.apply(Transp::NoTrans, &x, result, alpha, L::F::one()),
            None => result.update(alpha, &x),
        }
    }

    fn contains_vector(&self, vec: &Vector<L>) -> bool
    {
        self.node.contains_vector(vec)
    }
}

//

/// Node \\(x_1 \pm x_2\\), where \\(x_1\\), \\(x_2\\) are child nodes.
pub struct LC2<L: LinAlg>
{
    x1: LcNode<L>,
    x2: LcNode<L>,
    sign: LcSign,
}

impl<L: LinAlg> LC2<L>
{
    pub fn new<N1: Into<LcNode<L>>, N2: Into<LcNode<L>>>(x1: N1, x2: N2, sign: LcSign) -> Self
    {
        LC2 {
            x1: x1.into(),
            x2: x2.into(),
            sign,
        }
    }

    /// Sign joining \\(x_1\\) and \\(x_2\\).
    pub fn sign(&self) -> LcSign
    {
        self.sign
    }
}

impl<L: LinAlg> LinearCombination<L> for LC2<L>
{
    fn space(&self) -> VectorSpace<L>
    {
        self.x1.space()
    }

    fn eval(&self) -> Result<Vector<L>, OpError>
    {
        let mut result = self.x1.eval()?;
        self.x2.add_into(&mut result, self.sign)?;
        Ok(result)
    }

    fn eval_into(&self, result: &mut Vector<L>) -> Result<(), OpError>
    {
        if self.x2.contains_vector(result) {
            let tmp = self.eval()?;
            return result.accept_copy_of(&tmp);
        }

        self.x1.eval_into(result)?;
        self.x2.add_into(result, self.sign)
    }

    fn add_into(&self, result: &mut Vector<L>, sign: LcSign) -> Result<(), OpError>
    {
        if self.x2.contains_vector(result) {
            let tmp = self.eval()?;
            return result.update(sign.value(), &tmp);
        }

        self.x1.add_into(result, sign)?;
        self.x2.add_into(result, sign.compose(self.sign))
    }

    fn contains_vector(&self, vec: &Vector<L>) -> bool
    {
        self.x1.contains_vector(vec) || self.x2.contains_vector(vec)
    }
}

//

macro_rules! impl_add_sub {
    ($lhs:ty, $rhs:ty) => {
        impl<'a, 'b, L: LinAlg> core::ops::Add<$rhs> for $lhs
        {
            type Output = LC2<L>;

            fn add(self, rhs: $rhs) -> LC2<L>
            {
                LC2::new(self, rhs, LcSign::Add)
            }
        }

        impl<'a, 'b, L: LinAlg> core::ops::Sub<$rhs> for $lhs
        {
            type Output = LC2<L>;

            fn sub(self, rhs: $rhs) -> LC2<L>
            {
                LC2::new(self, rhs, LcSign::Subtract)
            }
        }
    };
}

macro_rules! impl_add_sub_all {
    ($lhs:ty) => {
        impl_add_sub!($lhs, Vector<L>);
        impl_add_sub!($lhs, &'b Vector<L>);
        impl_add_sub!($lhs, OpTimesLC<L>);
        impl_add_sub!($lhs, LC2<L>);
    };
}

impl_add_sub_all!(Vector<L>);
impl_add_sub_all!(&'a Vector<L>);
impl_add_sub_all!(OpTimesLC<L>);
impl_add_sub_all!(LC2<L>);

macro_rules! impl_node_ops {
    ($t:ty) => {
        impl<'a, L: LinAlg> core::ops::Neg for $t
        {
            type Output = OpTimesLC<L>;

            fn neg(self) -> OpTimesLC<L>
            {
                OpTimesLC::scaled(-L::F::one(), self)
            }
        }

        impl<'a, 'b, L: LinAlg> core::ops::Mul<$t> for &'b LinearOperator<L>
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: $t) -> OpTimesLC<L>
            {
                OpTimesLC::with_op(L::F::one(), self, rhs)
            }
        }

        impl<'a, L: LinAlg> core::ops::Mul<$t> for LinearOperator<L>
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: $t) -> OpTimesLC<L>
            {
                &self * rhs
            }
        }
    };
}

impl_node_ops!(Vector<L>);
impl_node_ops!(&'a Vector<L>);
impl_node_ops!(LC2<L>);

impl<L: LinAlg> core::ops::Neg for OpTimesLC<L>
{
    type Output = OpTimesLC<L>;

    fn neg(self) -> OpTimesLC<L>
    {
        self.rescale(-L::F::one())
    }
}

impl<'b, L: LinAlg> core::ops::Mul<OpTimesLC<L>> for &'b LinearOperator<L>
{
    type Output = OpTimesLC<L>;

    fn mul(self, rhs: OpTimesLC<L>) -> OpTimesLC<L>
    {
        rhs.premul(self)
    }
}

impl<L: LinAlg> core::ops::Mul<OpTimesLC<L>> for LinearOperator<L>
{
    type Output = OpTimesLC<L>;

    fn mul(self, rhs: OpTimesLC<L>) -> OpTimesLC<L>
    {
        rhs.premul(&self)
    }
}

macro_rules! impl_scalar_mul {
    ($f:ty, $t:ty) => {
        impl<'a, L: LinAlg<F=$f>> core::ops::Mul<$t> for $f
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: $t) -> OpTimesLC<L>
            {
                OpTimesLC::scaled(self, rhs)
            }
        }

        impl<'a, L: LinAlg<F=$f>> core::ops::Mul<$f> for $t
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: $f) -> OpTimesLC<L>
            {
                OpTimesLC::scaled(rhs, self)
            }
        }
    };
}

macro_rules! impl_scalar_mul_all {
    ($f:ty) => {
        impl_scalar_mul!($f, Vector<L>);
        impl_scalar_mul!($f, &'a Vector<L>);
        impl_scalar_mul!($f, LC2<L>);

        impl<L: LinAlg<F=$f>> core::ops::Mul<OpTimesLC<L>> for $f
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: OpTimesLC<L>) -> OpTimesLC<L>
            {
                rhs.rescale(self)
            }
        }

        impl<L: LinAlg<F=$f>> core::ops::Mul<$f> for OpTimesLC<L>
        {
            type Output = OpTimesLC<L>;

            fn mul(self, rhs: $f) -> OpTimesLC<L>
            {
                self.rescale(rhs)
            }
        }
    };
}

impl_scalar_mul_all!(f64);
impl_scalar_mul_all!(f32);

//

#[test]
fn test_lc_eval()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use crate::op_diagonal::diagonal_operator;

    type La = FloatGeneric<f64>;

    let x = Vector::<La>::from_vec(vec![1., 2., 3.]);
    let y = x.space().create_member_from(&[1., 1., 1.]).unwrap();
    let d = diagonal_operator(&x.space().create_member_from(&[2., 3., 4.]).unwrap());

    let z = (2. * &x + &y).eval().unwrap();
    assert_float_eq!(z.to_vec().as_slice(), [3., 5., 7.].as_ref(), abs_all <= 1e-12);

    let z = (&d * &x - &y * 2.).eval().unwrap();
    assert_float_eq!(z.to_vec().as_slice(), [0., 4., 10.].as_ref(), abs_all <= 1e-12);

    let z = (-(&d * (&d * &x))).eval().unwrap();
    assert_float_eq!(z.to_vec().as_slice(), [-4., -18., -48.].as_ref(), abs_all <= 1e-12);

    let mut w = x.space().create_member();
    w.assign(&x - (&y + &x)).unwrap();
    assert_float_eq!(w.to_vec().as_slice(), [-1., -1., -1.].as_ref(), abs_all <= 1e-12);
    w.assign_add(&d * &y).unwrap();
    assert_float_eq!(w.to_vec().as_slice(), [1., 2., 3.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_lc_structure()
{
    use crate::FloatGeneric;
    use crate::op_diagonal::diagonal_operator;

    type La = FloatGeneric<f64>;

    let x = Vector::<La>::from_vec(vec![1., 2.]);
    let d = diagonal_operator(&x);

    // scalars fold into one node, the operator is absorbed
    let n = -(2. * (&d * &x)) * 3.;
    assert_eq!(n.alpha(), -6.);
    assert!(n.op().unwrap().ptr_eq(&d));
    assert!(matches!(n.node(), LcNode::Vector(v) if v.ptr_eq(&x)));

    // a second operator nests
    let n = &d * (&d * &x);
    assert_eq!(n.alpha(), 1.);
    assert!(matches!(n.node(), LcNode::OpTimes(c) if c.op().is_some()));

    let s = &x - 2. * &x;
    assert_eq!(s.sign(), LcSign::Subtract);
    assert_eq!(s.eval().unwrap().to_vec(), vec![-1., -2.]);
}

#[test]
fn test_lc_self_assign()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type La = FloatGeneric<f64>;

    let mut x = Vector::<La>::from_vec(vec![1., 2.]);
    let y = x.space().create_member_from(&[10., 20.]).unwrap();

    let xh = x.clone();
    x.assign(&y - &xh).unwrap();
    assert_float_eq!(x.to_vec().as_slice(), [9., 18.].as_ref(), abs_all <= 1e-12);

    x.assign_add(&xh + &y).unwrap();
    assert_float_eq!(x.to_vec().as_slice(), [28., 56.].as_ref(), abs_all <= 1e-12);

    let mut z = y.clone();
    (&x - &y).eval_into(&mut z).unwrap();
    assert_float_eq!(y.to_vec().as_slice(), [18., 36.].as_ref(), abs_all <= 1e-12);
}
