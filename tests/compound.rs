use std::any::Any;
use float_eq::assert_float_eq;
use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

/// Operator which panics when applied.
struct PanicOp
{
    space: VectorSpace<La>,
}

impl Operator<La> for PanicOp
{
    fn domain(&self) -> VectorSpace<La>
    {
        self.space.clone()
    }

    fn range(&self) -> VectorSpace<La>
    {
        self.space.clone()
    }

    fn op(&self, _alpha: f64, _x: &Vector<La>, _beta: f64, _y: &mut Vector<La>) -> Result<(), OpError>
    {
        panic!("PanicOp applied");
    }

    fn description(&self) -> String
    {
        "PanicOp".to_string()
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

//

#[test]
fn test_sum_vs_separate()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = rng(12345);
    let s = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &s, &s, 0.5);
    let b = random_sparse_op(&mut rng, &s, &s, 0.5);
    let x = random_vector(&mut rng, &s);

    let apb = (&a + &b).unwrap();
    let y1 = apply(&apb, &x);
    let y2 = (&a * &x + &b * &x).eval().unwrap();

    assert!(diff_norm(&y1, &y2) < 1e-10);
}

#[test]
fn test_scalar_distributes()
{
    let mut rng = rng(1);
    let s = VectorSpace::<La>::new(6);

    for _ in 0.. 10 {
        let x = random_vector(&mut rng, &s);
        let y = random_vector(&mut rng, &s);
        let a: f64 = rng_scalar(&mut rng);

        let lhs = (a * (&x + &y)).eval().unwrap();
        let rhs = (a * &x + a * &y).eval().unwrap();
        assert!(diff_norm(&lhs, &rhs) <= 1e-10 * lhs.norm2().max(1.));
    }
}

fn rng_scalar<R: rand::Rng>(rng: &mut R) -> f64
{
    rng.gen_range(-3.0..3.0)
}

#[test]
fn test_composition_associative()
{
    let mut rng = rng(2);
    let s3 = VectorSpace::<La>::new(3);
    let s4 = VectorSpace::<La>::new(4);
    let s5 = VectorSpace::<La>::new(5);

    let a = random_sparse_op(&mut rng, &s4, &s5, 0.7);
    let b = random_sparse_op(&mut rng, &s3, &s4, 0.7);
    let x = random_vector(&mut rng, &s3);

    let ab = (&a * &b).unwrap();
    assert!(ab.domain().is_compatible(&s3));
    assert!(ab.range().is_compatible(&s5));

    let y1 = apply(&ab, &x);
    let y2 = (&a * (&b * &x)).eval().unwrap();
    assert!(diff_norm(&y1, &y2) < 1e-12);

    // transpose of a product reverses the order
    let z = random_vector(&mut rng, &s5);
    let w1 = apply_t(&ab, &z);
    let w2 = apply_t(&b, &apply_t(&a, &z));
    assert!(diff_norm(&w1, &w2) < 1e-12);

    assert_eq!((&b * &a).unwrap_err(), OpError::IncompatibleSpaces);
}

#[test]
fn test_sum_transpose()
{
    let mut rng = rng(3);
    let s2 = VectorSpace::<La>::new(2);
    let s5 = VectorSpace::<La>::new(5);

    let a = random_sparse_op(&mut rng, &s2, &s5, 0.6);
    let b = random_sparse_op(&mut rng, &s2, &s5, 0.6);
    let x = random_vector(&mut rng, &s5);

    let apb_t = (&a + &b).unwrap().transpose();
    let y1 = apply(&apb_t, &x);
    let y2 = (&a.transpose() * &x + &b.transpose() * &x).eval().unwrap();
    assert!(diff_norm(&y1, &y2) < 1e-12);

    let amb = (&a - &b).unwrap();
    let y3 = apply_t(&amb, &x);
    let y4 = (&a.transpose() * &x - &b.transpose() * &x).eval().unwrap();
    assert!(diff_norm(&y3, &y4) < 1e-12);

    let c = random_sparse_op(&mut rng, &s5, &s2, 0.6);
    assert_eq!((&a + &c).unwrap_err(), OpError::IncompatibleSpaces);
}

#[test]
fn test_scaled()
{
    let mut rng = rng(4);
    let s = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &s, &s, 0.8);
    let x = random_vector(&mut rng, &s);
    let ax = apply(&a, &x);

    for alpha in [2.5, -1., 1., 0.] {
        let sa = scaled_operator(alpha, &a);
        let y = apply(&sa, &x);
        let expect = (alpha * &ax).eval().unwrap();
        assert!(diff_norm(&y, &expect) < 1e-12);
    }

    assert!(scaled_operator(1., &a).ptr_eq(&a));
    assert!(is_zero_operator(&scaled_operator(0., &a)));

    let nested = scaled_operator(3., &scaled_operator(2., &a));
    let ns = nested.downcast_ref::<ScaledOp<La>>().unwrap();
    assert_eq!(ns.scale(), 6.);
    assert!(ns.operand().ptr_eq(&a));

    let y = apply(&(-&a), &x);
    let expect = (-&ax).eval().unwrap();
    assert!(diff_norm(&y, &expect) < 1e-12);

    // alpha = 0, beta = 1 leaves y unchanged
    let mut y = random_vector(&mut rng, &s);
    let y0 = y.copy();
    let z = zero_operator(&s, &s);
    z.apply(Transp::NoTrans, &x, &mut y, 0., 1.).unwrap();
    assert_eq!(y.to_vec(), y0.to_vec());
    a.apply(Transp::NoTrans, &x, &mut y, 0., 1.).unwrap();
    assert_float_eq!(y.to_vec().as_slice(), y0.to_vec().as_slice(), abs_all <= 1e-15);
}

#[test]
fn test_added_zero_alias()
{
    let mut rng = rng(5);
    let s = VectorSpace::<La>::new(3);
    let a = random_sparse_op(&mut rng, &s, &s, 0.8);
    let z = zero_operator(&s, &s);

    assert!(added_operator(&[a.clone(), z.clone()]).unwrap().ptr_eq(&a));
    assert!(added_operator(&[z.clone(), a.clone(), z.clone()]).unwrap().ptr_eq(&a));
    assert!((&z + &a).unwrap().ptr_eq(&a));
    assert!(is_zero_operator(&added_operator(&[z.clone(), z.clone()]).unwrap()));
    assert_eq!(added_operator::<La>(&[]).unwrap_err(), OpError::EmptyOperands);

    let b = random_sparse_op(&mut rng, &s, &s, 0.8);
    let c = random_sparse_op(&mut rng, &s, &s, 0.8);
    let sum = added_operator(&[(&a + &b).unwrap(), c.clone()]).unwrap();
    assert_eq!(sum.downcast_ref::<AddedOp<La>>().unwrap().operands().len(), 3);

    let x = random_vector(&mut rng, &s);
    let y1 = apply(&sum, &x);
    let y2 = (&a * &x + &b * &x + &c * &x).eval().unwrap();
    assert!(diff_norm(&y1, &y2) < 1e-12);
}

#[test]
fn test_composed_zero_identity()
{
    let s = VectorSpace::<La>::new(3);
    let s2 = VectorSpace::<La>::new(2);
    let p = LinearOperator::new(PanicOp {space: s.clone()});
    let z = zero_operator(&s, &s2);

    let c = composed_operator(&[z.clone(), p.clone(), p.clone()]).unwrap();
    assert!(is_zero_operator(&c));
    assert!(c.domain().is_compatible(&s));
    assert!(c.range().is_compatible(&s2));

    let x = s.create_member_from(&[1., 2., 3.]).unwrap();
    let mut y = s2.create_member_from(&[4., 6.]).unwrap();
    c.apply(Transp::NoTrans, &x, &mut y, 1., 0.5).unwrap();
    assert_eq!(y.to_vec(), vec![2., 3.]);

    let i = identity_operator(&s);
    assert!(composed_operator(&[i.clone(), p.clone(), i.clone()]).unwrap().ptr_eq(&p));
    assert!(is_identity_operator(&composed_operator(&[i.clone(), i.clone()]).unwrap()));
    assert!((&p * &i).unwrap().ptr_eq(&p));
}

#[test]
fn test_unsupported_transpose()
{
    let s = VectorSpace::<La>::new(3);
    let p = LinearOperator::new(PanicOp {space: s.clone()});
    let x = s.create_member();
    let mut y = s.create_member();

    assert_eq!(p.apply_transpose(&x, &mut y).unwrap_err(), OpError::UnsupportedOperation);
    assert_eq!(p.transpose().apply_op(&x, &mut y).unwrap_err(), OpError::UnsupportedOperation);
}

#[test]
fn test_apply_dimension_mismatch()
{
    let mut rng = rng(6);
    let s3 = VectorSpace::<La>::new(3);
    let s4 = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &s3, &s4, 0.8);

    let mut y = s4.create_member();
    assert_eq!(a.apply_op(&s4.create_member(), &mut y).unwrap_err(), OpError::DimensionMismatch);
    let mut w = s3.create_member();
    assert_eq!(a.apply_op(&s3.create_member(), &mut w).unwrap_err(), OpError::DimensionMismatch);
    assert!(a.apply_transpose(&y, &mut w).is_ok());
}

#[test]
fn test_description()
{
    let s = VectorSpace::<La>::new(2);
    let d = diagonal_operator(&s.create_member_from(&[1., 2.]).unwrap());
    let i = identity_operator(&s);

    let sum = (&d + &i).unwrap();
    assert_eq!(sum.description(), "(DiagonalOp[2] + IdentityOp[2])");
    assert_eq!(format!("{}", scaled_operator(2., &sum)), "2*(DiagonalOp[2] + IdentityOp[2])");

    let m = multi_vector_operator(&[s.create_member()], None).unwrap();
    assert_eq!((&d * &m).unwrap().description(), "(DiagonalOp[2] * MultiVectorOp[1 columns of 2])");
}

#[test]
fn test_zero_alpha_skips_operator()
{
    let s = VectorSpace::<La>::new(2);
    let x = s.create_member_from(&[f64::INFINITY, f64::NAN]).unwrap();

    let mut dense = DenseSerialMatrix::<La>::new(&s, &s);
    dense.set_row(0, &[1., 0.]).unwrap();
    dense.set_row(1, &[0., 1.]).unwrap();
    let dense = dense.into_operator();
    let diag = diagonal_operator(&s.create_member_from(&[2., 3.]).unwrap());
    let panic = LinearOperator::new(PanicOp {space: s.clone()});
    let composed = (&dense * &diag).unwrap();

    for op in [identity_operator(&s), dense.clone(), diag.clone(), composed, panic].iter() {
        let mut y = s.create_member_from(&[3., 4.]).unwrap();
        op.apply(Transp::NoTrans, &x, &mut y, 0., 1.).unwrap();
        assert_eq!(y.to_vec(), vec![3., 4.], "{}", op);

        op.apply(Transp::NoTrans, &x, &mut y, 0., 0.5).unwrap();
        assert_eq!(y.to_vec(), vec![1.5, 2.], "{}", op);

        y.set_to_constant(f64::NAN);
        op.apply(Transp::Trans, &x, &mut y, 0., 0.).unwrap();
        assert_eq!(y.to_vec(), vec![0., 0.], "{}", op);
    }
}
