use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

#[test]
fn test_double_transpose_elided()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = rng(15);
    let a = random_sparse_op(&mut rng, &VectorSpace::new(3), &VectorSpace::new(4), 0.7);

    let at = transposed_operator(&a);
    assert!(at.downcast_ref::<TransposedOp<La>>().is_some());
    assert!(at.domain().is_compatible(&a.range()));
    assert!(at.range().is_compatible(&a.domain()));

    let att = transposed_operator(&at);
    assert!(att.ptr_eq(&a));
    assert!(a.transpose().transpose().ptr_eq(&a));

    // repeated transposes never grow the wrapper
    let mut t = a.clone();
    for _ in 0.. 11 {
        t = t.transpose();
    }
    assert!(t.downcast_ref::<TransposedOp<La>>().unwrap().operand().ptr_eq(&a));
}

#[test]
fn test_transpose_apply()
{
    let mut rng = rng(16);
    let a = random_sparse_op(&mut rng, &VectorSpace::new(3), &VectorSpace::new(4), 0.7);
    let at = a.transpose();

    let x = random_vector(&mut rng, &a.range());
    assert!(diff_norm(&apply(&at, &x), &apply_t(&a, &x)) < 1e-15);

    let z = random_vector(&mut rng, &a.domain());
    assert!(diff_norm(&apply_t(&at, &z), &apply(&a, &z)) < 1e-15);

    // <A z, x> == <z, A^T x>
    let lhs = apply(&a, &z).dot(&x).unwrap();
    let rhs = z.dot(&apply(&at, &x)).unwrap();
    assert!((lhs - rhs).abs() < 1e-12);
}

#[test]
fn test_transpose_zero_swaps()
{
    let d = VectorSpace::<La>::new(2);
    let r = VectorSpace::<La>::new(5);
    let z = zero_operator(&d, &r);
    let zt = z.transpose();

    assert!(is_zero_operator(&zt));
    assert!(zt.domain().ptr_eq(&r));
    assert!(zt.range().ptr_eq(&d));

    let i = identity_operator(&d);
    assert!(i.transpose().ptr_eq(&i));
}

#[test]
fn test_transpose_of_composite()
{
    let mut rng = rng(17);
    let s3 = VectorSpace::<La>::new(3);
    let s4 = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &s3, &s4, 0.7);
    let b = random_sparse_op(&mut rng, &s4, &s3, 0.7);

    // (A B)^T = B^T A^T
    let abt = (&a * &b).unwrap().transpose();
    let btat = (&b.transpose() * &a.transpose()).unwrap();
    let x = random_vector(&mut rng, &s4);
    assert!(diff_norm(&apply(&abt, &x), &apply(&btat, &x)) < 1e-12);

    // (2 A)^T = 2 A^T
    let sat = scaled_operator(2., &a).transpose();
    let y = (2. * (&a.transpose() * &x)).eval().unwrap();
    assert!(diff_norm(&apply(&sat, &x), &y) < 1e-12);
}
