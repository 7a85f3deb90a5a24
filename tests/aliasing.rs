use float_eq::assert_float_eq;
use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

#[test]
fn test_self_scaled_apply()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = rng(18);
    let s = VectorSpace::<La>::new(5);
    let a = random_sparse_op(&mut rng, &s, &s, 0.6);
    let mut x = random_vector(&mut rng, &s);
    let x_orig = x.copy();

    // x = 2 A x
    let xh = x.clone();
    x.assign(2. * (&a * &xh)).unwrap();

    let expect = (2. * (&a * &x_orig)).eval().unwrap();
    assert!(diff_norm(&x, &expect) < 1e-14);
}

#[test]
fn test_self_affine()
{
    let mut rng = rng(19);
    let s = VectorSpace::<La>::new(5);
    let a = random_sparse_op(&mut rng, &s, &s, 0.6);
    let b = random_sparse_op(&mut rng, &s, &s, 0.6);
    let y = random_vector(&mut rng, &s);
    let mut z = random_vector(&mut rng, &s);
    let z_orig = z.copy();
    let x = random_vector(&mut rng, &s);

    // z = 2 A x + B y - z
    let zh = z.clone();
    z.assign(2. * (&a * &x) + &b * &y - &zh).unwrap();

    let mut expect = apply(&a, &x);
    expect.scale(2.);
    expect.update(1., &apply(&b, &y)).unwrap();
    expect.update(-1., &z_orig).unwrap();
    assert!(diff_norm(&z, &expect) < 1e-14);

    // x = A x + x, through an operator applied in place
    let mut w = x.copy();
    let wh = w.clone();
    w.assign(&a * &wh + &wh).unwrap();
    let expect = (&a * &x + &x).eval().unwrap();
    assert!(diff_norm(&w, &expect) < 1e-14);
}

#[test]
fn test_apply_in_place()
{
    let mut rng = rng(20);
    let s = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &s, &s, 0.8);
    let x = random_vector(&mut rng, &s);
    let ax = apply(&a, &x);

    let mut y = x.copy();
    let yh = y.clone();
    a.apply(Transp::NoTrans, &yh, &mut y, 1., 0.).unwrap();
    assert!(diff_norm(&y, &ax) < 1e-15);
}

#[test]
fn test_handles_share()
{
    let s = VectorSpace::<La>::new(3);
    let x = s.create_member_from(&[1., 2., 3.]).unwrap();
    let mut y = x.clone();
    y.scale(2.);
    assert_eq!(x.to_vec(), vec![2., 4., 6.]);

    let mut c = x.copy();
    c.zero();
    assert_eq!(x.to_vec(), vec![2., 4., 6.]);

    let mut w = s.create_member();
    w.assign(&x).unwrap();
    assert!(!w.aliases(&x));
    w.assign(-(&w.clone())).unwrap();
    assert_float_eq!(w.to_vec().as_slice(), [-2., -4., -6.].as_ref(), abs_all <= 0.);
}

#[test]
fn test_multivec_column_target()
{
    let c0 = Vector::<La>::from_vec(vec![1., 2.]);
    let c1 = c0.space().create_member_from(&[3., 4.]).unwrap();
    let m = multi_vector_operator(&[c0.clone(), c1.clone()], None).unwrap();
    let coef = m.domain().create_member_from(&[1., 1.]).unwrap();

    // c0 := c0 + c1 while c0 is a column of the operator
    let mut target = c0.clone();
    m.apply(Transp::NoTrans, &coef, &mut target, 1., 0.).unwrap();
    assert_eq!(c0.to_vec(), vec![4., 6.]);
}
