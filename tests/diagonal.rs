use float_eq::assert_float_eq;
use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

#[test]
fn test_diagonal_exact()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = rng(7);
    let d = Vector::<La>::from_vec(vec![1., 2., 3., 4.]);
    let op = diagonal_operator(&d);
    assert!(op.domain().is_compatible(d.space()));
    assert!(op.range().is_compatible(d.space()));

    for _ in 0.. 5 {
        let x = random_vector(&mut rng, d.space());
        let y = (&op * &x).eval().unwrap();
        assert_eq!(y.to_vec(), x.dot_star(&d).unwrap().to_vec());

        let yt = apply_t(&op, &x);
        assert_eq!(yt.to_vec(), y.to_vec());
    }
}

#[test]
fn test_diagonal_aliasing_diag()
{
    let mut d = Vector::<La>::from_vec(vec![1., 2., 3.]);
    let op = diagonal_operator(&d);

    // d := diag(d) d
    let dh = d.clone();
    d.assign(&op * &dh).unwrap();
    assert_eq!(d.to_vec(), vec![1., 4., 9.]);

    // the operator shares d, so it now squares the updated entries
    let x = d.space().create_member_from(&[1., 1., 1.]).unwrap();
    assert_eq!(apply(&op, &x).to_vec(), vec![1., 4., 9.]);

    // y aliases the diagonal itself
    let mut y = d.clone();
    op.apply(Transp::NoTrans, &x, &mut y, 2., 1.).unwrap();
    assert_eq!(d.to_vec(), vec![3., 12., 27.]);
}

#[test]
fn test_diagonal_transpose_is_self()
{
    let d = Vector::<La>::from_vec(vec![5., 6.]);
    let op = diagonal_operator(&d);
    assert!(op.transpose().ptr_eq(&op));

    let inv = diagonal_operator(&d.reciprocal());
    let x = d.space().create_member_from(&[10., 12.]).unwrap();
    let y = (&inv * (&op * &x)).eval().unwrap();
    assert_float_eq!(y.to_vec().as_slice(), [10., 12.].as_ref(), abs_all <= 1e-12);
}
