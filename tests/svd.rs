use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

fn mat_5x3() -> LinearOperator<La>
{
    let domain = VectorSpace::new(3);
    let range = VectorSpace::new(5);
    let mut a = DenseSerialMatrix::<La>::new(&domain, &range);
    for r in 0.. 5 {
        let v = (3 * r) as f64;
        a.set_row(r, &[v + 1., v + 2., v + 3.]).unwrap();
    }
    a.into_operator()
}

#[test]
fn test_svd_5x3()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = mat_5x3();
    let (state, svd) = dense_svd(&a).unwrap();
    assert_eq!(state.status(), SolveStatus::Converged);
    let svd = svd.unwrap();

    assert_eq!(svd.sigma.dim(), 3);
    assert_eq!(svd.u.domain().dim(), 3);
    assert_eq!(svd.u.range().dim(), 5);
    assert_eq!(svd.vt.domain().dim(), 3);
    assert_eq!(svd.vt.range().dim(), 3);

    let s = svd.sigma.to_vec();
    assert!(s[0] >= s[1] && s[1] >= s[2] && s[2] >= 0.);
    assert!(s[2] < 1e-10);

    let usv = composed_operator(&[svd.u.clone(), diagonal_operator(&svd.sigma), svd.vt.clone()]).unwrap();
    let usv_a = (&usv - &a).unwrap();

    let k_space = svd.sigma.space().clone();
    let eye_k = identity_operator(&k_space);
    let utu = (&(&svd.u.transpose() * &svd.u).unwrap() - &eye_k).unwrap();
    let vvt = (&(&svd.vt * &svd.vt.transpose()).unwrap() - &eye_k).unwrap();

    let mut rng = rng(8);
    for _ in 0.. 10 {
        let x = random_vector(&mut rng, &a.domain());
        assert!(apply(&usv_a, &x).norm2() < 1e-10);

        let xk = random_vector(&mut rng, &k_space);
        assert!(apply(&utu, &xk).norm2() < 1e-10);
        assert!(apply(&vvt, &xk).norm2() < 1e-10);
    }
}

#[test]
fn test_svd_wide()
{
    let mut rng = rng(9);
    let domain = VectorSpace::<La>::new(6);
    let range = VectorSpace::<La>::new(4);
    let a = random_sparse_op(&mut rng, &domain, &range, 1.);

    let (state, svd) = dense_svd(&a).unwrap();
    assert!(state.is_converged());
    let svd = svd.unwrap();
    assert_eq!(svd.sigma.dim(), 4);

    let usv = composed_operator(&[svd.u, diagonal_operator(&svd.sigma), svd.vt]).unwrap();
    for _ in 0.. 5 {
        let x = random_vector(&mut rng, &domain);
        assert!(diff_norm(&apply(&usv, &x), &apply(&a, &x)) < 1e-10);
    }
}

#[test]
fn test_svd_not_dense()
{
    let s = VectorSpace::<La>::new(2);
    assert_eq!(dense_svd(&identity_operator(&s)).err(), Some(OpError::NotDense));
}

#[test]
fn test_svd_non_finite()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = VectorSpace::<La>::new(2);
    let mut a = DenseSerialMatrix::<La>::new(&s, &s);
    a.set_row(0, &[f64::NAN, 1.]).unwrap();
    a.set_row(1, &[2., 3.]).unwrap();

    let (state, svd) = dense_svd(&a.into_operator()).unwrap();
    assert_eq!(state.status(), SolveStatus::Crashed);
    assert!(state.info() < 0);
    assert!(svd.is_none());
}
