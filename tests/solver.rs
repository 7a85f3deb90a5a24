use float_eq::assert_float_eq;
use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

fn dominant_matrix(seed: u64, space: &VectorSpace<La>) -> LinearOperator<La>
{
    let mut rng = rng(seed);
    let n = space.dim();
    let mut m = random_matrix(&mut rng, space, space, 0.8);
    for i in 0.. n {
        m.add_to_row(i, &[i], &[n as f64]).unwrap();
    }
    m.into_operator()
}

#[test]
fn test_bicgstab_dense()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = VectorSpace::<La>::new(12);
    let a = dominant_matrix(21, &s);
    let mut rng = rng(22);
    let x_true = random_vector(&mut rng, &s);
    let b = apply(&a, &x_true);

    let mut x = s.create_member();
    let state = BicgstabSolver::new()
        .par(|p| {
            p.tol = 1e-12;
            p.log_period = 1;
        })
        .solve(&a, &b, &mut x).unwrap();

    assert!(state.is_converged(), "{}", state);
    assert!(state.resid() < 1e-12);
    assert!(diff_norm(&x, &x_true) < 1e-9);
}

#[test]
fn test_bicgstab_composite()
{
    let s = VectorSpace::<La>::new(6);
    let a = dominant_matrix(23, &s);
    let d = Vector::<La>::from_vec(vec![1., 2., 3., 4., 5., 6.]);

    // solve (A + D) x = b without assembling the sum
    let k = (&a + &diagonal_operator(&d)).unwrap();
    let b = s.create_member_from(&[1.; 6]).unwrap();
    let mut x = s.create_member();
    let state = BicgstabSolver::new().solve(&k, &b, &mut x).unwrap();
    assert!(state.is_converged(), "{}", state);

    let r = (&k * &x - &b).eval().unwrap();
    assert!(r.norm2() < 1e-8);
}

#[test]
fn test_bicgstab_not_converged()
{
    let s = VectorSpace::<La>::new(10);
    let a = dominant_matrix(24, &s);
    let b = s.create_member_from(&[1.; 10]).unwrap();
    let mut x = s.create_member();

    let state = BicgstabSolver::new().par(|p| p.max_iter = 1).solve(&a, &b, &mut x).unwrap();
    assert_eq!(state.status(), SolveStatus::FailedToConverge);
    assert_eq!(state.iters(), 1);
    assert!(state.resid() > 0.);

    let e = BicgstabSolver::new().solve(&a, &Vector::from_vec(vec![1.; 3]), &mut x);
    assert_eq!(e.err(), Some(OpError::DimensionMismatch));
}

#[test]
fn test_build_solver()
{
    let s = VectorSpace::<La>::new(5);
    let a = dominant_matrix(25, &s);
    let mut rng = rng(26);
    let x_true = random_vector(&mut rng, &s);
    let b = apply(&a, &x_true);

    let configs = [
        SolverConfig::Bicgstab(KrylovParam::default()),
        SolverConfig::DenseLu,
    ];
    for config in configs.iter() {
        let solver = build_solver::<La>(config);
        let mut x = s.create_member();
        let state = solver.solve(&a, &b, &mut x).unwrap();
        assert!(state.is_converged(), "{:?}: {}", config, state);
        assert!(diff_norm(&x, &x_true) < 1e-8, "{:?}", config);
    }

    // singular
    let mut m = DenseSerialMatrix::<La>::new(&s, &s);
    for i in 0.. 5 {
        m.set_row(i, &[1., 1., 1., 1., 1.]).unwrap();
    }
    let singular = m.into_operator();
    let mut x = s.create_member_from(&[7.; 5]).unwrap();
    let state = build_solver::<La>(&SolverConfig::DenseLu).solve(&singular, &b, &mut x).unwrap();
    assert_eq!(state.status(), SolveStatus::Crashed);
    assert!(state.info() > 0);
    assert_float_eq!(x.to_vec().as_slice(), [7.; 5].as_ref(), abs_all <= 0.);
}

#[test]
fn test_block_triangular()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s0 = VectorSpace::<La>::new(3);
    let s1 = VectorSpace::<La>::new(4);
    let space = VectorSpace::product(vec![s0.clone(), s1.clone()]);

    let mut rng = rng(27);
    let mut blk = BlockOp::new(&space, &space);
    blk.set_block(0, 0, &dominant_matrix(28, &s0)).unwrap();
    blk.set_block(1, 0, &random_sparse_op(&mut rng, &s0, &s1, 0.9)).unwrap();
    blk.set_block(1, 1, &dominant_matrix(29, &s1)).unwrap();
    let k = blk.into_operator();

    let x_true = random_vector(&mut rng, &space);
    let b = apply(&k, &x_true);

    let config = SolverConfig::BlockTriangular(Box::new(SolverConfig::DenseLu));
    let mut x = space.create_member();
    let state = build_solver::<La>(&config).solve(&k, &b, &mut x).unwrap();
    assert!(state.is_converged(), "{}", state);
    assert!(diff_norm(&x, &x_true) < 1e-12);

    let config = SolverConfig::BlockTriangular(Box::new(SolverConfig::Bicgstab(KrylovParam::default())));
    let mut x = space.create_member();
    let state = build_solver::<La>(&config).solve(&k, &b, &mut x).unwrap();
    assert!(state.is_converged(), "{}", state);
    assert!(diff_norm(&x, &x_true) < 1e-8);
}

#[test]
fn test_block_triangular_failure_keeps_x()
{
    let s0 = VectorSpace::<La>::new(2);
    let s1 = VectorSpace::<La>::new(2);
    let space = VectorSpace::product(vec![s0.clone(), s1.clone()]);

    let mut singular = DenseSerialMatrix::<La>::new(&s1, &s1);
    singular.set_row(0, &[1., 2.]).unwrap();
    singular.set_row(1, &[2., 4.]).unwrap();

    let mut blk = BlockOp::new(&space, &space);
    blk.set_block(0, 0, &dominant_matrix(30, &s0)).unwrap();
    blk.set_block(1, 1, &singular.into_operator()).unwrap();
    let k = blk.into_operator();

    let b = space.create_member_from(&[1., 2., 3., 4.]).unwrap();
    let mut x = space.create_member_from(&[9., 9., 9., 9.]).unwrap();
    let config = SolverConfig::BlockTriangular(Box::new(SolverConfig::DenseLu));
    let state = build_solver::<La>(&config).solve(&k, &b, &mut x).unwrap();

    assert_eq!(state.status(), SolveStatus::Crashed);
    assert_eq!(x.to_vec(), vec![9., 9., 9., 9.]);
}
