use rand::Rng;
use opalg::prelude::*;
use opalg::*;

mod common;
use common::*;

//

fn spaces(sizes: &[usize]) -> VectorSpace<La>
{
    VectorSpace::product(sizes.iter().map(|n| VectorSpace::new(*n)).collect())
}

fn random_block_op(seed: u64, domain: &VectorSpace<La>, range: &VectorSpace<La>) -> LinearOperator<La>
{
    let mut rng = rng(seed);
    let mut b = BlockOp::new(domain, range);

    for i in 0.. range.num_blocks() {
        for j in 0.. domain.num_blocks() {
            if rng.gen::<f64>() < 0.75 {
                let blk = random_sparse_op(&mut rng, &domain.block(j).unwrap(), &range.block(i).unwrap(), 0.5);
                b.set_block(i, j, &blk).unwrap();
            }
        }
    }
    b.into_operator()
}

#[test]
fn test_block_vs_whole()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let domain = spaces(&[2, 3, 4]);
    let range = spaces(&[2, 2]);
    let a = random_block_op(11, &domain, &range);
    assert_eq!(a.num_block_rows(), 2);
    assert_eq!(a.num_block_cols(), 3);

    let mut rng = rng(12);
    for _ in 0.. 5 {
        let x = random_vector(&mut rng, &domain);
        let y_whole = apply(&a, &x);

        let mut y_blocks = range.create_member();
        for i in 0.. a.num_block_rows() {
            let mut yi = y_blocks.get_block(i).unwrap();
            for j in 0.. a.num_block_cols() {
                let aij = a.get_block(i, j).unwrap();
                let xj = x.get_block(j).unwrap();
                aij.apply(Transp::NoTrans, &xj, &mut yi, 1., 1.).unwrap();
            }
        }
        assert!(diff_norm(&y_whole, &y_blocks) < 1e-13);

        let z = random_vector(&mut rng, &range);
        let w_whole = apply_t(&a, &z);
        let mut w_blocks = domain.create_member();
        for j in 0.. a.num_block_cols() {
            let mut wj = w_blocks.get_block(j).unwrap();
            for i in 0.. a.num_block_rows() {
                let aij = a.get_block(i, j).unwrap();
                aij.apply(Transp::Trans, &z.get_block(i).unwrap(), &mut wj, 1., 1.).unwrap();
            }
        }
        assert!(diff_norm(&w_whole, &w_blocks) < 1e-13);
    }
}

#[test]
fn test_block_vs_assembled()
{
    let domain = spaces(&[2, 3, 4]);
    let range = spaces(&[2, 2]);
    let a = random_block_op(13, &domain, &range);

    let mut full = DenseSerialMatrix::new(&VectorSpace::new(9), &VectorSpace::new(4));
    let (mut r0, mut c0) = (0, 0);
    for i in 0.. 2 {
        let nr = range.block(i).unwrap().dim();
        for j in 0.. 3 {
            let nc = domain.block(j).unwrap().dim();
            let aij = a.get_block(i, j).unwrap();
            if let Some(m) = aij.downcast_ref::<DenseSerialMatrix<La>>() {
                for r in 0.. nr {
                    for c in 0.. nc {
                        full.set(r0 + r, c0 + c, m.get(r, c));
                    }
                }
            }
            else {
                assert!(is_zero_operator(&aij));
            }
            c0 += nc;
        }
        c0 = 0;
        r0 += nr;
    }
    let full = full.into_operator();

    let mut rng = rng(14);
    let x = random_vector(&mut rng, &domain);
    let y = apply(&a, &x);
    let xf = Vector::from_vec(x.to_vec());
    let yf = apply(&full, &xf);
    assert!(diff_norm(&Vector::from_vec(y.to_vec()), &yf) < 1e-13);
}

#[test]
fn test_block_beta_and_aliasing()
{
    let s2 = VectorSpace::<La>::new(2);
    let space = VectorSpace::product(vec![s2.clone(), s2.clone()]);
    let mut b = BlockOp::new(&space, &space);
    let d = diagonal_operator(&s2.create_member_from(&[2., 3.]).unwrap());
    b.set_block(1, 0, &identity_operator(&s2)).unwrap();
    b.set_block(1, 1, &d).unwrap();
    let op = b.into_operator();

    // block 0 of the range has no operator: only beta applies
    let x = space.create_member_from(&[1., 2., 3., 4.]).unwrap();
    let mut y = space.create_member_from(&[10., 10., 10., 10.]).unwrap();
    op.apply(Transp::NoTrans, &x, &mut y, 1., 0.5).unwrap();
    assert_eq!(y.to_vec(), vec![5., 5., 1. + 6. + 5., 2. + 12. + 5.]);

    // y aliases x
    let mut y = x.clone();
    y.assign(&op * &x).unwrap();
    assert_eq!(x.to_vec(), vec![0., 0., 7., 14.]);

    // a block of x as the target
    let mut z = space.create_member_from(&[1., 2., 3., 4.]).unwrap();
    let mut z1 = z.get_block(1).unwrap();
    z1.assign(&d * &z.get_block(0).unwrap()).unwrap();
    assert_eq!(z.to_vec(), vec![1., 2., 2., 6.]);
    z.assign(&op * &z.clone()).unwrap();
    assert_eq!(z.to_vec(), vec![0., 0., 1. + 4., 2. + 18.]);
}
