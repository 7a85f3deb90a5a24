#![allow(dead_code)]

use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use opalg::prelude::*;
use opalg::{FloatGeneric, DenseSerialMatrix};

pub type La = FloatGeneric<f64>;

pub fn rng(seed: u64) -> Xoshiro256StarStar
{
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// Vector of `space` with entries uniform in `[-1, 1)`.
pub fn random_vector<R: Rng>(rng: &mut R, space: &VectorSpace<La>) -> Vector<La>
{
    let mut x = space.create_member();
    for i in 0.. x.dim() {
        x.set(i, rng.gen_range(-1.0..1.0));
    }
    x
}

/// Dense matrix from `domain` to `range` with entries uniform in `[-1, 1)` at the given density.
pub fn random_matrix<R: Rng>(rng: &mut R, domain: &VectorSpace<La>, range: &VectorSpace<La>, density: f64) -> DenseSerialMatrix<La>
{
    let mut m = DenseSerialMatrix::new(domain, range);
    for r in 0.. range.dim() {
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for c in 0.. domain.dim() {
            if rng.gen::<f64>() < density {
                cols.push(c);
                vals.push(rng.gen_range(-1.0..1.0));
            }
        }
        m.add_to_row(r, &cols, &vals).unwrap();
    }
    m
}

pub fn random_sparse_op<R: Rng>(rng: &mut R, domain: &VectorSpace<La>, range: &VectorSpace<La>, density: f64) -> LinearOperator<La>
{
    random_matrix(rng, domain, range, density).into_operator()
}

/// \\(\\|a - b\\|_2\\).
pub fn diff_norm(a: &Vector<La>, b: &Vector<La>) -> f64
{
    (a - b).eval().unwrap().norm2()
}

/// \\(K x\\) as a new vector.
pub fn apply(op: &LinearOperator<La>, x: &Vector<La>) -> Vector<La>
{
    let mut y = op.range().create_member();
    op.apply_op(x, &mut y).unwrap();
    y
}

/// \\(K^T x\\) as a new vector.
pub fn apply_t(op: &LinearOperator<La>, x: &Vector<La>) -> Vector<La>
{
    let mut y = op.domain().create_member();
    op.apply_transpose(x, &mut y).unwrap();
    y
}
