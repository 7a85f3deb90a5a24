/*!
Handle-based linear operator and vector algebra.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

[`Vector`] and [`LinearOperator`] are reference-counted handles.
Operators are combined into composites (sums, products, scaled, transposed, diagonal, block and multi-vector operators)
without materializing matrices, and simplified at construction:
identity and zero operands are dropped or collapse the composite,
and a double transpose returns the original operator.

Vector expressions such as \\(z = 2 A x + B y - z\\) are built lazily from operator overloads
and evaluated once assigned with [`Vector::assign`], which is safe when the target is also an operand.

```
use opalg::prelude::*;
use opalg::{FloatGeneric, diagonal_operator};

type La = FloatGeneric<f64>;

let d = Vector::<La>::from_vec(vec![1., 2., 3.]);
let a = diagonal_operator(&d);
let mut x = d.space().create_member_from(&[1., 1., 1.]).unwrap();

let xh = x.clone();
x.assign(2. * (&a * &xh) - &d).unwrap();
assert_eq!(x.to_vec(), vec![1., 2., 3.]);
```

## Features

### Using [`F64LAPACK`]

```toml
[dependencies.opalg]
version = "0.1.0"
features = ["f64lapack"]
```

In addition you need a
[BLAS/LAPACK source](https://github.com/blas-lapack-rs/blas-lapack-rs.github.io/wiki#sources) to link.
*/

mod linalg;

pub use linalg::*;

//

mod floatgeneric;

pub use floatgeneric::*;

#[cfg(feature = "f64lapack")]
mod f64lapack;

#[cfg(feature = "f64lapack")]
pub use f64lapack::*;

//

mod error;
mod space;
mod vector;
mod operator;
mod lincomb;

pub use error::*;
pub use space::*;
pub use vector::*;
pub use operator::*;
pub use lincomb::*;

//

mod op_zero;
mod op_identity;
mod op_scaled;
mod op_transposed;
mod op_added;
mod op_composed;
mod op_diagonal;
mod op_block;
mod op_multivec;

pub use op_zero::*;
pub use op_identity::*;
pub use op_scaled::*;
pub use op_transposed::*;
pub use op_added::*;
pub use op_composed::*;
pub use op_diagonal::*;
pub use op_block::*;
pub use op_multivec::*;

//

mod dense;
mod solver;

pub use dense::*;
pub use solver::*;

/// Prelude
pub mod prelude {
    pub use crate::linalg::{LinAlg, LinAlgEx};
    pub use crate::space::VectorSpace;
    pub use crate::vector::Vector;
    pub use crate::operator::{Operator, LinearOperator, Transp};
    pub use crate::lincomb::{LinearCombination, OpTimesLC};
    pub use crate::solver::{LinearSolver, SolveStatus};
    pub use crate::error::OpError;
}
