//! Dense Cholesky factorization.
//!
//! ```
//! use cholesky::{CholeskyFactorizer, Mat};
//!
//! let m = Mat::from_rows(&[
//!     [  4.,  12., -16.],
//!     [ 12.,  37., -43.],
//!     [-16., -43.,  98.],
//! ]);
//! let l = CholeskyFactorizer::default().factorize(m).unwrap();
//! assert_eq!(l.lower_triangle(), Mat::from_rows(&[
//!     [ 2., 0., 0.],
//!     [ 6., 1., 0.],
//!     [-8., 5., 3.],
//! ]));
//! ```

pub mod util;
mod cholesky;
pub mod reorder;

pub use util::math::mat::{Mat, MatDims, MatIndex, OutOfBoundsError, ParseMatError};
pub use cholesky::{
    CholeskyFactorizer,
    CholeskyConfig,
    CholeskyError,
    FactorStrategy,
    PivotPolicy,
    UpperTriangle,
    MatChol,
};
pub use reorder::{Ordering, Permutation, FillReport};
