mod mat;
/// Matrix dimensions & indexing
mod index;
/// Text parsing
mod parse;

pub use mat::Mat;
pub use index::{MatDims, MatIndex, OutOfBoundsError};
pub use parse::ParseMatError;
