use thiserror::Error;

/// Error generated when [factorizing](crate::CholeskyFactorizer::factorize) a matrix
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum CholeskyError {
	#[error("Matrix is not square (rows: {rows}, cols: {cols})")]
	InvalidDimension {
		rows: usize,
		cols: usize,
	},
	#[error("Matrix is not positive-definite (pivot {index} was {pivot})")]
	NotPositiveDefinite {
		index: usize,
		pivot: f64,
	},
	#[error("Matrix is not symmetric (M[{row}][{col}] = {lower}, M[{col}][{row}] = {upper})")]
	NotSymmetric {
		row: usize,
		col: usize,
		lower: f64,
		upper: f64,
	},
	#[error("Right-hand side has {actual} rows (expected: {expected})")]
	DimensionMismatch {
		expected: usize,
		actual: usize,
	},
}
