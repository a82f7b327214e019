/// How the factorization walks the matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FactorStrategy {
	/// Copy the trailing Schur complement out, factor it recursively, then
	/// write it back. Uses stack depth and temporary storage proportional to `n`.
	Recursive,
	/// Loop over pivots, updating the trailing block of the full matrix in place
	#[default]
	Iterative,
}

/// What the strict upper triangle holds once factorization completes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpperTriangle {
	/// Upper triangle holds `Lᵀ`, so the storage stays symmetric
	#[default]
	Mirror,
	/// Upper triangle is zeroed, leaving a pure lower-triangular `L`
	Zero,
}

/// What to do when a pivot is not strictly positive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PivotPolicy {
	/// Fail with [NotPositiveDefinite](crate::CholeskyError::NotPositiveDefinite)
	/// at the first bad pivot
	#[default]
	Strict,
	/// Take the square root anyway and let NaN propagate
	Permissive,
}

/// Configuration for a [CholeskyFactorizer](crate::CholeskyFactorizer)
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CholeskyConfig {
	pub strategy: FactorStrategy,
	pub upper: UpperTriangle,
	pub pivots: PivotPolicy,
	/// When set, reject inputs whose mirrored entries differ by more than this
	/// before touching the matrix.
	///
	/// Default: `None` (symmetry is the caller's responsibility)
	pub symmetry_tolerance: Option<f64>,
}

impl CholeskyConfig {
	pub const fn strict(&self) -> bool {
		matches!(self.pivots, PivotPolicy::Strict)
	}
}
