use tracing::{trace, warn};

use crate::util::math::mat::Mat;

use super::{CholeskyError, PivotPolicy};

/// Applies the [PivotPolicy] to each pivot as it is reached
pub(super) struct PivotCheck {
	policy: PivotPolicy,
	warned: bool,
}

impl PivotCheck {
	pub(super) const fn new(policy: PivotPolicy) -> Self {
		Self {
			policy,
			warned: false,
		}
	}

	/// Replace the pivot at `(k, k)` with its square root, returning it.
	/// `index` is the pivot's position in the outermost matrix.
	fn take(&mut self, m: &mut Mat, k: usize, index: usize) -> Result<f64, CholeskyError> {
		let pivot = m[(k, k)];
		trace!(index, pivot, "pivot");

		// NaN fails this comparison too
		if !(pivot > 0.) {
			match self.policy {
				PivotPolicy::Strict => return Err(CholeskyError::NotPositiveDefinite { index, pivot }),
				PivotPolicy::Permissive => {
					if !self.warned {
						warn!(index, pivot, "non-positive pivot, factor will contain NaN");
						self.warned = true;
					}
				},
			}
		}

		let d = pivot.sqrt();
		m[(k, k)] = d;
		Ok(d)
	}
}

/// Column-oriented recursive Cholesky.
///
/// Factors the leading pivot, normalizes the first row & column by it, then
/// recurses on the Schur complement of the trailing block. `offset` is the
/// depth of `m` within the outermost matrix, used for error reporting.
pub(super) fn factor_recursive(m: &mut Mat, offset: usize, pivots: &mut PivotCheck) -> Result<(), CholeskyError> {
	let n = m.cols();
	if n == 0 {
		return Ok(());
	}

	let d = pivots.take(m, 0, offset)?;

	let mut r = Vec::with_capacity(n - 1);
	for i in 1..n {
		let v = m[(0, i)] / d;
		m[(0, i)] = v;
		m[(i, 0)] = v;
		r.push(v);
	}

	let mut sub = m.submatrix(1, 1, n - 1, n - 1);
	sub -= &Mat::outer(&r, &r);
	// sub is now the Schur complement: M/A = D - CA⁻¹B
	factor_recursive(&mut sub, offset + 1, pivots)?;

	m.set_submatrix(1, 1, &sub);
	Ok(())
}

/// Same operations as [factor_recursive], in the same order, but applied to
/// the trailing block of `m` directly.
pub(super) fn factor_iterative(m: &mut Mat, pivots: &mut PivotCheck) -> Result<(), CholeskyError> {
	let n = m.cols();

	for k in 0..n {
		let d = pivots.take(m, k, k)?;

		for i in (k + 1)..n {
			let v = m[(k, i)] / d;
			m[(k, i)] = v;
			m[(i, k)] = v;
		}

		for i in (k + 1)..n {
			let s = m[(i, k)];
			for j in (k + 1)..n {
				m[(i, j)] -= s * m[(k, j)];
			}
		}
	}

	Ok(())
}
