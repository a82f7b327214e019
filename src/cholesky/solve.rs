use crate::util::math::mat::Mat;

use super::CholeskyError;

/// A completed Cholesky factorization `M = L·Lᵀ`.
///
/// Only the lower triangle of the stored factor is ever read, so this works
/// whichever [UpperTriangle](super::UpperTriangle) convention produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct MatChol {
	l: Mat,
}

impl MatChol {
	pub(super) fn from_factor(l: Mat) -> Self {
		debug_assert!(l.is_square());
		Self { l }
	}

	/// Dimension of the factored matrix
	pub fn dim(&self) -> usize {
		self.l.rows()
	}

	/// Factor storage exactly as the factorizer left it
	pub fn factor(&self) -> &Mat {
		&self.l
	}

	pub fn into_factor(self) -> Mat {
		self.l
	}

	/// `L`, with the strict upper triangle zeroed
	pub fn lower(&self) -> Mat {
		self.l.lower_triangle()
	}

	/// Solve `M·X = B` for every column of `B`
	pub fn solve(&self, b: &Mat) -> Result<Mat, CholeskyError> {
		if b.rows() != self.dim() {
			return Err(CholeskyError::DimensionMismatch {
				expected: self.dim(),
				actual: b.rows(),
			});
		}

		let mut x = b.clone();
		self.substitute(&mut x);
		Ok(x)
	}

	fn substitute(&self, x: &mut Mat) {
		let l = &self.l;
		let n = self.dim();

		// solve Ly = b
		for i in 0..n {
			for j in 0..i {
				// b[i,k] -= L[i,j]*y[j,k]
				let lij = l[(i, j)];
				for k in 0..x.cols() {
					x[(i, k)] -= lij * x[(j, k)];
				}
			}
			let lii = l[(i, i)];
			for k in 0..x.cols() {
				x[(i, k)] /= lii;
			}
		}

		// solve Lᵀx = y
		for i in (0..n).rev() {
			for j in (i + 1)..n {
				let lji = l[(j, i)];
				for k in 0..x.cols() {
					x[(i, k)] -= lji * x[(j, k)];
				}
			}
			let lii = l[(i, i)];
			for k in 0..x.cols() {
				x[(i, k)] /= lii;
			}
		}
	}

	/// Inverse of the factored matrix
	pub fn inverse(&self) -> Mat {
		let mut x = Mat::identity(self.dim());
		self.substitute(&mut x);
		x
	}

	/// Determinant of the factored matrix, `∏ L[i][i]²`
	pub fn det(&self) -> f64 {
		(0..self.dim())
			.map(|i| self.l[(i, i)])
			.map(|d| d * d)
			.product()
	}

	/// Natural log of the determinant. Does not overflow for large matrices.
	pub fn log_det(&self) -> f64 {
		2. * (0..self.dim())
			.map(|i| self.l[(i, i)].ln())
			.sum::<f64>()
	}

	/// Rebuild `L·Lᵀ`
	pub fn reconstruct(&self) -> Mat {
		let l = self.lower();
		l.matmul(&l.transpose())
	}
}
