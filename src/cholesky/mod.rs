mod config;
mod compute;
mod error;
mod solve;

use tracing::debug;

use crate::util::math::mat::Mat;

pub use config::{CholeskyConfig, FactorStrategy, PivotPolicy, UpperTriangle};
pub use error::CholeskyError;
pub use solve::MatChol;

use compute::{factor_iterative, factor_recursive, PivotCheck};

/// Computes `L` such that `M = L·Lᵀ` for a symmetric positive-definite `M`
#[derive(Clone, Debug, Default)]
pub struct CholeskyFactorizer {
	config: CholeskyConfig,
}

impl CholeskyFactorizer {
	pub fn new(config: CholeskyConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &CholeskyConfig {
		&self.config
	}

	/// Checks that run before any entry is modified
	fn validate(&self, mat: &Mat) -> Result<(), CholeskyError> {
		if !mat.is_square() {
			return Err(CholeskyError::InvalidDimension {
				rows: mat.rows(),
				cols: mat.cols(),
			});
		}

		if let Some(tol) = self.config.symmetry_tolerance {
			if let Some(idx) = mat.find_asymmetry(tol) {
				return Err(CholeskyError::NotSymmetric {
					row: idx.row,
					col: idx.col,
					lower: mat[(idx.row, idx.col)],
					upper: mat[(idx.col, idx.row)],
				});
			}
		}

		Ok(())
	}

	/// Overwrite `mat` with its Cholesky factor, returning the same storage.
	///
	/// If an error is returned after validation (i.e. a bad pivot under
	/// [PivotPolicy::Strict]) the contents of `mat` are partially updated.
	/// Use [factorize](Self::factorize) to avoid observing that state.
	pub fn factorize_in_place<'a>(&self, mat: &'a mut Mat) -> Result<&'a mut Mat, CholeskyError> {
		self.validate(mat)?;
		debug!(n = mat.rows(), strategy = ?self.config.strategy, "factorizing");

		let mut pivots = PivotCheck::new(self.config.pivots);
		match self.config.strategy {
			FactorStrategy::Recursive => factor_recursive(mat, 0, &mut pivots)?,
			FactorStrategy::Iterative => factor_iterative(mat, &mut pivots)?,
		}

		if self.config.upper == UpperTriangle::Zero {
			mat.clear_upper();
		}
		Ok(mat)
	}

	/// Factor `mat`, consuming it. On error the matrix is dropped.
	pub fn factorize(&self, mut mat: Mat) -> Result<Mat, CholeskyError> {
		self.factorize_in_place(&mut mat)?;
		Ok(mat)
	}

	/// Factor a copy of `mat`
	pub fn decompose(&self, mat: &Mat) -> Result<MatChol, CholeskyError> {
		let l = self.factorize(mat.clone())?;
		Ok(MatChol::from_factor(l))
	}
}

impl Mat {
	/// Compute cholesky decomposition with the default configuration
	pub fn chol(&self) -> Result<MatChol, CholeskyError> {
		CholeskyFactorizer::default().decompose(self)
	}

	/// Only sensible on SPD matrices
	pub fn chol_inverse(&self) -> Result<Mat, CholeskyError> {
		Ok(self.chol()?.inverse())
	}
}
