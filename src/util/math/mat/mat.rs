use std::{fmt, ops::{Index, IndexMut, SubAssign, Sub, Add, AddAssign, Mul, MulAssign}};

use rand::Rng;

use super::index::{MatDims, MatIndex, OutOfBoundsError};

type MatElement = f64;

/// Dense, row-major matrix of `f64`
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
	pub(super) dims: MatDims,
	pub(super) data: Box<[MatElement]>,
}

impl Mat {
	/// Values with magnitude at or below this are treated as structural zeroes
	pub const EPS: f64 = 1e-8;

	/// Create matrix full of zeroes
	pub fn zeroes(rows: usize, cols: usize) -> Self {
		Self::zeroes_dim(MatDims::new(rows, cols))
	}

	#[inline]
	pub fn zeroes_dim(dims: MatDims) -> Self {
		Self {
			dims,
			data: vec![0.; dims.len()].into_boxed_slice(),
		}
	}

	#[inline]
	pub fn zeroes_like(other: &Self) -> Self {
		Self::zeroes_dim(other.dims)
	}

	/// Create matrix from row-major data
	pub fn create(rows: usize, cols: usize, raw: &[f64]) -> Self {
		let dims = MatDims::new(rows, cols);
		assert_eq!(dims.len(), raw.len(), "Data length mismatch");

		Self {
			dims,
			data: Box::from(raw),
		}
	}

	/// Create matrix from a list of rows, which must all have the same length
	pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
		let cols = rows.first().map_or(0, |row| row.as_ref().len());
		let mut data = Vec::with_capacity(rows.len() * cols);
		for row in rows {
			let row = row.as_ref();
			assert_eq!(row.len(), cols, "Ragged rows");
			data.extend_from_slice(row);
		}
		Self {
			dims: MatDims::new(rows.len(), cols),
			data: data.into_boxed_slice(),
		}
	}

	/// Create identity matrix of dimension
	pub fn identity(dim: usize) -> Mat {
		let mut res = Self::zeroes(dim, dim);
		for i in 0..dim {
			res[(i,i)] = 1.;
		}
		res
	}

	/// Matrix with entries drawn uniformly from `[-1, 1)`
	pub fn random(rows: usize, cols: usize, rng: &mut impl Rng) -> Mat {
		let mut res = Self::zeroes(rows, cols);
		for elem in res.data.iter_mut() {
			*elem = rng.gen_range(-1.0..1.0);
		}
		res
	}

	#[inline]
	pub const fn dims(&self) -> MatDims {
		self.dims
	}

	#[inline]
	pub const fn rows(&self) -> usize {
		self.dims.rows
	}

	#[inline]
	pub const fn cols(&self) -> usize {
		self.dims.cols
	}

	#[inline]
	pub const fn is_square(&self) -> bool {
		self.dims.is_square()
	}

	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.dims.is_empty()
	}

	/// Row-major view of the elements
	pub fn as_slice(&self) -> &[MatElement] {
		&self.data
	}

	pub fn row(&self, row: usize) -> &[MatElement] {
		let start = row * self.cols();
		&self.data[start..start + self.cols()]
	}

	pub fn get(&self, idx: MatIndex) -> Result<&MatElement, OutOfBoundsError> {
		let offset = self.dims.compute_offset(idx)?;
		Ok(&self.data[offset])
	}

	pub fn get_mut(&mut self, idx: MatIndex) -> Result<&mut MatElement, OutOfBoundsError> {
		let offset = self.dims.compute_offset(idx)?;
		Ok(&mut self.data[offset])
	}

	/// Matrix transpose
	pub fn transpose(&self) -> Self {
		let mut res = Self::zeroes_dim(self.dims.transposed());
		for i in 0..self.rows() {
			for j in 0..self.cols() {
				res[(j,i)] = self[(i,j)];
			}
		}
		res
	}

	pub fn matmul(&self, rhs: &Mat) -> Mat {
		assert_eq!(self.cols(), rhs.rows(), "Dimension mismatch");

		let mut result = Self::zeroes(self.rows(), rhs.cols());

		for i in 0..result.rows() {
			for j in 0..result.cols() {
				let mut acc: MatElement = 0.;
				for k in 0..self.cols() {
					acc += self[(i, k)] * rhs[(k, j)];
				}
				result[(i, j)] = acc;
			}
		}

		result
	}

	/// Compute `AᵀA`, which is symmetric positive semi-definite for any `A`
	pub fn gram(&self) -> Mat {
		self.transpose().matmul(self)
	}

	/// Outer product `lhsᵀ·rhs` of two row vectors
	pub fn outer(lhs: &[f64], rhs: &[f64]) -> Mat {
		let mut res = Self::zeroes(lhs.len(), rhs.len());
		for (i, &u) in lhs.iter().enumerate() {
			for (j, &v) in rhs.iter().enumerate() {
				res[(i, j)] = u * v;
			}
		}
		res
	}

	/// Copy out the `rows`x`cols` block whose top-left corner is at (`row`, `col`)
	pub fn submatrix(&self, row: usize, col: usize, rows: usize, cols: usize) -> Mat {
		assert!(row + rows <= self.rows() && col + cols <= self.cols(), "Block out of bounds");

		let mut res = Self::zeroes(rows, cols);
		for i in 0..rows {
			let src = (row + i) * self.cols() + col;
			let dst = i * cols;
			res.data[dst..dst + cols].copy_from_slice(&self.data[src..src + cols]);
		}
		res
	}

	/// Overwrite the block whose top-left corner is at (`row`, `col`) with `src`
	pub fn set_submatrix(&mut self, row: usize, col: usize, src: &Mat) {
		assert!(row + src.rows() <= self.rows() && col + src.cols() <= self.cols(), "Block out of bounds");

		let cols = src.cols();
		for i in 0..src.rows() {
			let dst = (row + i) * self.cols() + col;
			self.data[dst..dst + cols].copy_from_slice(src.row(i));
		}
	}

	/// Copy of this matrix with everything above the diagonal set to zero
	pub fn lower_triangle(&self) -> Mat {
		let mut res = self.clone();
		res.clear_upper();
		res
	}

	/// Zero the strict upper triangle in place
	pub fn clear_upper(&mut self) {
		for i in 0..self.rows() {
			for j in (i + 1)..self.cols() {
				self[(i, j)] = 0.;
			}
		}
	}

	/// Find the first pair of mirrored entries that differ by more than `tol`
	pub fn find_asymmetry(&self, tol: f64) -> Option<MatIndex> {
		if !self.is_square() {
			return None;
		}
		for i in 0..self.rows() {
			for j in 0..i {
				if (self[(i, j)] - self[(j, i)]).abs() > tol {
					return Some(MatIndex { row: i, col: j });
				}
			}
		}
		None
	}

	pub fn is_symmetric(&self, tol: f64) -> bool {
		self.is_square() && self.find_asymmetry(tol).is_none()
	}

	/// Check that no entry is NaN or infinite
	pub fn is_finite(&self) -> bool {
		self.data.iter().all(|v| v.is_finite())
	}

	/// Index of the first diagonal entry that is NaN or infinite
	pub fn first_non_finite_pivot(&self) -> Option<usize> {
		(0..self.rows().min(self.cols()))
			.find(|&i| !self[(i, i)].is_finite())
	}

	/// Largest elementwise absolute difference. NaN if either side holds a NaN.
	pub fn max_abs_diff(&self, rhs: &Mat) -> f64 {
		assert_eq!(self.dims, rhs.dims, "Dimension mismatch");

		let mut max: MatElement = 0.;
		for (&u, &v) in self.data.iter().zip(rhs.data.iter()) {
			let d = (u - v).abs();
			if d.is_nan() {
				return d;
			}
			max = max.max(d);
		}
		max
	}

	/// Count entries on or below the diagonal with magnitude above `tol`
	pub fn count_nonzero_lower(&self, tol: f64) -> usize {
		let mut count = 0;
		for i in 0..self.rows() {
			for j in 0..self.cols().min(i + 1) {
				if self[(i, j)].abs() > tol {
					count += 1;
				}
			}
		}
		count
	}

	pub fn scale(&self, scalar: f64) -> Mat {
		let mut result = self.clone();
		result.scale_inplace(scalar);
		result
	}

	pub fn scale_inplace(&mut self, scalar: f64) {
		for elem in self.data.iter_mut() {
			*elem *= scalar;
		}
	}
}

impl Index<(usize, usize)> for Mat {
	type Output = MatElement;

	fn index(&self, index: (usize, usize)) -> &Self::Output {
		match self.get(MatIndex::from(index)) {
			Ok(elem) => elem,
			Err(e) => panic!("{e}"),
		}
	}
}

impl IndexMut<(usize, usize)> for Mat {
	fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
		match self.get_mut(MatIndex::from(index)) {
			Ok(elem) => elem,
			Err(e) => panic!("{e}"),
		}
	}
}

impl Add<&Mat> for &Mat {
	type Output = Mat;

	fn add(self, rhs: &Mat) -> Self::Output {
		self.clone() + rhs
	}
}

impl Add<&Mat> for Mat {
	type Output = Mat;

	fn add(mut self, rhs: &Mat) -> Self::Output {
		AddAssign::add_assign(&mut self, rhs);
		self
	}
}

impl AddAssign<&Mat> for Mat {
	fn add_assign(&mut self, rhs: &Mat) {
		assert_eq!(self.dims, rhs.dims, "Dimension mismatch");

		// Faster single loop
		for (dst, src) in self.data.iter_mut().zip(rhs.data.iter()) {
			*dst += *src;
		}
	}
}

/// Copy-subtraction
impl Sub<&Mat> for &Mat {
	type Output = Mat;

	fn sub(self, rhs: &Mat) -> Self::Output {
		self.clone() - rhs
	}
}

/// In-place subtraction
impl Sub<&Mat> for Mat {
	type Output = Mat;

	fn sub(mut self, rhs: &Mat) -> Self::Output {
		SubAssign::sub_assign(&mut self, rhs);
		self
	}
}

impl SubAssign<&Mat> for Mat {
	fn sub_assign(&mut self, rhs: &Mat) {
		assert_eq!(self.dims, rhs.dims, "Dimension mismatch");

		// Faster single loop
		for (dst, src) in self.data.iter_mut().zip(rhs.data.iter()) {
			*dst -= *src;
		}
	}
}

impl Mul<f64> for &Mat {
	type Output = Mat;

	fn mul(self, rhs: f64) -> Self::Output {
		self.scale(rhs)
	}
}

impl Mul<f64> for Mat {
	type Output = Mat;

	fn mul(mut self, rhs: f64) -> Self::Output {
		self.scale_inplace(rhs);
		self
	}
}

impl MulAssign<f64> for Mat {
	fn mul_assign(&mut self, rhs: f64) {
		self.scale_inplace(rhs);
	}
}

/// One row per line, columns right-aligned. Honors `{:.N}`.
impl fmt::Display for Mat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let cells = self.data.iter()
			.map(|v| match f.precision() {
				Some(precision) => format!("{v:.precision$}"),
				None => format!("{v}"),
			})
			.collect::<Vec<_>>();
		let width = cells.iter().map(String::len).max().unwrap_or(0);

		for (i, row) in cells.chunks(self.cols().max(1)).take(self.rows()).enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			for (j, cell) in row.iter().enumerate() {
				if j > 0 {
					f.write_str(" ")?;
				}
				write!(f, "{cell:>width$}")?;
			}
		}
		Ok(())
	}
}
