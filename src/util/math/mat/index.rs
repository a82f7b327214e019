use thiserror::Error;

/// Index into matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatIndex {
	pub row: usize,
	pub col: usize,
}

impl MatIndex {
	pub const fn transposed(self) -> MatIndex {
		MatIndex { row: self.col, col: self.row }
	}
}

impl From<(usize, usize)> for MatIndex {
	fn from(value: (usize, usize)) -> Self {
		let (row, col) = value;
		Self {
			row,
			col,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatDims {
	/// Number of rows in matrix
	pub rows: usize,
	/// Number of columns in matrix
	pub cols: usize,
}

impl MatDims {
	pub const fn new(rows: usize, cols: usize) -> Self {
		Self { rows, cols }
	}

	/// Check if the element at `index` is contained within these dimensions
	#[inline]
	pub const fn contains(&self, index: &MatIndex) -> bool {
		index.row < self.rows && index.col < self.cols
	}

	/// Helper to return an error if index is not [contained](Self::contains) within these dimensions
	#[inline]
	pub(super) fn assert_contains(&self, index: &MatIndex) -> Result<(), OutOfBoundsError> {
		if self.contains(index) {
			Ok(())
		} else {
			Err(OutOfBoundsError {
				dims: *self,
				index: *index,
			})
		}
	}

	#[inline(always)]
	pub const fn compute_offset_unchecked(&self, index: MatIndex) -> usize {
		self.cols * index.row + index.col
	}

	#[inline]
	pub fn compute_offset(&self, index: MatIndex) -> Result<usize, OutOfBoundsError> {
		self.assert_contains(&index)?;
		Ok(self.compute_offset_unchecked(index))
	}

	/// Get number of elements in a matrix with these dimensions
	#[inline]
	pub const fn len(&self) -> usize {
		self.rows * self.cols
	}

	/// Check if a matrix with these dimensions holds no elements
	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.rows == 0 || self.cols == 0
	}

	/// Check if this represents a square matrix
	#[inline]
	pub const fn is_square(&self) -> bool {
		self.rows == self.cols
	}

	pub const fn transposed(self) -> Self {
		Self { rows: self.cols, cols: self.rows }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Index ({}, {}) out of bounds for {}x{} matrix", .index.row, .index.col, .dims.rows, .dims.cols)]
pub struct OutOfBoundsError {
	pub dims: MatDims,
	pub index: MatIndex,
}

#[cfg(test)]
mod test {
	use super::{MatDims, MatIndex};

	#[test]
	fn contains_requires_both_coordinates() {
		let dims = MatDims::new(2, 3);
		assert!(dims.contains(&MatIndex { row: 1, col: 2 }));
		assert!(!dims.contains(&MatIndex { row: 2, col: 0 }));
		assert!(!dims.contains(&MatIndex { row: 0, col: 3 }));
	}

	#[test]
	fn offset_is_row_major() {
		let dims = MatDims::new(2, 3);
		assert_eq!(dims.compute_offset((1, 2).into()), Ok(5));
		let err = dims.compute_offset((2, 2).into()).unwrap_err();
		assert_eq!(err.dims, dims);
		assert_eq!(err.index, MatIndex { row: 2, col: 2 });
	}
}
