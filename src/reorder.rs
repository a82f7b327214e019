//! Symmetric reorderings `P·M·Pᵀ` applied before factorization.
//!
//! Factoring a sparse matrix fills in entries that were zero. How much fill
//! occurs depends on the order rows & columns are eliminated in, which these
//! orderings try to improve.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::{util::math::mat::Mat, MatChol};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Not a permutation of 0..{len}")]
pub struct InvalidPermutation {
	pub len: usize,
}

/// A bijection on `0..n`, stored as the new position of each original index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
	forward: Box<[usize]>,
}

impl Permutation {
	pub fn identity(len: usize) -> Self {
		Self {
			forward: (0..len).collect(),
		}
	}

	/// `forward[old] = new`
	pub fn from_forward(forward: Vec<usize>) -> Result<Self, InvalidPermutation> {
		let len = forward.len();
		let mut seen = vec![false; len];
		for &dst in forward.iter() {
			match seen.get_mut(dst) {
				Some(slot) if !*slot => *slot = true,
				_ => return Err(InvalidPermutation { len }),
			}
		}
		Ok(Self {
			forward: forward.into_boxed_slice(),
		})
	}

	/// Build from the list of original indices, in their new order
	fn from_order(order: &[usize]) -> Self {
		let mut forward = vec![0; order.len()];
		for (new, &old) in order.iter().enumerate() {
			forward[old] = new;
		}
		Self {
			forward: forward.into_boxed_slice(),
		}
	}

	pub fn len(&self) -> usize {
		self.forward.len()
	}

	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}

	pub fn forward(&self) -> &[usize] {
		&self.forward
	}

	pub fn inverse(&self) -> Self {
		Self::from_order(&self.forward)
	}

	/// Compute `N` where `N[forward[i]][forward[j]] = M[i][j]`
	pub fn apply_symmetric(&self, m: &Mat) -> Mat {
		assert!(m.is_square(), "Cannot permute non-square matrix");
		assert_eq!(m.rows(), self.len(), "Permutation length mismatch");

		let mut res = Mat::zeroes_like(m);
		for (i, &pi) in self.forward.iter().enumerate() {
			for (j, &pj) in self.forward.iter().enumerate() {
				res[(pi, pj)] = m[(i, j)];
			}
		}
		res
	}
}

/// Strategy for choosing an elimination order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ordering {
	/// Keep the input order
	Natural,
	/// Uniformly random order
	Random,
	/// Fewest off-diagonal entries first
	MinDegree,
	/// Most off-diagonal entries first
	MaxDegree,
	/// Breadth-first from a low-degree node, visiting low-degree neighbours first
	CuthillMcKee,
}

impl Ordering {
	pub const ALL: [Ordering; 5] = [
		Ordering::Natural,
		Ordering::Random,
		Ordering::MinDegree,
		Ordering::MaxDegree,
		Ordering::CuthillMcKee,
	];

	pub const fn name(&self) -> &'static str {
		match self {
			Ordering::Natural => "Natural",
			Ordering::Random => "Random",
			Ordering::MinDegree => "Minimum Degree",
			Ordering::MaxDegree => "Maximum Degree",
			Ordering::CuthillMcKee => "Cuthill-McKee",
		}
	}

	/// Choose a permutation for the sparsity pattern of `m`
	pub fn compute(&self, m: &Mat, rng: &mut impl Rng) -> Permutation {
		assert!(m.is_square(), "Cannot order non-square matrix");
		let n = m.rows();
		let adjacency = adjacency(m);

		let mut order = (0..n).collect::<Vec<_>>();
		match self {
			Ordering::Natural => {},
			Ordering::Random => order.shuffle(rng),
			Ordering::MinDegree => order.sort_by_key(|&v| adjacency[v].len()),
			Ordering::MaxDegree => order.sort_by_key(|&v| std::cmp::Reverse(adjacency[v].len())),
			Ordering::CuthillMcKee => order = cuthill_mckee(&adjacency),
		}
		Permutation::from_order(&order)
	}
}

/// Off-diagonal neighbours of each node
fn adjacency(m: &Mat) -> Vec<Vec<usize>> {
	(0..m.rows())
		.map(|i| (0..m.cols())
			.filter(|&j| j != i && m[(i, j)].abs() > Mat::EPS)
			.collect())
		.collect()
}

fn cuthill_mckee(adjacency: &[Vec<usize>]) -> Vec<usize> {
	let n = adjacency.len();
	let degree = |v: usize| adjacency[v].len();

	let mut by_degree = (0..n).collect::<Vec<_>>();
	by_degree.sort_by_key(|&v| degree(v));

	let mut visited = vec![false; n];
	let mut order = Vec::with_capacity(n);
	let mut frontier = VecDeque::new();

	// Restart on each disconnected component
	for &start in by_degree.iter() {
		if visited[start] {
			continue;
		}
		visited[start] = true;
		frontier.push_back(start);

		while let Some(u) = frontier.pop_front() {
			order.push(u);

			let mut next = adjacency[u].iter()
				.copied()
				.filter(|&v| !visited[v])
				.collect::<Vec<_>>();
			next.sort_by_key(|&v| degree(v));
			for v in next {
				visited[v] = true;
				frontier.push_back(v);
			}
		}
	}
	order
}

/// Pattern matrix of an undirected graph: `degree + shift` on the diagonal,
/// `-1` for each edge. Positive-definite for any `shift > 0`.
pub fn pattern_matrix(adjacency: &[Vec<usize>], shift: f64) -> Mat {
	let n = adjacency.len();
	let mut m = Mat::zeroes(n, n);
	for (v, neighbours) in adjacency.iter().enumerate() {
		m[(v, v)] = neighbours.len() as f64 + shift;
		for &u in neighbours.iter() {
			m[(v, u)] = -1.;
		}
	}
	m
}

/// Sparsity of a matrix's lower triangle before & after factorization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillReport {
	pub original_nonzeros: usize,
	pub factor_nonzeros: usize,
}

impl FillReport {
	pub fn measure(original: &Mat, factor: &MatChol) -> Self {
		Self {
			original_nonzeros: original.count_nonzero_lower(Mat::EPS),
			factor_nonzeros: factor.factor().count_nonzero_lower(Mat::EPS),
		}
	}

	/// Entries that were zero in the input but not in the factor
	pub fn fill_in(&self) -> usize {
		self.factor_nonzeros.saturating_sub(self.original_nonzeros)
	}
}

#[cfg(test)]
mod test {
	use rand::{rngs::StdRng, SeedableRng};

	use crate::util::math::mat::Mat;

	use super::{pattern_matrix, FillReport, Ordering, Permutation};

	/// ```text
	///         4
	///         |
	/// 0 - 1 - 2 - 3
	///         |
	///         5
	/// ```
	fn star_graph() -> Vec<Vec<usize>> {
		vec![
			vec![1],
			vec![0, 2],
			vec![1, 3, 4, 5],
			vec![2],
			vec![2],
			vec![2],
		]
	}

	#[test]
	fn from_forward_validates() {
		assert!(Permutation::from_forward(vec![2, 0, 1]).is_ok());
		assert!(Permutation::from_forward(vec![0, 0, 1]).is_err());
		assert!(Permutation::from_forward(vec![0, 3, 1]).is_err());
	}

	#[test]
	fn apply_and_invert() {
		let m = Mat::from_rows(&[[1., 2., 3.], [2., 4., 5.], [3., 5., 6.]]);
		let p = Permutation::from_forward(vec![2, 0, 1]).unwrap();
		let n = p.apply_symmetric(&m);
		assert_eq!(n[(2, 2)], 1.);
		assert_eq!(n[(2, 0)], 2.);
		assert_eq!(n[(0, 1)], 5.);
		assert!(n.is_symmetric(0.));
		assert_eq!(p.inverse().apply_symmetric(&n), m);
	}

	#[test]
	fn every_ordering_is_bijection() {
		let m = pattern_matrix(&star_graph(), 1.);
		let mut rng = StdRng::seed_from_u64(3);
		for ordering in Ordering::ALL {
			let p = ordering.compute(&m, &mut rng);
			assert!(Permutation::from_forward(p.forward().to_vec()).is_ok(), "{}", ordering.name());
		}
	}

	#[test]
	fn degree_orderings() {
		let m = pattern_matrix(&star_graph(), 1.);
		let mut rng = StdRng::seed_from_u64(0);
		// Stable: ties keep input order
		let min = Ordering::MinDegree.compute(&m, &mut rng);
		assert_eq!(min.forward(), &[0, 4, 5, 1, 2, 3]);
		let max = Ordering::MaxDegree.compute(&m, &mut rng);
		assert_eq!(max.forward(), &[2, 1, 0, 3, 4, 5]);
	}

	#[test]
	fn cuthill_mckee_covers_components() {
		// 0 - 1   2 - 3 - 4
		let graph = vec![vec![1], vec![0], vec![3], vec![2, 4], vec![3]];
		let m = pattern_matrix(&graph, 1.);
		let p = Ordering::CuthillMcKee.compute(&m, &mut StdRng::seed_from_u64(0));
		// Visits 0, 1, then restarts at 2
		assert_eq!(p.forward(), &[0, 1, 2, 3, 4]);
	}

	fn fill_for(ordering: Ordering, m: &Mat) -> FillReport {
		let p = ordering.compute(m, &mut StdRng::seed_from_u64(0));
		let reordered = p.apply_symmetric(m);
		FillReport::measure(&reordered, &reordered.chol().unwrap())
	}

	#[test]
	fn fill_in_depends_on_ordering() {
		let m = pattern_matrix(&star_graph(), 1.);

		// Eliminating the hub before 3, 4, 5 couples them pairwise
		let natural = fill_for(Ordering::Natural, &m);
		assert_eq!(natural.original_nonzeros, 11);
		assert_eq!(natural.fill_in(), 3);

		// Leaves first: a tree factors without fill
		assert_eq!(fill_for(Ordering::MinDegree, &m).fill_in(), 0);

		let max = fill_for(Ordering::MaxDegree, &m);
		assert_eq!(max.original_nonzeros, 11);
		assert!(max.fill_in() > natural.fill_in());
	}
}
