//! End-to-end factorization properties

use approx::assert_abs_diff_eq;
use cholesky::{CholeskyConfig, CholeskyError, CholeskyFactorizer, FactorStrategy, Mat, PivotPolicy, UpperTriangle};
use rand::{rngs::StdRng, SeedableRng};

const STRATEGIES: [FactorStrategy; 2] = [FactorStrategy::Recursive, FactorStrategy::Iterative];

fn factorizer(strategy: FactorStrategy, upper: UpperTriangle) -> CholeskyFactorizer {
    CholeskyFactorizer::new(CholeskyConfig {
        strategy,
        upper,
        ..Default::default()
    })
}

/// AᵀA + εI, which is positive-definite
fn random_spd(n: usize, seed: u64) -> Mat {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = Mat::random(n, n, &mut rng);
    a.gram() + &(Mat::identity(n) * 1e-2)
}

fn assert_mat_eq(actual: &Mat, expected: &Mat, epsilon: f64) {
    assert_eq!(actual.dims(), expected.dims());
    for (a, e) in actual.as_slice().iter().zip(expected.as_slice()) {
        assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
    }
}

#[test]
fn known_example() {
    let m = Mat::from_rows(&[
        [  4.,  12., -16.],
        [ 12.,  37., -43.],
        [-16., -43.,  98.],
    ]);
    let expected = Mat::from_rows(&[
        [ 2., 0., 0.],
        [ 6., 1., 0.],
        [-8., 5., 3.],
    ]);
    for strategy in STRATEGIES {
        let l = factorizer(strategy, UpperTriangle::Zero).factorize(m.clone()).unwrap();
        assert_eq!(l, expected);
        assert_eq!(l.matmul(&l.transpose()), m);
    }
}

#[test]
fn identity_is_fixed_point() {
    for n in [1, 2, 5] {
        for strategy in STRATEGIES {
            let l = factorizer(strategy, UpperTriangle::Mirror).factorize(Mat::identity(n)).unwrap();
            assert_eq!(l, Mat::identity(n));
        }
    }
}

#[test]
fn one_by_one() {
    for strategy in STRATEGIES {
        let l = factorizer(strategy, UpperTriangle::Mirror).factorize(Mat::from_rows(&[[9.]])).unwrap();
        assert_eq!(l, Mat::from_rows(&[[3.]]));
        let l = factorizer(strategy, UpperTriangle::Mirror).factorize(Mat::from_rows(&[[2.]])).unwrap();
        assert_abs_diff_eq!(l[(0, 0)], 2f64.sqrt());
    }
}

#[test]
fn reconstruction_across_sizes() {
    for (seed, n) in [1, 2, 3, 10, 16].into_iter().enumerate() {
        let m = random_spd(n, seed as u64);
        for strategy in STRATEGIES {
            let l = factorizer(strategy, UpperTriangle::Zero).factorize(m.clone()).unwrap();
            let rebuilt = l.matmul(&l.transpose());
            assert!(rebuilt.max_abs_diff(&m) < 1e-6, "n = {n}, {strategy:?}");
        }
    }
}

#[test]
fn strategies_agree() {
    let m = random_spd(10, 42);
    let a = factorizer(FactorStrategy::Recursive, UpperTriangle::Mirror).factorize(m.clone()).unwrap();
    let b = factorizer(FactorStrategy::Iterative, UpperTriangle::Mirror).factorize(m).unwrap();
    assert_eq!(a, b);
}

#[test]
fn mirror_storage_is_symmetric() {
    let m = random_spd(6, 9);
    for strategy in STRATEGIES {
        let mirrored = factorizer(strategy, UpperTriangle::Mirror).factorize(m.clone()).unwrap();
        assert!(mirrored.is_symmetric(0.));

        let zeroed = factorizer(strategy, UpperTriangle::Zero).factorize(m.clone()).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                if j > i {
                    assert_eq!(zeroed[(i, j)], 0.);
                } else {
                    assert_eq!(zeroed[(i, j)], mirrored[(i, j)]);
                }
            }
        }
    }
}

#[test]
fn not_positive_definite() {
    // Eigenvalues -1 and 3
    let m = Mat::from_rows(&[[1., 2.], [2., 1.]]);
    for strategy in STRATEGIES {
        let strict = factorizer(strategy, UpperTriangle::Mirror);
        assert_eq!(
            strict.factorize(m.clone()).unwrap_err(),
            CholeskyError::NotPositiveDefinite { index: 1, pivot: -3. },
        );

        let permissive = CholeskyFactorizer::new(CholeskyConfig {
            strategy,
            pivots: PivotPolicy::Permissive,
            ..Default::default()
        });
        let l = permissive.factorize(m.clone()).unwrap();
        assert!(l[(1, 1)].is_nan());
        assert!(!l.is_finite());
        assert_eq!(l.first_non_finite_pivot(), Some(1));
    }
}

#[test]
fn invalid_dimension() {
    let err = CholeskyFactorizer::default().factorize(Mat::zeroes(3, 2)).unwrap_err();
    assert_eq!(err, CholeskyError::InvalidDimension { rows: 3, cols: 2 });
}

#[test]
fn solve_random_system() {
    let m = random_spd(10, 5);
    let mut rng = StdRng::seed_from_u64(6);
    let x_true = Mat::random(10, 2, &mut rng);
    let b = m.matmul(&x_true);

    let x = m.chol().unwrap().solve(&b).unwrap();
    assert_mat_eq(&x, &x_true, 1e-6);
}
