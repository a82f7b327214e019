use std::{fs, path::PathBuf, process::ExitCode};

use cholesky::{
    reorder::pattern_matrix, CholeskyConfig, CholeskyFactorizer, FactorStrategy, FillReport, Mat,
    Ordering, PivotPolicy, UpperTriangle,
};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Regularization added to AᵀA for `--random`
const RANDOM_EPS: f64 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Copy out & recurse on the Schur complement
    Recursive,
    /// In-place loop over pivots
    Iterative,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Read the matrix from this file (rows on lines, values separated by spaces)
    input: Option<PathBuf>,
    /// Factor a random N×N matrix AᵀA + εI instead
    #[arg(long, value_name = "N", conflicts_with = "input")]
    random: Option<usize>,
    /// Seed for --random
    #[arg(long, default_value_t=0)]
    seed: u64,
    #[arg(short, long, value_enum, default_value_t=Strategy::Iterative)]
    strategy: Strategy,
    /// Zero the upper triangle of the result
    #[arg(short, long, default_value_t=false)]
    zero_upper: bool,
    /// Let non-positive pivots produce NaN instead of failing
    #[arg(short, long, default_value_t=false)]
    permissive: bool,
    /// Reject input that is not symmetric to within this tolerance
    #[arg(long, value_name = "TOL")]
    check_symmetry: Option<f64>,
    /// Compare fill-in across orderings of a sample graph
    #[arg(long, default_value_t=false, conflicts_with_all = ["input", "random"])]
    orderings: bool,
    /// Print this many digits after the decimal point
    #[arg(long)]
    precision: Option<usize>,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> CholeskyConfig {
        CholeskyConfig {
            strategy: match self.strategy {
                Strategy::Recursive => FactorStrategy::Recursive,
                Strategy::Iterative => FactorStrategy::Iterative,
            },
            upper: if self.zero_upper { UpperTriangle::Zero } else { UpperTriangle::Mirror },
            pivots: if self.permissive { PivotPolicy::Permissive } else { PivotPolicy::Strict },
            symmetry_tolerance: self.check_symmetry,
        }
    }
}

fn load_matrix(args: &Args) -> Result<Mat, String> {
    if let Some(path) = &args.input {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("unable to read {}: {e}", path.display()))?;
        return text.parse::<Mat>()
            .map_err(|e| format!("unable to parse {}: {e}", path.display()));
    }

    if let Some(n) = args.random {
        debug!(n, seed = args.seed, "generating random SPD matrix");
        let mut rng = StdRng::seed_from_u64(args.seed);
        let a = Mat::random(n, n, &mut rng);
        return Ok(a.gram() + &(Mat::identity(n) * RANDOM_EPS));
    }

    Ok(Mat::from_rows(&[
        [  4.,  12., -16.],
        [ 12.,  37., -43.],
        [-16., -43.,  98.],
    ]))
}

fn print_matrix(m: &Mat, precision: Option<usize>) {
    match precision {
        Some(p) => println!("{m:.p$}"),
        None => println!("{m}"),
    }
}

/// Factor the sample graph's pattern matrix under every ordering
fn compare_orderings(factorizer: &CholeskyFactorizer, seed: u64) -> Result<(), String> {
    //         4
    //         |
    // 0 - 1 - 2 - 3
    //         |
    //         5
    let graph = vec![
        vec![1],
        vec![0, 2],
        vec![1, 3, 4, 5],
        vec![2],
        vec![2],
        vec![2],
    ];
    let m = pattern_matrix(&graph, 1.);
    let mut rng = StdRng::seed_from_u64(seed);

    for ordering in Ordering::ALL {
        let perm = ordering.compute(&m, &mut rng);
        let reordered = perm.apply_symmetric(&m);
        let chol = factorizer.decompose(&reordered).map_err(|e| e.to_string())?;
        let report = FillReport::measure(&reordered, &chol);
        println!("------ Strategy: {} ------", ordering.name());
        println!("order:     {:?}", perm.inverse().forward());
        println!("nonzeros:  {} -> {}", report.original_nonzeros, report.factor_nonzeros);
        println!("fill-in:   {}", report.fill_in());
    }
    Ok(())
}

/// Permissive factorization lets NaN through; don't print it as a result
fn check_finite(l: &Mat) -> Result<(), String> {
    if l.is_finite() {
        return Ok(());
    }
    Err(match l.first_non_finite_pivot() {
        Some(index) => format!("Matrix is not positive-definite (pivot {index} of the factor is {})", l[(index, index)]),
        None => String::from("Factorization produced non-finite entries"),
    })
}

fn run(args: &Args) -> Result<(), String> {
    let factorizer = CholeskyFactorizer::new(args.config());

    if args.orderings {
        return compare_orderings(&factorizer, args.seed);
    }

    println!("Hello, Cholesky!");
    let m = load_matrix(args)?;
    print_matrix(&m, args.precision);

    let l = factorizer.factorize(m).map_err(|e| e.to_string())?;
    check_finite(&l)?;
    println!("cholesky factorization is");
    print_matrix(&l, args.precision);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: unable to install logger: {e}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
