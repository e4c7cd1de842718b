use std::time::{Duration, Instant};

use nalgebra::DMatrix;

use matrix_spectra::io::matrix_txt::{load_square_matrix_txt, to_sparse, DEFAULT_DROP_TOLERANCE};
use matrix_spectra::math::power::{fast_power, linear_power, SquareMatrix};

fn time<M, F>(f: F, m: &M, n: i64) -> anyhow::Result<Duration>
where
    M: SquareMatrix,
    F: Fn(&M, i64) -> matrix_spectra::Result<M>,
{
    let start = Instant::now();
    let _result = f(m, n)?;
    Ok(start.elapsed())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Row-stochastic toy chain
    let a = DMatrix::from_row_slice(3, 3, &[
        0.4, 0.6, 0.0,
        0.75, 0.25, 0.0,
        0.0, 0.0, 1.0,
    ]);

    println!("matrix,storage,n,linear_ms,fast_ms");
    for n in [100, 1_000, 10_000] {
        let lin = time(linear_power, &a, n)?;
        let fast = time(fast_power, &a, n)?;
        println!(
            "A3,dense,{},{:.3},{:.3}",
            n,
            lin.as_secs_f64() * 1000.0,
            fast.as_secs_f64() * 1000.0
        );
    }

    let matrix_file = std::env::var("MATRIX_FILE").unwrap_or_else(|_| "matrice.txt".to_string());
    if !std::path::Path::new(&matrix_file).exists() {
        tracing::info!(%matrix_file, "matrix file not found, skipping file-backed timings");
        return Ok(());
    }

    let b = load_square_matrix_txt(&matrix_file)?;
    let b_sparse = to_sparse(&b, DEFAULT_DROP_TOLERANCE);
    tracing::info!(n = b.nrows(), nnz = b_sparse.nnz(), "loaded {}", matrix_file);

    let n = 1_000;
    let lin = time(linear_power, &b, n)?;
    let fast = time(fast_power, &b, n)?;
    let sparse_fast = time(fast_power, &b_sparse, n)?;
    println!("B,dense,{},{:.3},{:.3}", n, lin.as_secs_f64() * 1000.0, fast.as_secs_f64() * 1000.0);
    println!("B,sparse,{},,{:.3}", n, sparse_fast.as_secs_f64() * 1000.0);

    Ok(())
}
