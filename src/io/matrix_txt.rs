use anyhow::Context;
use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Entries at or below this magnitude are left out of sparse copies.
pub const DEFAULT_DROP_TOLERANCE: f64 = 1e-12;

/// Load a square matrix from a text file with one row per line and
/// whitespace-separated values (spaces or tabs). Repeated separators and
/// blank lines are ignored.
pub fn load_square_matrix_txt(path: impl AsRef<std::path::Path>) -> anyhow::Result<DMatrix<f64>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open matrix file: {}", path.display()))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {} of {}", line + 1, path.display()))?;
        let mut row_vals: Vec<f64> = Vec::new();
        // the csv delimiter only splits on spaces; tabs stay inside fields
        for field in record.iter().flat_map(str::split_whitespace) {
            let v = field
                .parse::<f64>()
                .with_context(|| format!("Non-numeric entry '{}' on row {}", field, line + 1))?;
            row_vals.push(v);
        }
        if !row_vals.is_empty() {
            rows.push(row_vals);
        }
    }

    let n = rows.len();
    anyhow::ensure!(n > 0, "matrix file {} is empty", path.display());
    anyhow::ensure!(
        rows.iter().all(|r| r.len() == n),
        "matrix in {} must be square ({} rows)",
        path.display(),
        n
    );
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

/// Sparse copy of `m` that keeps entries with `|v| > tol`.
pub fn to_sparse(m: &DMatrix<f64>, tol: f64) -> CsrMatrix<f64> {
    let mut coo = CooMatrix::new(m.nrows(), m.ncols());
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            let v = m[(i, j)];
            if v.abs() > tol {
                coo.push(i, j, v);
            }
        }
    }
    CsrMatrix::from(&coo)
}
