use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

use crate::error::{Error, Result};

/// The capability the power routines need from a matrix representation:
/// its shape, an identity of the same shape and a product.
pub trait SquareMatrix: Clone {
    /// (rows, columns)
    fn dims(&self) -> (usize, usize);
    /// Identity with the same dimensions as `self`.
    fn identity_like(&self) -> Self;
    fn multiply(&self, rhs: &Self) -> Self;
}

impl SquareMatrix for DMatrix<f64> {
    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn identity_like(&self) -> Self {
        DMatrix::identity(self.nrows(), self.ncols())
    }

    fn multiply(&self, rhs: &Self) -> Self {
        self * rhs
    }
}

impl SquareMatrix for CsrMatrix<f64> {
    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn identity_like(&self) -> Self {
        CsrMatrix::identity(self.nrows())
    }

    fn multiply(&self, rhs: &Self) -> Self {
        self * rhs
    }
}

fn check_args<M: SquareMatrix>(m: &M, n: i64) -> Result<()> {
    if n < 0 {
        return Err(Error::invalid_argument(format!("negative exponent {n}")));
    }
    let (rows, cols) = m.dims();
    if rows != cols {
        return Err(Error::invalid_argument(format!(
            "matrix must be square, got {rows}x{cols}"
        )));
    }
    Ok(())
}

/// M^n by repeated multiplication: M^n = M * M^(n-1).
/// Uses n - 1 products for n >= 1.
pub fn linear_power<M: SquareMatrix>(m: &M, n: i64) -> Result<M> {
    check_args(m, n)?;
    if n == 0 {
        return Ok(m.identity_like());
    }
    let mut acc = m.clone();
    for _ in 1..n {
        acc = m.multiply(&acc);
    }
    Ok(acc)
}

/// M^n by binary exponentiation (repeated squaring), O(log n) products.
///
/// Agrees with [`linear_power`] for every `n >= 0`. Fails with
/// `InvalidArgument` on a negative exponent or a non-square matrix; never
/// mutates `m`.
pub fn fast_power<M: SquareMatrix>(m: &M, n: i64) -> Result<M> {
    check_args(m, n)?;
    Ok(square_and_multiply(m, n as u64))
}

fn square_and_multiply<M: SquareMatrix>(m: &M, n: u64) -> M {
    match n {
        0 => m.identity_like(),
        1 => m.clone(),
        _ => {
            // half power is computed once and squared
            let half = square_and_multiply(m, n / 2);
            let sq = half.multiply(&half);
            if n % 2 == 0 {
                sq
            } else {
                m.multiply(&sq)
            }
        }
    }
}
