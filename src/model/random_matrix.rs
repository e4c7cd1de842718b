use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

pub const DIAGONAL_STD_DEV: f64 = 1.0;
pub const OFF_DIAGONAL_STD_DEV: f64 = 2.0;

/// Random symmetric matrices with independent diagonal and off-diagonal laws.
///
/// The distributions live as long as the generator, so repeated calls keep
/// drawing from the same laws; all randomness comes from the `rng` passed to
/// [`generate`](Self::generate).
#[derive(Debug, Clone)]
pub struct SymmetricMatrixGenerator<D = Normal<f64>, O = Normal<f64>> {
    diagonal: D,
    off_diagonal: O,
}

fn zero_mean_normal(which: &str, std_dev: f64) -> Result<Normal<f64>> {
    // Normal::new only rejects non-finite values
    if !(std_dev >= 0.0 && std_dev.is_finite()) {
        return Err(Error::invalid_argument(format!(
            "{which} std dev must be finite and >= 0, got {std_dev}"
        )));
    }
    Normal::new(0.0, std_dev).map_err(|e| Error::invalid_argument(format!("{which} std dev {std_dev}: {e}")))
}

impl SymmetricMatrixGenerator {
    /// Zero-mean Gaussian entries with the given standard deviations.
    pub fn gaussian(diagonal_std_dev: f64, off_diagonal_std_dev: f64) -> Result<Self> {
        Ok(Self {
            diagonal: zero_mean_normal("diagonal", diagonal_std_dev)?,
            off_diagonal: zero_mean_normal("off-diagonal", off_diagonal_std_dev)?,
        })
    }
}

impl<D, O> SymmetricMatrixGenerator<D, O>
where
    D: Distribution<f64>,
    O: Distribution<f64>,
{
    pub fn new(diagonal: D, off_diagonal: O) -> Self {
        Self { diagonal, off_diagonal }
    }

    /// Draws a `size x size` symmetric matrix.
    ///
    /// Row by row, the diagonal entry is drawn first, then the entries right
    /// of it. Only the upper triangle is drawn; the lower triangle is a copy.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(size, size);
        for i in 0..size {
            m[(i, i)] = self.diagonal.sample(rng);
            for j in (i + 1)..size {
                m[(i, j)] = self.off_diagonal.sample(rng);
            }
        }
        m.fill_lower_triangle_with_upper_triangle();
        m
    }
}
