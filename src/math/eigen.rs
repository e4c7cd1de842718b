//! Eigenvalue extraction behind a small trait, so the Monte-Carlo loop does
//! not care which decomposition produced the spectrum.

use nalgebra::linalg::{Schur, SymmetricEigen};
use nalgebra::{Complex, DMatrix};

use crate::error::{Error, Result};

/// Ordered eigenvalues of one matrix instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    values: Vec<Complex<f64>>,
}

impl Spectrum {
    pub fn new(values: Vec<Complex<f64>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Complex<f64>> {
        self.values.iter()
    }

    pub fn real_parts(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|z| z.re)
    }
}

/// Anything that can return the eigenvalues of a square real matrix.
pub trait SpectralExtractor {
    fn eigenvalues(&self, m: &DMatrix<f64>) -> Result<Spectrum>;
}

fn not_converged(what: &str, max_iter: usize) -> Error {
    if max_iter == 0 {
        Error::Decomposition(format!("{what} did not converge"))
    } else {
        Error::Decomposition(format!("{what} did not converge within {max_iter} iterations"))
    }
}

fn ensure_square(m: &DMatrix<f64>) -> Result<()> {
    if m.nrows() != m.ncols() {
        return Err(Error::invalid_argument(format!(
            "eigenvalues need a square matrix, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(())
}

/// General real matrices via the real Schur form. Eigenvalues may be complex.
#[derive(Debug, Clone, Copy)]
pub struct SchurExtractor {
    pub eps: f64,
    /// 0 means iterate until convergence.
    pub max_iter: usize,
}

impl Default for SchurExtractor {
    fn default() -> Self {
        Self { eps: f64::EPSILON, max_iter: 0 }
    }
}

impl SpectralExtractor for SchurExtractor {
    fn eigenvalues(&self, m: &DMatrix<f64>) -> Result<Spectrum> {
        ensure_square(m)?;
        let schur = Schur::try_new(m.clone(), self.eps, self.max_iter)
            .ok_or_else(|| not_converged("Schur iteration", self.max_iter))?;
        Ok(Spectrum::new(schur.complex_eigenvalues().iter().copied().collect()))
    }
}

/// Symmetric matrices only: only the lower triangle is read.
#[derive(Debug, Clone, Copy)]
pub struct SymmetricExtractor {
    pub eps: f64,
    pub max_iter: usize,
}

impl Default for SymmetricExtractor {
    fn default() -> Self {
        Self { eps: f64::EPSILON, max_iter: 0 }
    }
}

impl SpectralExtractor for SymmetricExtractor {
    fn eigenvalues(&self, m: &DMatrix<f64>) -> Result<Spectrum> {
        ensure_square(m)?;
        let eig = SymmetricEigen::try_new(m.clone(), self.eps, self.max_iter)
            .ok_or_else(|| not_converged("symmetric eigen-decomposition", self.max_iter))?;
        Ok(Spectrum::new(eig.eigenvalues.iter().map(|&re| Complex::new(re, 0.0)).collect()))
    }
}
