use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::eigen::{SchurExtractor, SpectralExtractor};
use crate::model::histogram::{DensityPoint, Histogram};
use crate::model::random_matrix::{SymmetricMatrixGenerator, DIAGONAL_STD_DEV, OFF_DIAGONAL_STD_DEV};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralDensityConfig {
    pub matrix_size: usize,
    pub trials: usize,

    // Histogram domain [lower, upper) in rescaled eigenvalue units
    pub lower: f64,
    pub upper: f64,
    pub bins: usize,

    pub diagonal_std_dev: f64,
    pub off_diagonal_std_dev: f64,

    // None seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for SpectralDensityConfig {
    fn default() -> Self {
        Self {
            matrix_size: 150,
            trials: 50,
            lower: -3.0,
            upper: 3.0,
            bins: 20,
            diagonal_std_dev: DIAGONAL_STD_DEV,
            off_diagonal_std_dev: OFF_DIAGONAL_STD_DEV,
            seed: None,
        }
    }
}

impl SpectralDensityConfig {
    pub fn check(&self) -> Result<()> {
        check_run_shape(self.trials, self.matrix_size)?;
        // domain and std devs are validated by their constructors
        Histogram::new(self.lower, self.upper, self.bins)?;
        SymmetricMatrixGenerator::gaussian(self.diagonal_std_dev, self.off_diagonal_std_dev)?;
        Ok(())
    }
}

fn check_run_shape(trials: usize, matrix_size: usize) -> Result<()> {
    if trials == 0 {
        return Err(Error::invalid_argument("trials must be >= 1"));
    }
    if matrix_size == 0 {
        return Err(Error::invalid_argument("matrix_size must be >= 1"));
    }
    Ok(())
}

/// Normalized eigenvalue density of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralDensity {
    pub points: Vec<DensityPoint>,
    /// Rescaled eigenvalues that fell outside the histogram domain.
    pub out_of_domain: u64,
    /// trials * matrix_size, the density denominator.
    pub eigenvalues: u64,
}

/// Monte-Carlo estimate of the limiting eigenvalue density of random
/// symmetric matrices.
///
/// Each trial draws a matrix, extracts its spectrum and bins every
/// eigenvalue rescaled by `1 / (2 * sqrt(matrix_size))`, which puts the
/// spectra of all sizes on the same axis.
#[derive(Debug, Clone)]
pub struct SpectralDensityEstimator<E = SchurExtractor, D = Normal<f64>, O = Normal<f64>> {
    generator: SymmetricMatrixGenerator<D, O>,
    extractor: E,
}

impl<E, D, O> SpectralDensityEstimator<E, D, O>
where
    E: SpectralExtractor,
    D: Distribution<f64>,
    O: Distribution<f64>,
{
    pub fn new(generator: SymmetricMatrixGenerator<D, O>, extractor: E) -> Self {
        Self { generator, extractor }
    }

    /// Runs `trials` sequential trials into `histogram` and normalizes by the
    /// number of eigenvalues produced in this run.
    ///
    /// The histogram is not reset first. Decomposition failures abort the run
    /// and are returned as is.
    pub fn run<R: Rng + ?Sized>(
        &self,
        trials: usize,
        matrix_size: usize,
        histogram: &mut Histogram,
        rng: &mut R,
    ) -> Result<SpectralDensity> {
        check_run_shape(trials, matrix_size)?;
        let eigenvalues = trials
            .checked_mul(matrix_size)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| {
                Error::invalid_argument(format!("{trials} trials of size {matrix_size} overflow the eigenvalue count"))
            })?;
        let scale = 1.0 / (2.0 * (matrix_size as f64).sqrt());
        let outside_before = histogram.out_of_domain();

        for trial in 0..trials {
            let m = self.generator.generate(rng, matrix_size);
            let spectrum = self.extractor.eigenvalues(&m)?;
            let mut accepted = 0usize;
            for re in spectrum.real_parts() {
                if histogram.insert(re * scale) {
                    accepted += 1;
                }
            }
            tracing::debug!(trial, accepted, rejected = spectrum.len() - accepted, "trial binned");
        }

        let out_of_domain = histogram.out_of_domain() - outside_before;
        tracing::info!(trials, matrix_size, eigenvalues, out_of_domain, "spectral density run finished");

        Ok(SpectralDensity {
            points: histogram.normalize_and_emit(eigenvalues as f64)?,
            out_of_domain,
            eigenvalues,
        })
    }
}

/// [`SpectralDensityEstimator::run`] with Gaussian entries (sigma 1 on the
/// diagonal, 2 off it) and the Schur extractor.
pub fn run<R: Rng + ?Sized>(
    trials: usize,
    matrix_size: usize,
    histogram: &mut Histogram,
    rng: &mut R,
) -> Result<SpectralDensity> {
    let generator = SymmetricMatrixGenerator::gaussian(DIAGONAL_STD_DEV, OFF_DIAGONAL_STD_DEV)?;
    SpectralDensityEstimator::new(generator, SchurExtractor::default()).run(trials, matrix_size, histogram, rng)
}

/// Builds the histogram, generator and rng described by `cfg` and runs.
pub fn estimate(cfg: &SpectralDensityConfig) -> Result<SpectralDensity> {
    cfg.check()?;
    let mut histogram = Histogram::new(cfg.lower, cfg.upper, cfg.bins)?;
    let generator = SymmetricMatrixGenerator::gaussian(cfg.diagonal_std_dev, cfg.off_diagonal_std_dev)?;
    let mut rng = match cfg.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    SpectralDensityEstimator::new(generator, SchurExtractor::default()).run(
        cfg.trials,
        cfg.matrix_size,
        &mut histogram,
        &mut rng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::eigen::{Spectrum, SymmetricExtractor};
    use nalgebra::DMatrix;

    struct FailingExtractor;

    impl SpectralExtractor for FailingExtractor {
        fn eigenvalues(&self, _m: &DMatrix<f64>) -> Result<Spectrum> {
            Err(Error::Decomposition("no convergence".into()))
        }
    }

    fn small_config(seed: u64) -> SpectralDensityConfig {
        SpectralDensityConfig { matrix_size: 20, trials: 10, seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn densities_cover_all_eigenvalues() {
        let d = estimate(&small_config(11)).unwrap();
        assert_eq!(d.eigenvalues, 200);
        assert_eq!(d.points.len(), 20);
        let total: f64 = d.points.iter().map(|p| p.density).sum();
        assert!((total + d.out_of_domain as f64 / 200.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        assert_eq!(estimate(&small_config(5)).unwrap(), estimate(&small_config(5)).unwrap());
    }

    #[test]
    fn density_is_symmetric_and_centered() {
        // semicircle of radius 2 after rescaling; the mass sits inside (-2, 2)
        let cfg = SpectralDensityConfig { matrix_size: 60, trials: 30, seed: Some(1), ..Default::default() };
        let d = estimate(&cfg).unwrap();
        let inner: f64 = d.points.iter().filter(|p| p.center.abs() < 2.0).map(|p| p.density).sum();
        assert!(inner > 0.95, "inner mass {inner}");
        let left: f64 = d.points.iter().filter(|p| p.center < 0.0).map(|p| p.density).sum();
        let right: f64 = d.points.iter().filter(|p| p.center > 0.0).map(|p| p.density).sum();
        assert!((left - right).abs() < 0.1, "left {left} right {right}");
    }

    #[test]
    fn symmetric_extractor_agrees_with_schur() {
        let generator = || SymmetricMatrixGenerator::gaussian(1.0, 2.0).unwrap();
        let mut h1 = Histogram::new(-3.0, 3.0, 12).unwrap();
        let mut h2 = Histogram::new(-3.0, 3.0, 12).unwrap();
        let a = SpectralDensityEstimator::new(generator(), SchurExtractor::default())
            .run(5, 16, &mut h1, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        let b = SpectralDensityEstimator::new(generator(), SymmetricExtractor::default())
            .run(5, 16, &mut h2, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        // eigenvalues that sit within rounding of a bin edge may flip bins
        let moved: u64 = h1.counts().iter().zip(h2.counts()).map(|(x, y)| x.abs_diff(*y)).sum();
        assert!(moved <= 2, "{:?} vs {:?}", h1.counts(), h2.counts());
        assert_eq!(a.eigenvalues, b.eigenvalues);
    }

    #[test]
    fn histogram_accumulates_across_runs() {
        let mut h = Histogram::new(-3.0, 3.0, 20).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        run(2, 10, &mut h, &mut rng).unwrap();
        run(3, 10, &mut h, &mut rng).unwrap();
        assert_eq!(h.inserted(), 50);
    }

    #[test]
    fn decomposition_failure_propagates() {
        let generator = SymmetricMatrixGenerator::gaussian(1.0, 2.0).unwrap();
        let mut h = Histogram::new(-3.0, 3.0, 20).unwrap();
        let err = SpectralDensityEstimator::new(generator, FailingExtractor)
            .run(3, 4, &mut h, &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::Decomposition(_)));
        assert_eq!(h.inserted(), 0);
    }

    #[test]
    fn rejects_empty_runs() {
        let mut h = Histogram::new(-3.0, 3.0, 20).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(run(0, 10, &mut h, &mut rng), Err(Error::InvalidArgument(_))));
        assert!(matches!(run(10, 0, &mut h, &mut rng), Err(Error::InvalidArgument(_))));
        let cfg = SpectralDensityConfig { bins: 0, ..Default::default() };
        assert!(matches!(cfg.check(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn config_rejects_negative_std_dev() {
        let cfg = SpectralDensityConfig { diagonal_std_dev: -1.0, ..Default::default() };
        assert!(matches!(cfg.check(), Err(Error::InvalidArgument(_))));
        let cfg = SpectralDensityConfig { off_diagonal_std_dev: -2.0, ..Default::default() };
        assert!(matches!(estimate(&cfg), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_eigenvalue_count_overflow() {
        let generator = SymmetricMatrixGenerator::gaussian(1.0, 2.0).unwrap();
        let mut h = Histogram::new(-3.0, 3.0, 20).unwrap();
        let err = SpectralDensityEstimator::new(generator, FailingExtractor)
            .run(usize::MAX, 2, &mut h, &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(h.inserted(), 0);
    }
}
