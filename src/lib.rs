pub mod error;
pub mod io;
pub mod math;
pub mod model;

pub use error::{Error, Result};
pub use math::eigen::{SchurExtractor, SpectralExtractor, Spectrum, SymmetricExtractor};
pub use math::power::{fast_power, linear_power, SquareMatrix};
pub use model::histogram::{DensityPoint, Histogram};
pub use model::monte_carlo::{SpectralDensity, SpectralDensityConfig, SpectralDensityEstimator};
pub use model::random_matrix::SymmetricMatrixGenerator;
