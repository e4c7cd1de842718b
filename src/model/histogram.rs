use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One normalized histogram bar: bin center and density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub center: f64,
    pub density: f64,
}

/// Fixed-range histogram over the half-open domain `[lower, upper)` split
/// into `bins` equal-width bars, plus a counter for everything outside.
///
/// Invariant: `counts().sum() + out_of_domain() == inserted()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    width: f64,
    counts: Vec<u64>,
    out_of_domain: u64,
}

impl Histogram {
    pub fn new(lower: f64, upper: f64, bins: usize) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(Error::invalid_argument(format!(
                "histogram bounds must be finite, got [{lower}, {upper})"
            )));
        }
        if lower >= upper {
            return Err(Error::invalid_argument(format!(
                "histogram lower bound {lower} must be below upper bound {upper}"
            )));
        }
        if bins == 0 {
            return Err(Error::invalid_argument("histogram needs at least one bin"));
        }
        let width = (upper - lower) / bins as f64;
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::invalid_argument(format!(
                "histogram [{lower}, {upper}) with {bins} bins has unusable bin width {width}"
            )));
        }
        Ok(Self {
            lower,
            upper,
            width,
            counts: vec![0; bins],
            out_of_domain: 0,
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.width
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn out_of_domain(&self) -> u64 {
        self.out_of_domain
    }

    /// Every value ever inserted since construction or the last reset.
    pub fn inserted(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.out_of_domain
    }

    /// Counts `x` in its bin and returns true, or counts it as out of
    /// domain and returns false. NaN is out of domain.
    pub fn insert(&mut self, x: f64) -> bool {
        match self.bin_index(x) {
            Some(k) => {
                self.counts[k] += 1;
                true
            }
            None => {
                self.out_of_domain += 1;
                false
            }
        }
    }

    fn bin_index(&self, x: f64) -> Option<usize> {
        // also rejects NaN
        if !(x >= self.lower && x < self.upper) {
            return None;
        }
        let k = ((x - self.lower) / self.width).floor() as usize;
        // rounding can push values just below `upper` to index == bins
        Some(k.min(self.counts.len() - 1))
    }

    /// Bin centers with `count / denominator` as density, in bin order.
    ///
    /// The caller picks the denominator (typically the total number of values
    /// it contributed), the histogram only counts.
    pub fn normalize_and_emit(&self, denominator: f64) -> Result<Vec<DensityPoint>> {
        if !(denominator > 0.0 && denominator.is_finite()) {
            return Err(Error::invalid_argument(format!(
                "density denominator must be positive, got {denominator}"
            )));
        }
        Ok(self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| DensityPoint {
                center: self.lower + (i as f64 + 0.5) * self.width,
                density: count as f64 / denominator,
            })
            .collect())
    }

    /// Zeroes every count; the domain is left untouched.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.out_of_domain = 0;
    }
}
