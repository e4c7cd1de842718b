use thiserror::Error;

/// Errors reported by the matrix power and spectral density routines.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter was rejected at the call site (negative exponent,
    /// non-square matrix, malformed histogram domain, empty run).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The eigen-decomposition did not converge.
    #[error("eigen-decomposition failed: {0}")]
    Decomposition(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
