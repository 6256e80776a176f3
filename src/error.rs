use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid box or cell geometry, or a non-positive run parameter.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The initializer ran out of retries before placing every particle.
    #[error("placed {placed} of {requested} particles before exhausting {attempts} attempts; density too high for the box")]
    Initialization {
        placed: usize,
        requested: usize,
        attempts: usize,
    },

    /// Hard-core overlap found in an accepted configuration.
    #[error("hard-core overlap detected at particle {index}")]
    Overlap { index: usize },

    /// A particle would exceed its interaction cap; the trial is rejected.
    #[error("particle {index} exceeds the interaction cap of {max}")]
    Saturation { index: usize, max: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
