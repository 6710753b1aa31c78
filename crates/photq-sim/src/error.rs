//! Error types for the simulation crate.

use thiserror::Error;

/// Errors produced by the photonic lattice pipelines.
///
/// Numerical degeneracies (a vanishing measurement probability, a zero link
/// overlap) are not errors: they surface as sentinel outcomes or NaN values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A site index outside `[0, n_sites)`.
    #[error("site {site} is out of range for a lattice of {n_sites} sites")]
    SiteOutOfRange {
        /// The offending site index.
        site: usize,
        /// Number of lattice sites.
        n_sites: usize,
    },

    /// Lattice size outside the supported dense range.
    #[error("lattice must have between 1 and {max} sites, got {got}")]
    InvalidSiteCount {
        /// Requested number of sites.
        got: usize,
        /// Largest supported dense lattice.
        max: usize,
    },

    /// Non-positive Hilbert-space dimension.
    #[error("dimension must be at least 1, got {0}")]
    InvalidDimension(usize),

    /// Two operands whose shapes do not agree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Measurement basis string that is neither `z` nor `x`.
    #[error("unsupported measurement basis '{0}', choose 'z' or 'x'")]
    UnsupportedBasis(String),

    /// Negative (or non-finite) noise rate.
    #[error("noise rate {name} must be finite and non-negative, got {value}")]
    InvalidRate {
        /// Which rate was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Fewer eigenstates survived filtering than the caller asked for.
    #[error("need {needed} states in the excitation manifold, found {found}")]
    InsufficientStates {
        /// Number of states required.
        needed: usize,
        /// Number of states available.
        found: usize,
    },

    /// Time grid is empty, non-finite or decreasing.
    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),

    /// The eigensolver failed to converge.
    #[error("eigensolver failure: {0}")]
    Eigensolver(String),

    /// The master-equation integrator failed.
    #[error("integrator failure: {0}")]
    Integrator(String),
}

impl SimError {
    /// True for errors caused by bad caller input (never retried).
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_delegate_failure()
    }

    /// True for failures reported by an external numerical collaborator.
    pub fn is_delegate_failure(&self) -> bool {
        matches!(self, SimError::Eigensolver(_) | SimError::Integrator(_))
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
