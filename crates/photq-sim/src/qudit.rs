//! Holographic OAM qudit transforms.
//!
//! A d-level qudit indexes orbital-angular-momentum modes.  The holographic
//! encoder is the unitary DFT
//!
//!   F_{jk} = exp(2πi·jk/d) / √d
//!
//! and the Kerr-like interaction is diagonal in the symmetric OAM index
//! `l = j − ⌊d/2⌋`:
//!
//!   N_χ = diag(exp(iχl²)).
//!
//! The combined transform conjugates the nonlinearity into the Fourier
//! basis: `F · N_χ · F†`.

use std::f64::consts::PI;

use nalgebra::DVector;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, StateVector};

fn check_dim(dim: usize) -> SimResult<()> {
    if dim == 0 {
        return Err(SimError::InvalidDimension(dim));
    }
    Ok(())
}

/// d×d discrete Fourier transform.
pub fn dft(dim: usize) -> SimResult<Operator> {
    check_dim(dim)?;
    let norm = 1.0 / (dim as f64).sqrt();
    Ok(Operator::from_fn(dim, dim, |j, k| {
        // Reduce jk mod d first so the phase stays small for large d.
        let phase = 2.0 * PI * ((j * k) % dim) as f64 / dim as f64;
        Complex64::from_polar(norm, phase)
    }))
}

/// Symmetric OAM index of mode `j`.
pub fn oam_index(j: usize, dim: usize) -> i64 {
    j as i64 - (dim / 2) as i64
}

/// Diagonal Kerr-like phase gate `exp(iχl²)`.
pub fn nonlinear_gate(dim: usize, chi: f64) -> SimResult<Operator> {
    check_dim(dim)?;
    let phases = DVector::from_iterator(
        dim,
        (0..dim).map(|j| {
            let l = oam_index(j, dim) as f64;
            Complex64::from_polar(1.0, chi * l * l)
        }),
    );
    Ok(Operator::from_diagonal(&phases))
}

/// `F · N_χ · F†`.
pub fn combined_transform(dim: usize, chi: f64) -> SimResult<Operator> {
    let f = dft(dim)?;
    let gate = nonlinear_gate(dim, chi)?;
    Ok(&f * gate * f.adjoint())
}

/// `op · ψ`.
pub fn apply(op: &Operator, psi: &StateVector) -> SimResult<StateVector> {
    if op.ncols() != psi.len() {
        return Err(SimError::DimensionMismatch {
            expected: op.ncols(),
            got: psi.len(),
        });
    }
    Ok(op * psi)
}

/// Mode probabilities `|ψ_j|²`.
pub fn probabilities(psi: &StateVector) -> Vec<f64> {
    psi.iter().map(|a| a.norm_sqr()).collect()
}

/// Normalized state with i.i.d. complex Gaussian amplitudes.
pub fn random_state<R: Rng>(dim: usize, rng: &mut R) -> SimResult<StateVector> {
    check_dim(dim)?;
    let mut psi = StateVector::from_iterator(
        dim,
        (0..dim).map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal))),
    );
    psi.normalize_mut();
    Ok(psi)
}

/// Mean and variance of the mode index under a probability distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionStats {
    /// `Σ j·p_j`.
    pub mean: f64,
    /// `Σ (j − mean)²·p_j`.
    pub variance: f64,
}

impl DistributionStats {
    /// Statistics of `probs`, indexed from 0.
    pub fn from_probabilities(probs: &[f64]) -> Self {
        let mean: f64 = probs.iter().enumerate().map(|(j, p)| j as f64 * p).sum();
        let variance = probs
            .iter()
            .enumerate()
            .map(|(j, p)| (j as f64 - mean).powi(2) * p)
            .sum();
        Self { mean, variance }
    }

    /// Statistics of `|ψ_j|²`.
    pub fn of_state(psi: &StateVector) -> Self {
        Self::from_probabilities(&probabilities(psi))
    }
}
