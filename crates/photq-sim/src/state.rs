//! Density matrices.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, StateVector};

/// `Tr(A·B)` without forming the product.
pub fn trace_product(a: &Operator, b: &Operator) -> Complex64 {
    let mut acc = Complex64::new(0.0, 0.0);
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            acc += a[(i, j)] * b[(j, i)];
        }
    }
    acc
}

/// A Hermitian, positive-semidefinite, unit-trace operator.
///
/// Positivity and trace are not re-checked on every update; gates and
/// measurement collapses preserve them up to rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    rho: Operator,
}

impl DensityMatrix {
    /// `|ψ⟩⟨ψ|`.
    pub fn from_pure(psi: &StateVector) -> Self {
        Self {
            rho: psi * psi.adjoint(),
        }
    }

    /// Wrap an existing square matrix.
    pub fn from_matrix(rho: Operator) -> SimResult<Self> {
        if !rho.is_square() {
            return Err(SimError::DimensionMismatch {
                expected: rho.nrows(),
                got: rho.ncols(),
            });
        }
        Ok(Self { rho })
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.rho.nrows()
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &Operator {
        &self.rho
    }

    /// Consume into the underlying matrix.
    pub fn into_matrix(self) -> Operator {
        self.rho
    }

    /// Real part of the trace.
    pub fn trace(&self) -> f64 {
        self.rho.trace().re
    }

    /// `Tr(ρ²)`.
    pub fn purity(&self) -> f64 {
        trace_product(&self.rho, &self.rho).re
    }

    /// `Re Tr(O·ρ)`.
    pub fn expectation(&self, op: &Operator) -> f64 {
        trace_product(op, &self.rho).re
    }

    /// `ρ ← U ρ U†`.
    pub fn apply_unitary(&mut self, u: &Operator) -> SimResult<()> {
        self.check_dim(u)?;
        self.rho = u * &self.rho * u.adjoint();
        Ok(())
    }

    /// `P ρ P / p`, the state conditioned on projector `P` with probability `p`.
    pub fn conditioned(&self, projector: &Operator, probability: f64) -> SimResult<Self> {
        self.check_dim(projector)?;
        let rho = projector * &self.rho * projector / Complex64::new(probability, 0.0);
        Ok(Self { rho })
    }

    /// Largest entry-wise deviation from Hermiticity.
    pub fn hermiticity_error(&self) -> f64 {
        (&self.rho - self.rho.adjoint())
            .iter()
            .map(|z| z.norm())
            .fold(0.0, f64::max)
    }

    fn check_dim(&self, op: &Operator) -> SimResult<()> {
        if op.nrows() != self.dim() || op.ncols() != self.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                got: op.nrows(),
            });
        }
        Ok(())
    }
}
