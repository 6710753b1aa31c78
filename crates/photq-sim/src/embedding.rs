//! Logical qubit embedded in a two-dimensional protected subspace.
//!
//! Two lattice states |e₁⟩, |e₂⟩ (typically the edge pair) form the columns
//! of an isometry `U = [e₁ e₂]`.  A 2×2 logical operator `A` acts on the full
//! lattice as `U A U†`.  The columns are used as given: orthonormality is the
//! caller's responsibility and is only reported, never enforced.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, StateVector, identity, pauli_x, pauli_z};

/// Above this ‖U†U − I‖ we log a warning.
const ORTHONORMALITY_WARN: f64 = 1e-6;

/// Logical measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementBasis {
    /// Computational basis, projectors ½(I ± σz).
    Z,
    /// Hadamard basis, projectors ½(I ± σx).
    X,
}

impl FromStr for MeasurementBasis {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "z" => Ok(MeasurementBasis::Z),
            "x" => Ok(MeasurementBasis::X),
            _ => Err(SimError::UnsupportedBasis(s.to_string())),
        }
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementBasis::Z => write!(f, "z"),
            MeasurementBasis::X => write!(f, "x"),
        }
    }
}

impl MeasurementBasis {
    /// The 2×2 logical projectors (P₊, P₋) for this basis.
    pub fn logical_projectors(self) -> (Operator, Operator) {
        let pauli = match self {
            MeasurementBasis::Z => pauli_z(),
            MeasurementBasis::X => pauli_x(),
        };
        let half = Complex64::new(0.5, 0.0);
        let id = identity(2);
        ((&id + &pauli) * half, (&id - &pauli) * half)
    }
}

/// Embedded projector pair (P₊, P₋) on the full lattice space.
#[derive(Debug, Clone)]
pub struct MeasurementOperators {
    /// Projector for outcome +1.
    pub plus: Operator,
    /// Projector for outcome −1.
    pub minus: Operator,
}

/// The isometry `U` spanned by two lattice states.
#[derive(Debug, Clone)]
pub struct SubspaceEmbedding {
    isometry: DMatrix<Complex64>,
}

impl SubspaceEmbedding {
    /// Build `U = [first second]`.
    pub fn new(first: &StateVector, second: &StateVector) -> SimResult<Self> {
        if first.len() != second.len() {
            return Err(SimError::DimensionMismatch {
                expected: first.len(),
                got: second.len(),
            });
        }
        let isometry = DMatrix::from_columns(&[first.clone(), second.clone()]);
        let embedding = Self { isometry };

        let defect = embedding.orthonormality_error();
        if defect > ORTHONORMALITY_WARN {
            warn!(defect, "embedding columns are not orthonormal");
        }
        Ok(embedding)
    }

    /// The `2^N×2` isometry.
    pub fn isometry(&self) -> &DMatrix<Complex64> {
        &self.isometry
    }

    /// Dimension of the full space.
    pub fn full_dim(&self) -> usize {
        self.isometry.nrows()
    }

    /// `‖U†U − I‖_F`; zero for orthonormal columns.
    pub fn orthonormality_error(&self) -> f64 {
        (self.isometry.adjoint() * &self.isometry - identity(2)).norm()
    }

    /// `U A U†` for a 2×2 logical operator `A`.
    pub fn embed(&self, logical: &Operator) -> SimResult<Operator> {
        if logical.nrows() != 2 || logical.ncols() != 2 {
            return Err(SimError::DimensionMismatch {
                expected: 2,
                got: logical.nrows().max(logical.ncols()),
            });
        }
        Ok(&self.isometry * logical * self.isometry.adjoint())
    }

    /// Embedded measurement projectors for `basis`.
    pub fn measurement_operators(&self, basis: MeasurementBasis) -> SimResult<MeasurementOperators> {
        let (plus, minus) = basis.logical_projectors();
        Ok(MeasurementOperators {
            plus: self.embed(&plus)?,
            minus: self.embed(&minus)?,
        })
    }

    /// Logical 2-vector `U†|ψ⟩` of a full-space state.
    pub fn project(&self, psi: &StateVector) -> SimResult<StateVector> {
        if psi.len() != self.full_dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.full_dim(),
                got: psi.len(),
            });
        }
        Ok(self.isometry.adjoint() * psi)
    }
}
