//! Operators on the extended Hilbert space of an N-site lattice.
//!
//! Every site is a two-level system (vacuum `|0⟩`, one excitation `|1⟩`),
//! so the lattice lives in `(C²)^⊗N`.  Site 0 is the leftmost tensor factor:
//! in the computational basis index `b`, site `i` is occupied iff bit
//! `N-1-i` of `b` is set.
//!
//! # Example
//!
//! ```rust
//! use photq_sim::operator::{OperatorFactory, number};
//!
//! let ops = OperatorFactory::new(3).unwrap();
//! let n1 = ops.embed(&number(), 1).unwrap();
//! assert_eq!(n1.nrows(), 8);
//! // |010⟩ has index 2.
//! assert_eq!(n1[(2, 2)].re, 1.0);
//! ```

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Dense complex operator (2^N×2^N for lattices, d×d for qudits).
pub type Operator = DMatrix<Complex64>;

/// Dense complex state vector.
pub type StateVector = DVector<Complex64>;

/// Largest lattice handled with dense operators.
pub const MAX_DENSE_SITES: usize = 14;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// d×d identity.
pub fn identity(dim: usize) -> Operator {
    Operator::identity(dim, dim)
}

/// Pauli-X.
pub fn pauli_x() -> Operator {
    Operator::from_row_slice(2, 2, &[ZERO, ONE, ONE, ZERO])
}

/// Pauli-Y.
pub fn pauli_y() -> Operator {
    let i = Complex64::i();
    Operator::from_row_slice(2, 2, &[ZERO, -i, i, ZERO])
}

/// Pauli-Z.
pub fn pauli_z() -> Operator {
    Operator::from_row_slice(2, 2, &[ONE, ZERO, ZERO, -ONE])
}

/// Single-site lowering operator `|0⟩⟨1|`.
pub fn lowering() -> Operator {
    Operator::from_row_slice(2, 2, &[ZERO, ONE, ZERO, ZERO])
}

/// Single-site raising operator `|1⟩⟨0|`.
pub fn raising() -> Operator {
    Operator::from_row_slice(2, 2, &[ZERO, ZERO, ONE, ZERO])
}

/// Single-site number operator `|1⟩⟨1|`, which is also the excitation projector.
pub fn number() -> Operator {
    Operator::from_row_slice(2, 2, &[ZERO, ZERO, ZERO, ONE])
}

/// Ordered Kronecker product `f₀ ⊗ f₁ ⊗ … ⊗ f_k`.
///
/// An empty sequence yields the 1×1 identity.
pub fn kron_all<'a, I>(factors: I) -> Operator
where
    I: IntoIterator<Item = &'a Operator>,
{
    factors
        .into_iter()
        .fold(identity(1), |acc, f| acc.kronecker(f))
}

/// Check that `n_sites` is a lattice size we can represent densely.
pub fn check_site_count(n_sites: usize) -> SimResult<()> {
    if n_sites == 0 || n_sites > MAX_DENSE_SITES {
        return Err(SimError::InvalidSiteCount {
            got: n_sites,
            max: MAX_DENSE_SITES,
        });
    }
    Ok(())
}

/// Number of excitations in computational basis state `index`.
pub fn excitation_count(index: usize) -> u32 {
    index.count_ones()
}

/// Whether `site` is occupied in computational basis state `index`.
pub fn site_occupied(index: usize, site: usize, n_sites: usize) -> bool {
    (index >> (n_sites - 1 - site)) & 1 == 1
}

/// Builds single-site operators embedded in an N-site tensor space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorFactory {
    n_sites: usize,
}

impl OperatorFactory {
    /// Factory for a lattice of `n_sites` two-level sites.
    pub fn new(n_sites: usize) -> SimResult<Self> {
        check_site_count(n_sites)?;
        Ok(Self { n_sites })
    }

    /// Number of lattice sites.
    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    /// Hilbert-space dimension `2^N`.
    pub fn dim(&self) -> usize {
        1 << self.n_sites
    }

    /// `I ⊗ … ⊗ op ⊗ … ⊗ I` with `op` at `site`.
    pub fn embed(&self, op: &Operator, site: usize) -> SimResult<Operator> {
        self.product_on_sites(&[(site, op)])
    }

    /// Product of single-site operators, built as one Kronecker chain.
    ///
    /// Operators on distinct sites commute, so `[(i, A), (j, B)]` equals
    /// `embed(A, i) · embed(B, j)`.  Several operators on the same site are
    /// multiplied in the order given.
    pub fn product_on_sites(&self, ops: &[(usize, &Operator)]) -> SimResult<Operator> {
        let mut factors: Vec<Operator> = vec![identity(2); self.n_sites];
        for &(site, op) in ops {
            self.check_site(site)?;
            if op.nrows() != 2 || op.ncols() != 2 {
                return Err(SimError::DimensionMismatch {
                    expected: 2,
                    got: op.nrows().max(op.ncols()),
                });
            }
            factors[site] = &factors[site] * op;
        }
        Ok(kron_all(&factors))
    }

    /// Lowering operator on `site`.
    pub fn lowering(&self, site: usize) -> SimResult<Operator> {
        self.embed(&lowering(), site)
    }

    /// Raising operator on `site`.
    pub fn raising(&self, site: usize) -> SimResult<Operator> {
        self.embed(&raising(), site)
    }

    /// Number operator on `site`.
    pub fn number(&self, site: usize) -> SimResult<Operator> {
        self.embed(&number(), site)
    }

    /// Total excitation number `Σᵢ nᵢ`, diagonal in the computational basis.
    pub fn total_number(&self) -> Operator {
        let diag = DVector::from_iterator(
            self.dim(),
            (0..self.dim()).map(|b| Complex64::new(f64::from(excitation_count(b)), 0.0)),
        );
        Operator::from_diagonal(&diag)
    }

    fn check_site(&self, site: usize) -> SimResult<()> {
        if site >= self.n_sites {
            return Err(SimError::SiteOutOfRange {
                site,
                n_sites: self.n_sites,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kron_of_nothing_is_scalar_identity() {
        let k = kron_all(std::iter::empty::<&Operator>());
        assert_eq!(k.shape(), (1, 1));
        assert_eq!(k[(0, 0)], ONE);
    }

    #[test]
    fn raising_then_lowering_is_number() {
        let n = &raising() * &lowering();
        assert_eq!(n, number());
    }

    #[test]
    fn site_zero_is_most_significant_bit() {
        assert!(site_occupied(0b100, 0, 3));
        assert!(!site_occupied(0b100, 2, 3));
        assert!(site_occupied(0b001, 2, 3));
    }
}
