//! Hermitian diagonalization and excitation-manifold filtering.
//!
//! The lattice Hamiltonian conserves the total excitation number
//! `N̂ = Σᵢ nᵢ`, so its eigenvectors can be chosen inside a single sector.
//! Sectors are not always spectrally separated (on the open SSH chain the
//! 1- and (N−1)-excitation sectors are exact mirror images), and a generic
//! solver is free to return any basis of a degenerate eigenspace.  Before
//! filtering, every degenerate cluster is therefore rotated to diagonalize
//! `N̂` inside the cluster.  The rotated vectors are still orthonormal
//! eigenvectors of H with the same eigenvalues.

use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, StateVector, check_site_count, excitation_count, site_occupied};

/// Eigenvalues closer than this are treated as one degenerate cluster.
const DEGENERACY_TOL: f64 = 1e-9;

/// A real eigenvalue with its unit-norm eigenvector.
#[derive(Debug, Clone)]
pub struct EigenPair {
    /// Eigenvalue.
    pub energy: f64,
    /// Normalized eigenvector.
    pub state: StateVector,
}

/// Full eigendecomposition, ascending by eigenvalue.
#[derive(Debug, Clone)]
pub struct Spectrum {
    pairs: Vec<EigenPair>,
}

impl Spectrum {
    /// Wrap eigenpairs, sorting them ascending by eigenvalue (stable).
    pub fn from_pairs(mut pairs: Vec<EigenPair>) -> Self {
        pairs.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        Self { pairs }
    }

    /// Eigenpairs in ascending order.
    pub fn pairs(&self) -> &[EigenPair] {
        &self.pairs
    }

    /// Eigenvalues in ascending order.
    pub fn energies(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.energy).collect()
    }

    /// Number of eigenpairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when there are no eigenpairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Lowest eigenpair, if any.
    pub fn ground(&self) -> Option<&EigenPair> {
        self.pairs.first()
    }

    /// Consume into the ordered eigenpairs.
    pub fn into_pairs(self) -> Vec<EigenPair> {
        self.pairs
    }
}

/// Hermitian eigendecomposition collaborator.
///
/// Implementations must return eigenvalues in ascending order with
/// orthonormal eigenvectors, and report non-convergence as
/// [`SimError::Eigensolver`].
pub trait HermitianEigensolver: Send + Sync {
    /// Diagonalize a Hermitian matrix.
    fn eigh(&self, matrix: &Operator) -> SimResult<Spectrum>;
}

/// Dense solver backed by nalgebra's `SymmetricEigen`.
#[derive(Debug, Clone, Copy)]
pub struct DenseEigensolver {
    /// Convergence threshold on off-diagonal elements.
    pub tolerance: f64,
    /// Iteration cap; 0 means unbounded.
    pub max_iterations: usize,
}

impl Default for DenseEigensolver {
    fn default() -> Self {
        Self {
            tolerance: f64::EPSILON,
            max_iterations: 1_000_000,
        }
    }
}

impl HermitianEigensolver for DenseEigensolver {
    fn eigh(&self, matrix: &Operator) -> SimResult<Spectrum> {
        if !matrix.is_square() {
            return Err(SimError::DimensionMismatch {
                expected: matrix.nrows(),
                got: matrix.ncols(),
            });
        }
        if matrix.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return Err(SimError::Eigensolver(
                "matrix contains non-finite entries".into(),
            ));
        }

        let eig = SymmetricEigen::try_new(matrix.clone(), self.tolerance, self.max_iterations)
            .ok_or_else(|| {
                SimError::Eigensolver(format!(
                    "no convergence for {}x{} matrix within {} iterations",
                    matrix.nrows(),
                    matrix.ncols(),
                    self.max_iterations
                ))
            })?;

        let pairs = eig
            .eigenvalues
            .iter()
            .enumerate()
            .map(|(i, &energy)| EigenPair {
                energy,
                state: eig.eigenvectors.column(i).into_owned(),
            })
            .collect();
        Ok(Spectrum::from_pairs(pairs))
    }
}

/// ⟨ψ|N̂|ψ⟩ for the total excitation number.
pub fn excitation_expectation(psi: &StateVector) -> f64 {
    psi.iter()
        .enumerate()
        .map(|(b, amp)| amp.norm_sqr() * f64::from(excitation_count(b)))
        .sum()
}

/// Per-site excitation probabilities ⟨nᵢ⟩, `i ∈ [0, N)`.
pub fn site_occupations(psi: &StateVector, n_sites: usize) -> SimResult<Vec<f64>> {
    check_site_count(n_sites)?;
    if psi.len() != 1 << n_sites {
        return Err(SimError::DimensionMismatch {
            expected: 1 << n_sites,
            got: psi.len(),
        });
    }
    let mut occ = vec![0.0; n_sites];
    for (b, amp) in psi.iter().enumerate() {
        let p = amp.norm_sqr();
        for (site, slot) in occ.iter_mut().enumerate() {
            if site_occupied(b, site, n_sites) {
                *slot += p;
            }
        }
    }
    Ok(occ)
}

/// Inverse participation ratio `Σᵢ ⟨nᵢ⟩²`.
///
/// For a single-excitation state this lies in `[1/N, 1]`: 1/N when spread
/// uniformly, 1 when localized on one site.
pub fn ipr(psi: &StateVector, n_sites: usize) -> SimResult<f64> {
    Ok(site_occupations(psi, n_sites)?.iter().map(|p| p * p).sum())
}

/// Rotate degenerate clusters so each eigenvector has sharp excitation number.
pub fn resolve_degeneracies(
    spectrum: Spectrum,
    solver: &dyn HermitianEigensolver,
) -> SimResult<Spectrum> {
    let pairs = spectrum.into_pairs();
    let mut out = Vec::with_capacity(pairs.len());
    let mut start = 0;
    while start < pairs.len() {
        let mut end = start + 1;
        while end < pairs.len() && pairs[end].energy - pairs[end - 1].energy < DEGENERACY_TOL {
            end += 1;
        }
        let cluster = &pairs[start..end];
        if cluster.len() == 1 {
            out.push(cluster[0].clone());
        } else {
            out.extend(rotate_cluster(cluster, solver)?);
        }
        start = end;
    }
    Ok(Spectrum { pairs: out })
}

fn rotate_cluster(
    cluster: &[EigenPair],
    solver: &dyn HermitianEigensolver,
) -> SimResult<Vec<EigenPair>> {
    let k = cluster.len();
    let weights: Vec<f64> = (0..cluster[0].state.len())
        .map(|b| f64::from(excitation_count(b)))
        .collect();
    let number_block = DMatrix::from_fn(k, k, |a, c| {
        cluster[a]
            .state
            .iter()
            .zip(cluster[c].state.iter())
            .zip(&weights)
            .map(|((x, y), &w)| x.conj() * y * w)
            .sum::<Complex64>()
    });
    let rotation = solver.eigh(&number_block)?;
    debug!(size = k, "resolved degenerate cluster");

    Ok(rotation
        .pairs()
        .iter()
        .enumerate()
        .map(|(c, coeffs)| {
            let mut state = StateVector::zeros(cluster[0].state.len());
            for (a, pair) in cluster.iter().enumerate() {
                state.axpy(coeffs.state[a], &pair.state, Complex64::new(1.0, 0.0));
            }
            EigenPair {
                energy: cluster[c].energy,
                state,
            }
        })
        .collect())
}

/// Selects eigenpairs of fixed excitation number.
#[derive(Debug, Clone, Copy)]
pub struct ExcitationFilter {
    n_sites: usize,
    target: u32,
    tolerance: f64,
}

impl ExcitationFilter {
    /// Single-excitation filter with tolerance 1e-5.
    pub fn new(n_sites: usize) -> SimResult<Self> {
        check_site_count(n_sites)?;
        Ok(Self {
            n_sites,
            target: 1,
            tolerance: 1e-5,
        })
    }

    /// Keep states with this many excitations.
    #[must_use]
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    /// Tolerance on |⟨N̂⟩ − target|.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Diagonalize `h` and keep the eigenpairs in the target manifold.
    pub fn manifold(
        &self,
        h: &Operator,
        solver: &dyn HermitianEigensolver,
    ) -> SimResult<ExcitationManifold> {
        if h.nrows() != 1 << self.n_sites {
            return Err(SimError::DimensionMismatch {
                expected: 1 << self.n_sites,
                got: h.nrows(),
            });
        }
        let spectrum = resolve_degeneracies(solver.eigh(h)?, solver)?;
        let total = spectrum.len();
        let target = f64::from(self.target);
        let pairs: Vec<EigenPair> = spectrum
            .into_pairs()
            .into_iter()
            .filter(|p| (excitation_expectation(&p.state) - target).abs() < self.tolerance)
            .collect();

        debug!(
            total,
            kept = pairs.len(),
            target = self.target,
            "filtered excitation manifold"
        );
        if pairs.is_empty() {
            warn!(target = self.target, "excitation manifold is empty");
        }

        Ok(ExcitationManifold {
            n_sites: self.n_sites,
            pairs,
        })
    }
}

/// Eigenpairs of a fixed excitation number, ascending by eigenvalue.
#[derive(Debug, Clone)]
pub struct ExcitationManifold {
    n_sites: usize,
    pairs: Vec<EigenPair>,
}

impl ExcitationManifold {
    /// Eigenpairs in ascending order.
    pub fn pairs(&self) -> &[EigenPair] {
        &self.pairs
    }

    /// Eigenvalues in ascending order.
    pub fn energies(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.energy).collect()
    }

    /// Number of states in the manifold.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no state matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// IPR of every state, in manifold order.
    pub fn ipr_values(&self) -> SimResult<Vec<f64>> {
        self.pairs
            .iter()
            .map(|p| ipr(&p.state, self.n_sites))
            .collect()
    }

    /// The two states of smallest |E| (stable on ties): the protected pair.
    pub fn edge_pair(&self) -> SimResult<(&EigenPair, &EigenPair)> {
        if self.pairs.len() < 2 {
            return Err(SimError::InsufficientStates {
                needed: 2,
                found: self.pairs.len(),
            });
        }
        let mut order: Vec<usize> = (0..self.pairs.len()).collect();
        order.sort_by(|&a, &b| {
            self.pairs[a]
                .energy
                .abs()
                .total_cmp(&self.pairs[b].energy.abs())
        });
        Ok((&self.pairs[order[0]], &self.pairs[order[1]]))
    }
}
