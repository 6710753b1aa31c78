//! Berry curvature and Chern number of a two-band Chern insulator.
//!
//! The k-space model is the Qi–Wu–Zhang Hamiltonian
//!
//!   H(k, m) = sin kx·σx + sin ky·σy + (m + cos kx + cos ky)·σz
//!
//! whose lower band has Chern number −1 for −2 < m < 0, +1 for 0 < m < 2
//! and 0 for |m| > 2.
//!
//! The curvature is computed with the gauge-invariant lattice method
//! (Fukui–Hatsugai–Suzuki 2005): normalized overlaps between neighbouring
//! lower-band eigenvectors form U(1) link variables, and the phase of each
//! plaquette product is the Berry flux through that cell.  Summing the
//! fluxes over the periodic grid gives 2π times an integer for a gapped band.
//!
//! Diagonalizations at different k-points, and different masses in a sweep,
//! are independent and run on the rayon pool.  Fluxes are collected in grid
//! order and summed sequentially, so results do not depend on scheduling.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, StateVector, pauli_x, pauli_y, pauli_z};
use crate::spectrum::HermitianEigensolver;

/// Overlaps smaller than this have no defined phase; their link is NaN.
const LINK_EPS: f64 = 1e-14;

/// The two-band Qi–Wu–Zhang model at fixed mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QwzModel {
    /// Mass parameter m.
    pub mass: f64,
}

impl QwzModel {
    /// Model at mass `m`.
    pub fn new(mass: f64) -> Self {
        Self { mass }
    }

    /// Bloch Hamiltonian `H(kx, ky)`.
    pub fn hamiltonian(&self, kx: f64, ky: f64) -> Operator {
        let c = |x: f64| Complex64::new(x, 0.0);
        pauli_x() * c(kx.sin())
            + pauli_y() * c(ky.sin())
            + pauli_z() * c(self.mass + kx.cos() + ky.cos())
    }
}

/// Periodic grid of crystal momenta.
#[derive(Debug, Clone, PartialEq)]
pub struct BrillouinZoneGrid {
    kx: Vec<f64>,
    ky: Vec<f64>,
}

impl BrillouinZoneGrid {
    /// Grid with explicit axes; both must be non-empty.
    pub fn new(kx: Vec<f64>, ky: Vec<f64>) -> SimResult<Self> {
        if kx.is_empty() || ky.is_empty() {
            return Err(SimError::InvalidDimension(kx.len().min(ky.len())));
        }
        Ok(Self { kx, ky })
    }

    /// `n×n` grid with `k_j = −π + 2πj/n`.
    pub fn uniform(n: usize) -> SimResult<Self> {
        let axis: Vec<f64> = (0..n).map(|j| -PI + 2.0 * PI * j as f64 / n as f64).collect();
        Self::new(axis.clone(), axis)
    }

    /// Momenta along x.
    pub fn kx(&self) -> &[f64] {
        &self.kx
    }

    /// Momenta along y.
    pub fn ky(&self) -> &[f64] {
        &self.ky
    }

    /// `(n_x, n_y)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.kx.len(), self.ky.len())
    }
}

/// Plaquette flux map and the resulting Chern number.
#[derive(Debug, Clone)]
pub struct BerryCurvature {
    /// Mass the curvature was computed at.
    pub mass: f64,
    /// `F[i, j]` in (−π, π], indexed by (kx, ky).
    pub flux: DMatrix<f64>,
    /// `Σ F / 2π`.
    pub chern: f64,
}

impl BerryCurvature {
    /// Total flux `Σ F`.
    pub fn total_flux(&self) -> f64 {
        self.flux.iter().sum()
    }
}

/// One point of a mass sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChernPoint {
    /// Mass parameter.
    pub mass: f64,
    /// Chern number at that mass.
    pub chern: f64,
}

impl ChernPoint {
    /// Nearest integer, or `None` if the value is NaN.
    pub fn rounded(&self) -> Option<i64> {
        self.chern.is_finite().then(|| self.chern.round() as i64)
    }
}

/// `z / |z|`, NaN when `|z|` vanishes.
fn normalize_link(z: Complex64) -> Complex64 {
    let r = z.norm();
    if r < LINK_EPS {
        Complex64::new(f64::NAN, f64::NAN)
    } else {
        z / r
    }
}

/// Principal argument in (−π, π].
fn principal_arg(z: Complex64) -> f64 {
    let a = z.arg();
    if a <= -PI { a + 2.0 * PI } else { a }
}

/// Lower-band eigenvector at every grid point, row-major in (kx, ky).
pub fn lower_band(
    model: &QwzModel,
    grid: &BrillouinZoneGrid,
    solver: &dyn HermitianEigensolver,
) -> SimResult<Vec<StateVector>> {
    let (nx, ny) = grid.shape();
    (0..nx * ny)
        .into_par_iter()
        .map(|idx| {
            let h = model.hamiltonian(grid.kx[idx / ny], grid.ky[idx % ny]);
            let spectrum = solver.eigh(&h)?;
            spectrum
                .ground()
                .map(|p| p.state.clone())
                .ok_or_else(|| SimError::Eigensolver("empty spectrum".into()))
        })
        .collect()
}

/// Berry flux map and Chern number of the lower band at `mass`.
pub fn berry_curvature(
    grid: &BrillouinZoneGrid,
    mass: f64,
    solver: &dyn HermitianEigensolver,
) -> SimResult<BerryCurvature> {
    let model = QwzModel::new(mass);
    let (nx, ny) = grid.shape();
    let u = lower_band(&model, grid, solver)?;
    let at = |i: usize, j: usize| &u[(i % nx) * ny + (j % ny)];

    let link_x = DMatrix::from_fn(nx, ny, |i, j| normalize_link(at(i, j).dotc(at(i + 1, j))));
    let link_y = DMatrix::from_fn(nx, ny, |i, j| normalize_link(at(i, j).dotc(at(i, j + 1))));

    let flux = DMatrix::from_fn(nx, ny, |i, j| {
        let (ip, jp) = ((i + 1) % nx, (j + 1) % ny);
        principal_arg(
            link_x[(i, j)] * link_y[(ip, j)] * link_x[(i, jp)].conj() * link_y[(i, j)].conj(),
        )
    });

    let mut total = 0.0;
    for i in 0..nx {
        for j in 0..ny {
            total += flux[(i, j)];
        }
    }
    let chern = total / (2.0 * PI);
    debug!(mass, nx, ny, chern, "computed Berry curvature");

    Ok(BerryCurvature { mass, flux, chern })
}

/// Chern number for each mass on a uniform `grid_size × grid_size` grid.
pub fn sweep(
    masses: &[f64],
    grid_size: usize,
    solver: &dyn HermitianEigensolver,
) -> SimResult<Vec<ChernPoint>> {
    let grid = BrillouinZoneGrid::uniform(grid_size)?;
    masses
        .par_iter()
        .map(|&mass| {
            berry_curvature(&grid, mass, solver).map(|bc| ChernPoint {
                mass,
                chern: bc.chern,
            })
        })
        .collect()
}
