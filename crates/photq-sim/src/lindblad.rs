//! Lindblad master-equation integration.
//!
//! Solves the GKSL equation
//!
//!   dρ/dt = −i[H, ρ] + Σ_k ( L_k ρ L_k† − ½{L_k†L_k, ρ} )
//!
//! where the rates are already folded into the collapse operators.
//!
//! Writing `K = ½ Σ_k L_k†L_k` and `H_eff = H − iK`, the right-hand side is
//!
//!   dρ/dt = −i(H_eff ρ − ρ H_eff†) + Σ_k L_k ρ L_k†
//!
//! which is what [`Rk4Integrator`] evaluates at every stage.

use num_complex::Complex64;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::noise::CollapseOperator;
use crate::operator::Operator;
use crate::state::DensityMatrix;

/// Master-equation integrator collaborator.
///
/// Returns one density matrix per entry of `times`; the first entry is the
/// state at `times[0]`, which is `rho0`.
pub trait MasterEquationSolver {
    /// Evolve `rho0` under `hamiltonian` and `collapse` over `times`.
    fn evolve(
        &self,
        hamiltonian: &Operator,
        rho0: &DensityMatrix,
        collapse: &[CollapseOperator],
        times: &[f64],
    ) -> SimResult<Vec<DensityMatrix>>;
}

/// Fixed-step fourth-order Runge–Kutta integrator.
#[derive(Debug, Clone, Copy)]
pub struct Rk4Integrator {
    /// Largest internal step; each requested interval is split evenly.
    pub max_step: f64,
}

impl Default for Rk4Integrator {
    fn default() -> Self {
        Self { max_step: 0.01 }
    }
}

impl Rk4Integrator {
    /// Integrator with the given maximum step.
    pub fn new(max_step: f64) -> Self {
        Self { max_step }
    }
}

struct Liouvillian {
    h_eff: Operator,
    h_eff_dag: Operator,
    jumps: Vec<(Operator, Operator)>,
}

impl Liouvillian {
    fn new(hamiltonian: &Operator, collapse: &[CollapseOperator]) -> Self {
        let dim = hamiltonian.nrows();
        let mut anti = Operator::zeros(dim, dim);
        let mut jumps = Vec::with_capacity(collapse.len());
        for c in collapse {
            let l_dag = c.operator.adjoint();
            anti += &l_dag * &c.operator;
            jumps.push((c.operator.clone(), l_dag));
        }
        let h_eff = hamiltonian - anti * Complex64::new(0.0, 0.5);
        let h_eff_dag = h_eff.adjoint();
        Self {
            h_eff,
            h_eff_dag,
            jumps,
        }
    }

    fn apply(&self, rho: &Operator) -> Operator {
        let mut d = (&self.h_eff * rho - rho * &self.h_eff_dag) * Complex64::new(0.0, -1.0);
        for (l, l_dag) in &self.jumps {
            d += l * rho * l_dag;
        }
        d
    }

    fn rk4_step(&self, rho: &Operator, dt: f64) -> Operator {
        let half = Complex64::new(dt / 2.0, 0.0);
        let full = Complex64::new(dt, 0.0);
        let k1 = self.apply(rho);
        let k2 = self.apply(&(rho + &k1 * half));
        let k3 = self.apply(&(rho + &k2 * half));
        let k4 = self.apply(&(rho + &k3 * full));
        rho + (k1 + k2 * Complex64::new(2.0, 0.0) + k3 * Complex64::new(2.0, 0.0) + k4)
            * Complex64::new(dt / 6.0, 0.0)
    }
}

fn check_inputs(
    hamiltonian: &Operator,
    rho0: &DensityMatrix,
    collapse: &[CollapseOperator],
    times: &[f64],
    max_step: f64,
) -> SimResult<()> {
    let dim = rho0.dim();
    if hamiltonian.nrows() != dim || hamiltonian.ncols() != dim {
        return Err(SimError::DimensionMismatch {
            expected: dim,
            got: hamiltonian.nrows(),
        });
    }
    if let Some(c) = collapse.iter().find(|c| c.operator.nrows() != dim) {
        return Err(SimError::DimensionMismatch {
            expected: dim,
            got: c.operator.nrows(),
        });
    }
    if times.is_empty() {
        return Err(SimError::InvalidTimeGrid("no time points".into()));
    }
    if times.iter().any(|t| !t.is_finite()) {
        return Err(SimError::InvalidTimeGrid("non-finite time point".into()));
    }
    if times.windows(2).any(|w| w[1] < w[0]) {
        return Err(SimError::InvalidTimeGrid("times must be non-decreasing".into()));
    }
    if !(max_step.is_finite() && max_step > 0.0) {
        return Err(SimError::InvalidTimeGrid(format!(
            "max_step must be positive, got {max_step}"
        )));
    }
    Ok(())
}

impl MasterEquationSolver for Rk4Integrator {
    fn evolve(
        &self,
        hamiltonian: &Operator,
        rho0: &DensityMatrix,
        collapse: &[CollapseOperator],
        times: &[f64],
    ) -> SimResult<Vec<DensityMatrix>> {
        check_inputs(hamiltonian, rho0, collapse, times, self.max_step)?;
        let liouvillian = Liouvillian::new(hamiltonian, collapse);

        debug!(
            dim = rho0.dim(),
            n_collapse = collapse.len(),
            n_times = times.len(),
            max_step = self.max_step,
            "integrating master equation"
        );

        let mut rho = rho0.matrix().clone();
        let mut states = Vec::with_capacity(times.len());
        states.push(rho0.clone());
        for w in times.windows(2) {
            let interval = w[1] - w[0];
            if interval > 0.0 {
                let n_steps = (interval / self.max_step).ceil().max(1.0) as usize;
                let dt = interval / n_steps as f64;
                for _ in 0..n_steps {
                    rho = liouvillian.rk4_step(&rho, dt);
                }
            }
            if rho.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
                return Err(SimError::Integrator(format!(
                    "state became non-finite at t = {}",
                    w[1]
                )));
            }
            states.push(DensityMatrix::from_matrix(rho.clone())?);
        }
        Ok(states)
    }
}

/// `Re Tr(O·ρ(t))` for every state of a trajectory.
pub fn expectation_series(states: &[DensityMatrix], op: &Operator) -> Vec<f64> {
    states.iter().map(|s| s.expectation(op)).collect()
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
