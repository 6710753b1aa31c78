//! Collapse operators for amplitude damping and dephasing.
//!
//! Each lattice site carries two Lindblad channels:
//!
//!   L_damp,i  = √γ_damp    · a_i      (photon loss)
//!   L_deph,i  = √γ_dephase · n_i      (pure dephasing)
//!
//! The list is handed unchanged to a [`MasterEquationSolver`](crate::lindblad::MasterEquationSolver).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::operator::{Operator, OperatorFactory};

/// Dissipative channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Amplitude damping via the lowering operator.
    Damping,
    /// Dephasing via the number operator.
    Dephasing,
}

/// A scaled collapse operator `√γ · L` acting on one site.
#[derive(Debug, Clone)]
pub struct CollapseOperator {
    /// Site the channel acts on.
    pub site: usize,
    /// Channel kind.
    pub channel: Channel,
    /// Rate γ (the operator is scaled by √γ).
    pub rate: f64,
    /// The scaled full-space operator.
    pub operator: Operator,
}

/// Uniform damping and dephasing rates for every site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Amplitude-damping rate γ_damp.
    pub damping_rate: f64,
    /// Dephasing rate γ_dephase.
    pub dephasing_rate: f64,
}

impl NoiseModel {
    /// Noise model with the given rates.
    pub fn new(damping_rate: f64, dephasing_rate: f64) -> Self {
        Self {
            damping_rate,
            dephasing_rate,
        }
    }

    /// Collapse operators for `n_sites`, ordered `damp₀, deph₀, damp₁, …`.
    pub fn collapse_operators(&self, n_sites: usize) -> SimResult<Vec<CollapseOperator>> {
        check_rate("damping_rate", self.damping_rate)?;
        check_rate("dephasing_rate", self.dephasing_rate)?;
        let ops = OperatorFactory::new(n_sites)?;

        let damp = Complex64::new(self.damping_rate.sqrt(), 0.0);
        let dephase = Complex64::new(self.dephasing_rate.sqrt(), 0.0);
        let mut out = Vec::with_capacity(2 * n_sites);
        for site in 0..n_sites {
            out.push(CollapseOperator {
                site,
                channel: Channel::Damping,
                rate: self.damping_rate,
                operator: ops.lowering(site)? * damp,
            });
            out.push(CollapseOperator {
                site,
                channel: Channel::Dephasing,
                rate: self.dephasing_rate,
                operator: ops.number(site)? * dephase,
            });
        }

        debug!(
            n_sites,
            n_operators = out.len(),
            damping_rate = self.damping_rate,
            dephasing_rate = self.dephasing_rate,
            "built collapse operators"
        );
        Ok(out)
    }
}

fn check_rate(name: &'static str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::InvalidRate { name, value });
    }
    Ok(())
}
