//! Projective measurement against an embedded projector pair.
//!
//! Outcome probabilities are `p± = Re Tr(P± ρ)`.  The pair only resolves the
//! identity on the protected subspace, so `p₊ + p₋` may be below one when ρ
//! leaks out of it; sampling renormalizes within the pair and the leaked
//! weight is discarded.

use rand::Rng;
use tracing::debug;

use crate::embedding::MeasurementOperators;
use crate::error::SimResult;
use crate::state::{DensityMatrix, trace_product};

/// Below this total weight the pair sees nothing and no outcome is drawn.
pub const DEGENERATE_PROBABILITY: f64 = 1e-14;

/// Result of a single projective measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Eigenvalue +1.
    Plus,
    /// Eigenvalue −1.
    Minus,
    /// The state has no weight on the measured pair.
    Indeterminate,
}

impl Outcome {
    /// Numeric label: +1, −1, or 0 for an indeterminate shot.
    pub fn value(self) -> i8 {
        match self {
            Outcome::Plus => 1,
            Outcome::Minus => -1,
            Outcome::Indeterminate => 0,
        }
    }
}

/// Outcome probabilities `(p₊, p₋)` for `rho`.
pub fn outcome_probabilities(rho: &DensityMatrix, ops: &MeasurementOperators) -> (f64, f64) {
    (
        trace_product(&ops.plus, rho.matrix()).re,
        trace_product(&ops.minus, rho.matrix()).re,
    )
}

/// Measure once, returning the outcome and the post-measurement state.
///
/// When `p₊ + p₋` is below [`DEGENERATE_PROBABILITY`] the shot is
/// [`Outcome::Indeterminate`] and `rho` is returned unchanged.
pub fn single_shot<R: Rng>(
    rho: &DensityMatrix,
    ops: &MeasurementOperators,
    rng: &mut R,
) -> SimResult<(Outcome, DensityMatrix)> {
    let (p_plus, p_minus) = outcome_probabilities(rho, ops);
    let total = p_plus + p_minus;
    if total < DEGENERATE_PROBABILITY {
        return Ok((Outcome::Indeterminate, rho.clone()));
    }

    let r: f64 = rng.r#gen();
    if r < p_plus / total {
        Ok((Outcome::Plus, rho.conditioned(&ops.plus, p_plus)?))
    } else {
        Ok((Outcome::Minus, rho.conditioned(&ops.minus, p_minus)?))
    }
}

/// Tally of repeated measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCounts {
    /// Number of +1 outcomes.
    pub plus: usize,
    /// Number of −1 outcomes.
    pub minus: usize,
    /// Number of indeterminate shots.
    pub indeterminate: usize,
}

impl TrialCounts {
    /// Total number of shots.
    pub fn total(&self) -> usize {
        self.plus + self.minus + self.indeterminate
    }

    /// Fraction of +1 outcomes among all shots.
    pub fn plus_fraction(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.plus as f64 / self.total() as f64
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Plus => self.plus += 1,
            Outcome::Minus => self.minus += 1,
            Outcome::Indeterminate => self.indeterminate += 1,
        }
    }
}

/// Measure `n_trials` fresh copies of `rho`.
pub fn repeated_trials<R: Rng>(
    rho: &DensityMatrix,
    ops: &MeasurementOperators,
    n_trials: usize,
    rng: &mut R,
) -> SimResult<TrialCounts> {
    let mut counts = TrialCounts::default();
    for _ in 0..n_trials {
        let (outcome, _) = single_shot(rho, ops, rng)?;
        counts.record(outcome);
    }
    debug!(
        n_trials,
        plus = counts.plus,
        minus = counts.minus,
        indeterminate = counts.indeterminate,
        "repeated measurement"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_values() {
        assert_eq!(Outcome::Plus.value(), 1);
        assert_eq!(Outcome::Minus.value(), -1);
        assert_eq!(Outcome::Indeterminate.value(), 0);
    }

    #[test]
    fn empty_counts_have_zero_fraction() {
        assert_eq!(TrialCounts::default().plus_fraction(), 0.0);
    }
}
