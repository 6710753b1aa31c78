//! Tests for the Lindblad integrator.

use num_complex::Complex64;
use photq_sim::SimError;
use photq_sim::hamiltonian::SshHamiltonian;
use photq_sim::lindblad::{MasterEquationSolver, Rk4Integrator, expectation_series, linspace};
use photq_sim::noise::NoiseModel;
use photq_sim::operator::{OperatorFactory, StateVector};
use photq_sim::state::DensityMatrix;

/// Two-site chain with one excitation on site 1.
fn setup() -> (photq_sim::Operator, DensityMatrix) {
    let h = SshHamiltonian::new(2, 0.5, 1.0).build(0).unwrap();
    let mut psi = StateVector::zeros(4);
    psi[1] = Complex64::new(1.0, 0.0);
    (h.into_operator(), DensityMatrix::from_pure(&psi))
}

#[test]
fn returns_one_state_per_time() {
    let (h, rho0) = setup();
    let times = linspace(0.0, 1.0, 11);
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &[], &times)
        .unwrap();
    assert_eq!(states.len(), 11);
    assert_eq!(states[0], rho0);
}

#[test]
fn trace_and_hermiticity_are_preserved() {
    let (h, rho0) = setup();
    let collapse = NoiseModel::new(0.05, 0.05).collapse_operators(2).unwrap();
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &collapse, &linspace(0.0, 5.0, 26))
        .unwrap();
    for rho in &states {
        assert!((rho.trace() - 1.0).abs() < 1e-9);
        assert!(rho.hermiticity_error() < 1e-12);
    }
}

#[test]
fn closed_evolution_stays_pure() {
    let (h, rho0) = setup();
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &[], &linspace(0.0, 3.0, 7))
        .unwrap();
    for rho in &states {
        assert!((rho.purity() - 1.0).abs() < 1e-8);
    }
}

#[test]
fn closed_evolution_oscillates_between_sites() {
    // With one hopping t the excitation returns to site 0 at t·τ = π/2.
    let (h, rho0) = setup();
    let t = 0.5;
    let tau = std::f64::consts::FRAC_PI_2 / t;
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &[], &[0.0, tau])
        .unwrap();
    let n0 = OperatorFactory::new(2).unwrap().number(0).unwrap();
    assert!((states[1].expectation(&n0) - 1.0).abs() < 1e-8);
}

#[test]
fn damping_decays_excitation_number() {
    let (h, rho0) = setup();
    let gamma = 0.1;
    let collapse = NoiseModel::new(gamma, 0.0).collapse_operators(2).unwrap();
    let times = linspace(0.0, 10.0, 21);
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &collapse, &times)
        .unwrap();

    let n_total = OperatorFactory::new(2).unwrap().total_number();
    let series = expectation_series(&states, &n_total);
    assert!(series.windows(2).all(|w| w[1] < w[0]));
    for (t, n) in times.iter().zip(&series) {
        assert!((n - (-gamma * t).exp()).abs() < 1e-8);
    }
}

#[test]
fn dephasing_conserves_excitation_number() {
    let (h, rho0) = setup();
    let collapse = NoiseModel::new(0.0, 0.2).collapse_operators(2).unwrap();
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &collapse, &linspace(0.0, 5.0, 11))
        .unwrap();
    let n_total = OperatorFactory::new(2).unwrap().total_number();
    for n in expectation_series(&states, &n_total) {
        assert!((n - 1.0).abs() < 1e-9);
    }
    assert!(states[10].purity() < 0.99);
}

#[test]
fn repeated_times_are_allowed() {
    let (h, rho0) = setup();
    let states = Rk4Integrator::default()
        .evolve(&h, &rho0, &[], &[0.0, 0.0, 0.5])
        .unwrap();
    assert_eq!(states[0], states[1]);
}

#[test]
fn bad_time_grids_are_rejected() {
    let (h, rho0) = setup();
    let solver = Rk4Integrator::default();
    for times in [vec![], vec![0.0, 1.0, 0.5], vec![0.0, f64::NAN]] {
        let err = solver.evolve(&h, &rho0, &[], &times).unwrap_err();
        assert!(matches!(err, SimError::InvalidTimeGrid(_)));
    }
}

#[test]
fn bad_step_is_rejected() {
    let (h, rho0) = setup();
    let err = Rk4Integrator::new(0.0)
        .evolve(&h, &rho0, &[], &[0.0, 1.0])
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidTimeGrid(_)));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let (_, rho0) = setup();
    let h3 = SshHamiltonian::new(3, 0.5, 1.0).build(0).unwrap();
    let err = Rk4Integrator::default()
        .evolve(h3.operator(), &rho0, &[], &[0.0, 1.0])
        .unwrap_err();
    assert!(matches!(err, SimError::DimensionMismatch { expected: 4, got: 8 }));

    let (h, rho0) = setup();
    let wrong = NoiseModel::new(0.1, 0.1).collapse_operators(3).unwrap();
    assert!(Rk4Integrator::default().evolve(&h, &rho0, &wrong, &[0.0, 1.0]).is_err());
}
