//! Tests for projective measurement on the embedded qubit.

use num_complex::Complex64;
use photq_sim::embedding::{MeasurementBasis, SubspaceEmbedding};
use photq_sim::measurement::{Outcome, outcome_probabilities, repeated_trials, single_shot};
use photq_sim::operator::StateVector;
use photq_sim::state::DensityMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Two orthonormal single-excitation states on a 3-site lattice.
fn embedding() -> (SubspaceEmbedding, StateVector, StateVector) {
    let mut e1 = StateVector::zeros(8);
    let mut e2 = StateVector::zeros(8);
    // |100⟩ and |001⟩
    e1[4] = Complex64::new(1.0, 0.0);
    e2[1] = Complex64::new(1.0, 0.0);
    (SubspaceEmbedding::new(&e1, &e2).unwrap(), e1, e2)
}

#[test]
fn z_eigenstate_is_deterministic() {
    let (emb, e1, e2) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::Z).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let counts = repeated_trials(&DensityMatrix::from_pure(&e1), &ops, 1000, &mut rng).unwrap();
    assert_eq!((counts.plus, counts.minus, counts.indeterminate), (1000, 0, 0));

    let counts = repeated_trials(&DensityMatrix::from_pure(&e2), &ops, 1000, &mut rng).unwrap();
    assert_eq!((counts.plus, counts.minus, counts.indeterminate), (0, 1000, 0));
}

#[test]
fn z_eigenstate_in_x_basis_is_balanced() {
    let (emb, e1, _) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::X).unwrap();
    let rho = DensityMatrix::from_pure(&e1);

    let (p_plus, p_minus) = outcome_probabilities(&rho, &ops);
    assert!((p_plus - 0.5).abs() < 1e-12);
    assert!((p_minus - 0.5).abs() < 1e-12);

    let mut rng = StdRng::seed_from_u64(42);
    let counts = repeated_trials(&rho, &ops, 1000, &mut rng).unwrap();
    assert_eq!(counts.total(), 1000);
    assert!(counts.plus > 400 && counts.plus < 600);
}

#[test]
fn probabilities_sum_to_one_inside_subspace() {
    let (emb, e1, e2) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::X).unwrap();
    let mut psi = e1 * Complex64::new(0.6, 0.0) + e2 * Complex64::new(0.0, 0.8);
    psi.normalize_mut();
    let (p_plus, p_minus) = outcome_probabilities(&DensityMatrix::from_pure(&psi), &ops);
    assert!((p_plus + p_minus - 1.0).abs() < 1e-12);
}

#[test]
fn leaked_weight_lowers_total_probability() {
    let (emb, e1, _) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::Z).unwrap();
    // Half the weight on |010⟩, outside the embedded pair.
    let mut psi = e1.clone();
    psi[2] = Complex64::new(1.0, 0.0);
    psi.normalize_mut();
    let (p_plus, p_minus) = outcome_probabilities(&DensityMatrix::from_pure(&psi), &ops);
    assert!((p_plus - 0.5).abs() < 1e-12);
    assert!(p_minus.abs() < 1e-12);
    assert!(p_plus + p_minus <= 1.0);

    // Sampling renormalizes within the pair.
    let mut rng = StdRng::seed_from_u64(1);
    let counts =
        repeated_trials(&DensityMatrix::from_pure(&psi), &ops, 200, &mut rng).unwrap();
    assert_eq!(counts.plus, 200);
}

#[test]
fn no_support_gives_indeterminate() {
    let (emb, _, _) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::Z).unwrap();
    let vacuum = {
        let mut v = StateVector::zeros(8);
        v[0] = Complex64::new(1.0, 0.0);
        v
    };
    let rho = DensityMatrix::from_pure(&vacuum);
    let mut rng = StdRng::seed_from_u64(0);

    let (outcome, post) = single_shot(&rho, &ops, &mut rng).unwrap();
    assert_eq!(outcome, Outcome::Indeterminate);
    assert_eq!(outcome.value(), 0);
    assert_eq!(post, rho);

    let counts = repeated_trials(&rho, &ops, 50, &mut rng).unwrap();
    assert_eq!(counts.indeterminate, 50);
    assert_eq!(counts.plus_fraction(), 0.0);
}

#[test]
fn post_measurement_state_is_collapsed() {
    let (emb, e1, e2) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::Z).unwrap();
    let mut psi = &e1 + &e2;
    psi.normalize_mut();
    let mut rng = StdRng::seed_from_u64(5);

    let (outcome, post) = single_shot(&DensityMatrix::from_pure(&psi), &ops, &mut rng).unwrap();
    let expected = match outcome {
        Outcome::Plus => DensityMatrix::from_pure(&e1),
        Outcome::Minus => DensityMatrix::from_pure(&e2),
        Outcome::Indeterminate => panic!("state has full support on the pair"),
    };
    assert!((post.trace() - 1.0).abs() < 1e-12);
    assert!((post.purity() - 1.0).abs() < 1e-12);
    let diff = (post.matrix() - expected.matrix())
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max);
    assert!(diff < 1e-12);
}

#[test]
fn seeded_trials_are_reproducible() {
    let (emb, e1, _) = embedding();
    let ops = emb.measurement_operators(MeasurementBasis::X).unwrap();
    let rho = DensityMatrix::from_pure(&e1);
    let a = repeated_trials(&rho, &ops, 300, &mut StdRng::seed_from_u64(11)).unwrap();
    let b = repeated_trials(&rho, &ops, 300, &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a, b);
}
