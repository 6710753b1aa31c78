//! Tests for collapse-operator construction.

use num_complex::Complex64;
use photq_sim::SimError;
use photq_sim::noise::{Channel, NoiseModel};
use photq_sim::operator::OperatorFactory;

#[test]
fn two_operators_per_site() {
    let ops = NoiseModel::new(0.05, 0.05).collapse_operators(6).unwrap();
    assert_eq!(ops.len(), 12);
    assert!(ops.iter().all(|c| c.operator.nrows() == 64));
}

#[test]
fn operators_are_interleaved_by_site() {
    let ops = NoiseModel::new(0.05, 0.02).collapse_operators(3).unwrap();
    let layout: Vec<(usize, Channel)> = ops.iter().map(|c| (c.site, c.channel)).collect();
    assert_eq!(
        layout,
        vec![
            (0, Channel::Damping),
            (0, Channel::Dephasing),
            (1, Channel::Damping),
            (1, Channel::Dephasing),
            (2, Channel::Damping),
            (2, Channel::Dephasing),
        ]
    );
    assert_eq!(ops[0].rate, 0.05);
    assert_eq!(ops[1].rate, 0.02);
}

#[test]
fn operators_are_scaled_by_root_rate() {
    let gamma = 0.04;
    let ops = NoiseModel::new(gamma, gamma).collapse_operators(2).unwrap();
    let factory = OperatorFactory::new(2).unwrap();
    let scale = Complex64::new(gamma.sqrt(), 0.0);

    let damp = factory.lowering(1).unwrap() * scale;
    let deph = factory.number(1).unwrap() * scale;
    assert!((&ops[2].operator - damp).norm() < 1e-15);
    assert!((&ops[3].operator - deph).norm() < 1e-15);
}

#[test]
fn zero_rates_give_zero_operators() {
    let ops = NoiseModel::new(0.0, 0.0).collapse_operators(2).unwrap();
    assert_eq!(ops.len(), 4);
    assert!(ops.iter().all(|c| c.operator.norm() == 0.0));
}

#[test]
fn negative_rate_is_rejected() {
    let err = NoiseModel::new(-0.1, 0.05).collapse_operators(2).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidRate {
            name: "damping_rate",
            ..
        }
    ));

    let err = NoiseModel::new(0.05, f64::NAN).collapse_operators(2).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidRate {
            name: "dephasing_rate",
            ..
        }
    ));
}

#[test]
fn invalid_site_count_is_rejected() {
    assert!(NoiseModel::new(0.05, 0.05).collapse_operators(0).is_err());
}
