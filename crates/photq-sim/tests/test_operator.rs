//! Tests for single-site operators and their tensor embedding.

use num_complex::Complex64;
use photq_sim::SimError;
use photq_sim::operator::{
    MAX_DENSE_SITES, Operator, OperatorFactory, identity, kron_all, lowering, number, pauli_x,
    pauli_y, pauli_z, raising,
};

fn max_abs_diff(a: &Operator, b: &Operator) -> f64 {
    (a - b).iter().map(|z| z.norm()).fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Single-site primitives
// ---------------------------------------------------------------------------

#[test]
fn raising_is_adjoint_of_lowering() {
    assert_eq!(raising(), lowering().adjoint());
}

#[test]
fn number_is_raising_times_lowering() {
    assert_eq!(number(), raising() * lowering());
}

#[test]
fn paulis_square_to_identity() {
    for p in [pauli_x(), pauli_y(), pauli_z()] {
        assert!(max_abs_diff(&(&p * &p), &identity(2)) < 1e-15);
    }
}

#[test]
fn pauli_commutator() {
    // [σx, σy] = 2iσz
    let comm = pauli_x() * pauli_y() - pauli_y() * pauli_x();
    let expected = pauli_z() * Complex64::new(0.0, 2.0);
    assert!(max_abs_diff(&comm, &expected) < 1e-15);
}

#[test]
fn kron_all_orders_factors_left_to_right() {
    // |1⟩⟨1| ⊗ I on two sites has ones at |10⟩ and |11⟩ (indices 2, 3).
    let op = kron_all([&number(), &identity(2)]);
    assert_eq!(op.nrows(), 4);
    let diag: Vec<f64> = (0..4).map(|i| op[(i, i)].re).collect();
    assert_eq!(diag, vec![0.0, 0.0, 1.0, 1.0]);
}

// ---------------------------------------------------------------------------
// OperatorFactory
// ---------------------------------------------------------------------------

#[test]
fn factory_dimension() {
    let ops = OperatorFactory::new(5).unwrap();
    assert_eq!(ops.n_sites(), 5);
    assert_eq!(ops.dim(), 32);
    assert_eq!(ops.lowering(2).unwrap().nrows(), 32);
}

#[test]
fn site_zero_is_most_significant() {
    let ops = OperatorFactory::new(2).unwrap();
    let a0 = ops.lowering(0).unwrap();
    // a₀ maps |10⟩ → |00⟩ and |11⟩ → |01⟩.
    assert_eq!(a0[(0, 2)], Complex64::new(1.0, 0.0));
    assert_eq!(a0[(1, 3)], Complex64::new(1.0, 0.0));
    assert_eq!(a0.iter().filter(|z| z.norm() > 0.0).count(), 2);
}

#[test]
fn number_operators_sum_to_total_number() {
    let ops = OperatorFactory::new(4).unwrap();
    let mut sum = Operator::zeros(ops.dim(), ops.dim());
    for site in 0..4 {
        sum += ops.number(site).unwrap();
    }
    assert!(max_abs_diff(&sum, &ops.total_number()) < 1e-15);
}

#[test]
fn operators_on_distinct_sites_commute() {
    let ops = OperatorFactory::new(3).unwrap();
    let a0 = ops.lowering(0).unwrap();
    let ad2 = ops.raising(2).unwrap();
    assert!(max_abs_diff(&(&a0 * &ad2), &(&ad2 * &a0)) < 1e-15);
}

#[test]
fn product_on_sites_matches_embedded_product() {
    let ops = OperatorFactory::new(3).unwrap();
    let (up, down) = (raising(), lowering());
    let chained = ops.product_on_sites(&[(0, &up), (1, &down)]).unwrap();
    let explicit = ops.raising(0).unwrap() * ops.lowering(1).unwrap();
    assert!(max_abs_diff(&chained, &explicit) < 1e-15);
}

#[test]
fn site_out_of_range_is_rejected() {
    let ops = OperatorFactory::new(3).unwrap();
    let err = ops.number(3).unwrap_err();
    assert!(matches!(
        err,
        SimError::SiteOutOfRange {
            site: 3,
            n_sites: 3
        }
    ));
    assert!(err.is_invalid_argument());
}

#[test]
fn site_count_bounds() {
    assert!(matches!(
        OperatorFactory::new(0),
        Err(SimError::InvalidSiteCount { got: 0, .. })
    ));
    assert!(OperatorFactory::new(MAX_DENSE_SITES + 1).is_err());
    assert!(OperatorFactory::new(1).is_ok());
}

#[test]
fn non_qubit_factor_is_rejected() {
    let ops = OperatorFactory::new(2).unwrap();
    let err = ops.embed(&identity(3), 0).unwrap_err();
    assert!(matches!(err, SimError::DimensionMismatch { expected: 2, got: 3 }));
}
